use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---- Google Chat 傳進來的事件 ----

#[derive(Deserialize, Debug, Default)]
pub struct ChatEvent {
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    pub message: Option<Message>,
    pub common: Option<CommonEventObject>,
    pub action: Option<FormAction>,
    pub user: Option<User>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Message,
    CardClicked,
    AddedToSpace,
    RemovedFromSpace,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: Option<String>,
    pub argument_text: Option<String>,
    pub slash_command: Option<SlashCommand>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SlashCommand {
    pub command_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommonEventObject {
    pub invoked_function: Option<String>,
    #[serde(default)]
    pub form_inputs: HashMap<String, FormInput>,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    pub string_inputs: Option<StringInputs>,
}

#[derive(Deserialize, Debug, Default)]
pub struct StringInputs {
    #[serde(default)]
    pub value: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormAction {
    pub action_method_name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub display_name: Option<String>,
}

impl ChatEvent {
    /// 卡片按鈕觸發的函數名稱
    pub fn invoked_function(&self) -> Option<&str> {
        self.common
            .as_ref()
            .and_then(|common| common.invoked_function.as_deref())
            .or_else(|| {
                self.action
                    .as_ref()
                    .and_then(|action| action.action_method_name.as_deref())
            })
    }

    /// 表單欄位只取第一個值
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.common
            .as_ref()?
            .form_inputs
            .get(name)?
            .string_inputs
            .as_ref()?
            .value
            .first()
            .map(String::as_str)
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.common
            .as_ref()
            .and_then(|common| common.parameters.get(key).map(String::as_str))
            .or_else(|| {
                self.action.as_ref().and_then(|action| {
                    action
                        .parameters
                        .iter()
                        .find(|param| param.key == key)
                        .map(|param| param.value.as_str())
                })
            })
    }

    pub fn user_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|user| user.display_name.as_deref())
            .unwrap_or("anonymous")
    }
}

// ---- 回傳給 Google Chat 的內容 ----

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cards_v2: Vec<CardWithId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_response: Option<ActionResponse>,
}

impl ChatReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn card(card_id: impl Into<String>, card: Card) -> Self {
        Self {
            cards_v2: vec![CardWithId {
                card_id: card_id.into(),
                card,
            }],
            ..Self::default()
        }
    }

    /// 讓 Chat 以新訊息的方式公開貼出
    pub fn new_message(message: ChatReply) -> Self {
        Self {
            action_response: Some(ActionResponse {
                response_type: ActionResponseType::NewMessage,
                message: Some(Box::new(message)),
            }),
            ..Self::default()
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ActionResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Box<ChatReply>>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionResponseType {
    NewMessage,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardWithId {
    pub card_id: String,
    pub card: Card,
}

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct Card {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<CardHeader>,
    pub sections: Vec<Section>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CardHeader {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub widgets: Vec<Widget>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    TextParagraph(TextParagraph),
    TextInput(TextInput),
    ButtonList(ButtonList),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TextParagraph {
    pub text: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TextInput {
    pub label: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ButtonList {
    pub buttons: Vec<Button>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub text: String,
    pub on_click: OnClick,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OnClick {
    pub action: Action,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Action {
    pub function: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ActionParameter>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionParameter {
    pub key: String,
    pub value: String,
}

/// Chat API `spaces.messages.create` 的 body
#[derive(Serialize, Debug)]
pub struct NewChatMessage<'a> {
    pub text: &'a str,
}
