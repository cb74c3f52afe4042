use crate::{
    config::Destination,
    structs::{
        chat::{
            Action, ActionParameter, Button, ButtonList, Card, CardHeader, ChatReply, OnClick,
            Section, TextInput, TextParagraph, Widget,
        },
        templates::Template,
    },
};

pub const GENERATE_INCIDENT: &str = "generateIncidentMessage";
pub const GENERATE_MEP: &str = "generateMepMessage";
pub const PUBLISH_MESSAGE: &str = "publishMessage";
pub const COPY_MESSAGE: &str = "copyMessage";

fn button(text: impl Into<String>, function: &str, parameters: Vec<ActionParameter>) -> Button {
    Button {
        text: text.into(),
        on_click: OnClick {
            action: Action {
                function: function.to_string(),
                parameters,
            },
        },
    }
}

fn parameter(key: &str, value: &str) -> ActionParameter {
    ActionParameter {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn text_input(label: &str, name: &str, value: Option<&str>) -> Widget {
    Widget::TextInput(TextInput {
        label: label.to_string(),
        name: name.to_string(),
        value: value.map(str::to_string),
    })
}

/// 模板結果卡片：內文 + 複製 / 發佈按鈕
pub fn message_card(
    family: &str,
    stage: &str,
    template: &Template,
    text: &str,
    destinations: &[Destination],
) -> ChatReply {
    let mut buttons = vec![button("Copier", COPY_MESSAGE, vec![parameter("text", text)])];
    buttons.extend(destinations.iter().map(|destination| {
        button(
            format!("Publier dans {}", destination.name),
            PUBLISH_MESSAGE,
            vec![
                parameter("destination", &destination.name),
                parameter("text", text),
            ],
        )
    }));

    let card = Card {
        header: Some(CardHeader {
            title: format!("{} {}", template.emoji, template.title),
            subtitle: Some(template.priority.label().to_string()),
        }),
        sections: vec![
            Section {
                header: None,
                widgets: vec![Widget::TextParagraph(TextParagraph {
                    text: text.to_string(),
                })],
            },
            Section {
                header: None,
                widgets: vec![Widget::ButtonList(ButtonList { buttons })],
            },
        ],
    };

    ChatReply::card(format!("{}-{}", family, stage), card)
}

/// 方便手動複製的輸入框
pub fn copy_card(text: &str) -> ChatReply {
    let card = Card {
        header: Some(CardHeader {
            title: "📋 Message à copier".to_string(),
            subtitle: None,
        }),
        sections: vec![Section {
            header: None,
            widgets: vec![text_input("Message", "message", Some(text))],
        }],
    };

    ChatReply::card("copyMessage", card)
}

fn form_card(card_id: &str, title: &str, mut widgets: Vec<Widget>, function: &str) -> ChatReply {
    widgets.push(Widget::ButtonList(ButtonList {
        buttons: vec![button("Générer le message", function, Vec::new())],
    }));

    let card = Card {
        header: Some(CardHeader {
            title: title.to_string(),
            subtitle: None,
        }),
        sections: vec![Section {
            header: None,
            widgets,
        }],
    };

    ChatReply::card(card_id, card)
}

pub fn incident_form_card() -> ChatReply {
    form_card(
        "incidentForm",
        "Déclarer un nouvel incident",
        vec![
            text_input("Cluster / Application", "cluster", None),
            text_input(
                "Date et heure de début",
                "startDate",
                Some("Mardi 03/06/2025 13h00"),
            ),
            text_input(
                "Description de la situation",
                "status",
                Some("L'origine du problème a été identifiée et est en cours de correction"),
            ),
            text_input(
                "Services impactés (séparés par /)",
                "services",
                Some("ArgoCD / Octoperf / SonarKube"),
            ),
        ],
        GENERATE_INCIDENT,
    )
}

pub fn mep_form_card() -> ChatReply {
    form_card(
        "mepForm",
        "Annoncer une Mise en Production",
        vec![
            text_input("Composant principal", "component", Some("VAULT")),
            text_input("Date et créneau", "date", Some("10/06 12h-14h")),
            text_input("Cible", "target", Some("Vault Production")),
            text_input(
                "Impact",
                "impact",
                Some("Sans impact, sauf en cas de retour arrière"),
            ),
            text_input("Numéro de MEP", "mepNumber", Some("MEP0000866105")),
        ],
        GENERATE_MEP,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::templates::TemplateCatalog;
    use serde_json::json;

    #[test]
    fn message_card_offers_copy_and_publish() {
        let catalog = TemplateCatalog::builtin();
        let template = catalog.family("incident").unwrap().stage("detection").unwrap();
        let destinations = vec![Destination {
            name: "incidents".into(),
            space: "spaces/AAA".into(),
        }];

        let reply = message_card("incident", "detection", template, "hello", &destinations);
        let value = serde_json::to_value(&reply).unwrap();
        let card = &value["cardsV2"][0];

        assert_eq!(card["cardId"], "incident-detection");
        assert_eq!(card["card"]["header"]["title"], "🚨 Incident détecté");
        assert_eq!(card["card"]["header"]["subtitle"], "Priorité haute");
        assert_eq!(
            card["card"]["sections"][0]["widgets"][0],
            json!({"textParagraph": {"text": "hello"}})
        );

        let buttons = &card["card"]["sections"][1]["widgets"][0]["buttonList"]["buttons"];
        assert_eq!(buttons[0]["onClick"]["action"]["function"], COPY_MESSAGE);
        assert_eq!(buttons[1]["text"], "Publier dans incidents");
        assert_eq!(
            buttons[1]["onClick"]["action"]["parameters"],
            json!([{"key": "destination", "value": "incidents"}, {"key": "text", "value": "hello"}])
        );
    }

    #[test]
    fn forms_end_with_generate_button() {
        let value = serde_json::to_value(mep_form_card()).unwrap();
        let widgets = value["cardsV2"][0]["card"]["sections"][0]["widgets"]
            .as_array()
            .unwrap();

        assert_eq!(widgets.len(), 6);
        assert_eq!(widgets[4]["textInput"]["name"], "mepNumber");
        assert_eq!(
            widgets[5]["buttonList"]["buttons"][0]["onClick"]["action"],
            json!({"function": GENERATE_MEP})
        );

        let value = serde_json::to_value(incident_form_card()).unwrap();
        assert_eq!(value["cardsV2"][0]["cardId"], "incidentForm");
        assert!(value["cardsV2"][0]["card"]["sections"][0]["widgets"][0]["textInput"]
            .get("value")
            .is_none());
    }
}
