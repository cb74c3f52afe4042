use crate::{
    errors::{AppError, ConfigError, RequestError},
    services::{
        cards::{copy_card, COPY_MESSAGE, GENERATE_INCIDENT, GENERATE_MEP, PUBLISH_MESSAGE},
        templates::{truncate, MISSING_VALUE},
    },
    state::AppState,
    structs::chat::{ChatEvent, ChatReply},
};

const DEFAULT_IMPACT: &str = "Sans impact";

// 欄位被清空時也當作沒填
fn form_field<'a>(event: &'a ChatEvent, name: &str, default: &'a str) -> &'a str {
    event
        .form_value(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
}

pub fn incident_message(event: &ChatEvent) -> String {
    format!(
        "🚨 [{}] Incident 🚨\n🗓️ Depuis {}\n{}\n💥 Les services tels que {} sont actuellement impactés.",
        form_field(event, "cluster", MISSING_VALUE),
        form_field(event, "startDate", MISSING_VALUE),
        form_field(event, "status", MISSING_VALUE),
        form_field(event, "services", MISSING_VALUE),
    )
}

pub fn mep_message(event: &ChatEvent) -> String {
    format!(
        "ℹ️ [{}] Mise à jour de l’OS sous-jacent (Production)\n📅 Le {}\n🎯 {}\n💥 {}\n🏷️{}",
        form_field(event, "component", MISSING_VALUE),
        form_field(event, "date", MISSING_VALUE),
        form_field(event, "target", MISSING_VALUE),
        form_field(event, "impact", DEFAULT_IMPACT),
        form_field(event, "mepNumber", MISSING_VALUE),
    )
}

async fn publish(state: &AppState, event: &ChatEvent) -> Result<ChatReply, AppError> {
    let name = event
        .parameter("destination")
        .ok_or(RequestError::MissingParameter("destination"))?;
    let text = event
        .parameter("text")
        .ok_or(RequestError::MissingParameter("text"))?;

    let destination = state
        .get_config()
        .destination(name)
        .ok_or_else(|| ConfigError::UnknownDestination(name.to_string()))?;

    state
        .get_publisher()
        .publish(&destination.space, text)
        .await?;

    tracing::info!(
        "{} published a message to {} ({})",
        event.user_name(),
        destination.name,
        destination.space
    );

    Ok(ChatReply::text(format!(
        "✅ Message publié dans {}.",
        destination.name
    )))
}

/// CARD_CLICKED：依 invokedFunction 分派
pub async fn handle_card_click(state: &AppState, event: &ChatEvent) -> Result<ChatReply, AppError> {
    let max_length = state.get_config().max_message_length;

    match event.invoked_function() {
        Some(GENERATE_INCIDENT) => Ok(ChatReply::new_message(ChatReply::text(truncate(
            incident_message(event),
            max_length,
        )))),
        Some(GENERATE_MEP) => Ok(ChatReply::new_message(ChatReply::text(truncate(
            mep_message(event),
            max_length,
        )))),
        Some(PUBLISH_MESSAGE) => publish(state, event).await,
        Some(COPY_MESSAGE) => {
            let text = event
                .parameter("text")
                .ok_or(RequestError::MissingParameter("text"))?;
            Ok(copy_card(text))
        }
        Some(other) => Err(RequestError::UnknownAction(other.to_string()).into()),
        None => Err(RequestError::UnknownAction(String::new()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{parse_destinations, AppConfig},
        state::testing::{state_with, FakeGrid, FakePublisher},
        structs::chat::{ActionResponseType, Widget},
    };
    use serde_json::json;
    use std::sync::Arc;

    fn event(value: serde_json::Value) -> ChatEvent {
        serde_json::from_value(value).unwrap()
    }

    fn state(publisher: Arc<FakePublisher>) -> AppState {
        let config = AppConfig {
            destinations: parse_destinations("incidents=spaces/AAA"),
            ..AppConfig::default()
        };
        state_with(config, FakeGrid(Ok(Vec::new())), publisher)
    }

    fn posted_text(reply: &ChatReply) -> &str {
        let response = reply.action_response.as_ref().unwrap();
        assert_eq!(response.response_type, ActionResponseType::NewMessage);
        response.message.as_ref().unwrap().text.as_deref().unwrap()
    }

    #[tokio::test]
    async fn incident_form_builds_announcement() {
        let click = event(json!({
            "type": "CARD_CLICKED",
            "common": {
                "invokedFunction": "generateIncidentMessage",
                "formInputs": {
                    "cluster": {"stringInputs": {"value": ["prod-eu"]}},
                    "startDate": {"stringInputs": {"value": ["Mardi 03/06/2025 13h00"]}},
                    "status": {"stringInputs": {"value": ["Correction en cours"]}},
                    "services": {"stringInputs": {"value": ["ArgoCD / Vault"]}}
                }
            }
        }));

        let reply = handle_card_click(&state(Arc::default()), &click).await.unwrap();
        assert_eq!(
            posted_text(&reply),
            "🚨 [prod-eu] Incident 🚨\n🗓️ Depuis Mardi 03/06/2025 13h00\nCorrection en cours\n💥 Les services tels que ArgoCD / Vault sont actuellement impactés."
        );
    }

    #[tokio::test]
    async fn missing_fields_use_placeholders() {
        let click = event(json!({
            "type": "CARD_CLICKED",
            "common": {
                "invokedFunction": "generateMepMessage",
                "formInputs": {
                    "component": {"stringInputs": {"value": ["VAULT"]}},
                    "target": {"stringInputs": {"value": ["  "]}}
                }
            }
        }));

        let reply = handle_card_click(&state(Arc::default()), &click).await.unwrap();
        assert_eq!(
            posted_text(&reply),
            "ℹ️ [VAULT] Mise à jour de l’OS sous-jacent (Production)\n📅 Le N/A\n🎯 N/A\n💥 Sans impact\n🏷️N/A"
        );
    }

    #[tokio::test]
    async fn publish_posts_to_configured_space() {
        let publisher = Arc::new(FakePublisher::default());
        let click = event(json!({
            "type": "CARD_CLICKED",
            "user": {"displayName": "Alice"},
            "common": {
                "invokedFunction": "publishMessage",
                "parameters": {"destination": "incidents", "text": "hello"}
            }
        }));

        let reply = handle_card_click(&state(publisher.clone()), &click)
            .await
            .unwrap();

        assert_eq!(reply.text.as_deref(), Some("✅ Message publié dans incidents."));
        assert_eq!(
            *publisher.sent.lock().unwrap(),
            vec![("spaces/AAA".to_string(), "hello".to_string())]
        );
    }

    #[tokio::test]
    async fn publish_errors_are_typed() {
        let click = event(json!({
            "type": "CARD_CLICKED",
            "common": {
                "invokedFunction": "publishMessage",
                "parameters": {"destination": "mep", "text": "hello"}
            }
        }));
        let err = handle_card_click(&state(Arc::default()), &click)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ConfigError(ConfigError::UnknownDestination(_))
        ));

        let failing = Arc::new(FakePublisher {
            fail: true,
            ..FakePublisher::default()
        });
        let click = event(json!({
            "type": "CARD_CLICKED",
            "common": {
                "invokedFunction": "publishMessage",
                "parameters": {"destination": "incidents", "text": "hello"}
            }
        }));
        let err = handle_card_click(&state(failing), &click).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamError(_)));
    }

    #[tokio::test]
    async fn copy_returns_text_input() {
        let click = event(json!({
            "type": "CARD_CLICKED",
            "action": {
                "actionMethodName": "copyMessage",
                "parameters": [{"key": "text", "value": "hello"}]
            }
        }));

        let reply = handle_card_click(&state(Arc::default()), &click).await.unwrap();
        let widget = &reply.cards_v2[0].card.sections[0].widgets[0];
        assert!(matches!(widget, Widget::TextInput(input) if input.value.as_deref() == Some("hello")));
    }

    #[tokio::test]
    async fn unknown_function_is_a_request_error() {
        let click = event(json!({
            "type": "CARD_CLICKED",
            "common": {"invokedFunction": "doSomething"}
        }));

        let err = handle_card_click(&state(Arc::default()), &click)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::RequestError(RequestError::UnknownAction(name)) if name == "doSomething"
        ));
    }
}
