use crate::{
    errors::{AppError, RequestError},
    services::{
        actions::handle_card_click,
        commands::{handle_message, GREETING},
    },
    state::AppState,
    structs::chat::{ChatEvent, ChatReply, EventType},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;

/// Google Chat webhook 入口，任何情況都回 200
pub async fn handle_event(
    State(state): State<AppState>,
    payload: Result<Json<ChatEvent>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(event) = payload.map_err(|rejection| {
        tracing::warn!("rejected webhook payload: {}", rejection.body_text());
        RequestError::InvalidJson
    })?;

    tracing::debug!("{:?} event from {}", event.event_type, event.user_name());

    let now = Utc::now().with_timezone(&state.get_config().timezone);

    let reply = match event.event_type {
        EventType::Message => match &event.message {
            Some(message) => handle_message(&state, message, &now).await?,
            None => ChatReply::text(GREETING),
        },
        EventType::CardClicked => handle_card_click(&state, &event).await?,
        EventType::AddedToSpace => ChatReply::text(GREETING),
        EventType::RemovedFromSpace | EventType::Unknown => ChatReply::default(),
    };

    Ok(Json(reply))
}
