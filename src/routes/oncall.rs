use crate::{errors::AppError, services::oncall, state::AppState, structs::chat::ChatReply};
use axum::{extract::State, Json};
use chrono::Utc;

/// 不經過 Chat，直接查今天的值班人員
pub async fn today(State(state): State<AppState>) -> Result<Json<ChatReply>, AppError> {
    let config = state.get_config();
    let today = Utc::now().with_timezone(&config.timezone).date_naive();

    let outcome = oncall::lookup(
        state.get_grid_source(),
        today,
        &config.target_color,
        config.tolerance,
    )
    .await?;

    Ok(Json(ChatReply::text(outcome.message(today))))
}
