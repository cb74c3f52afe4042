use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::structs::chat::ChatReply;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    RequestError(#[from] RequestError),
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    #[error(transparent)]
    UpstreamError(#[from] UpstreamError),
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Erreur: requête invalide.")]
    InvalidJson,
    #[error("Erreur: action inconnue ({0}).")]
    UnknownAction(String),
    #[error("Erreur: paramètre manquant ({0}).")]
    MissingParameter(&'static str),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Erreur de configuration : {0} manquant.")]
    Missing(&'static str),
    #[error("Erreur de configuration : destination inconnue ({0}).")]
    UnknownDestination(String),
}

/// 呼叫 Google API 時的錯誤分類
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Erreur de configuration du service {service} : {detail}")]
    BadConfig { service: &'static str, detail: String },
    #[error("Erreur d'authentification auprès de {service} : {detail}")]
    Auth { service: &'static str, detail: String },
    #[error("Ressource introuvable sur {service} : {detail}")]
    NotFound { service: &'static str, detail: String },
    #[error("Erreur réseau vers {service} : {detail}")]
    Network { service: &'static str, detail: String },
    #[error("Réponse invalide de {service} : {detail}")]
    InvalidResponse { service: &'static str, detail: String },
}

impl UpstreamError {
    /// 依 HTTP 狀態碼分類
    pub fn from_status(service: &'static str, status: reqwest::StatusCode, body: String) -> Self {
        let detail = format!("{} {}", status.as_u16(), body.trim());
        match status {
            reqwest::StatusCode::BAD_REQUEST => UpstreamError::BadConfig { service, detail },
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                UpstreamError::Auth { service, detail }
            }
            reqwest::StatusCode::NOT_FOUND => UpstreamError::NotFound { service, detail },
            _ => UpstreamError::Network { service, detail },
        }
    }

    pub fn network(service: &'static str, err: reqwest::Error) -> Self {
        UpstreamError::Network {
            service,
            detail: err.to_string(),
        }
    }

    pub fn invalid_response(service: &'static str, err: impl std::fmt::Display) -> Self {
        UpstreamError::InvalidResponse {
            service,
            detail: err.to_string(),
        }
    }
}

// webhook 規格要求永遠回 200 + 可解析的 json
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::UpstreamError(err) => tracing::error!("upstream failure: {}", err),
            AppError::ConfigError(err) => tracing::error!("configuration error: {}", err),
            AppError::RequestError(err) => tracing::warn!("bad request: {}", err),
        }

        (StatusCode::OK, Json(ChatReply::text(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_distinct_kinds() {
        let auth = UpstreamError::from_status("Sheets", reqwest::StatusCode::FORBIDDEN, "".into());
        assert!(matches!(auth, UpstreamError::Auth { .. }));

        let missing =
            UpstreamError::from_status("Sheets", reqwest::StatusCode::NOT_FOUND, "gone".into());
        assert!(matches!(missing, UpstreamError::NotFound { .. }));
        assert!(missing.to_string().contains("404 gone"));

        let bad = UpstreamError::from_status("Sheets", reqwest::StatusCode::BAD_REQUEST, "".into());
        assert!(matches!(bad, UpstreamError::BadConfig { .. }));

        let other =
            UpstreamError::from_status("Chat", reqwest::StatusCode::BAD_GATEWAY, "".into());
        assert!(matches!(other, UpstreamError::Network { .. }));
    }

    #[tokio::test]
    async fn errors_render_as_ok_text_replies() {
        let response = AppError::from(ConfigError::Missing("SPREADSHEET_ID")).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value["text"],
            "Erreur de configuration : SPREADSHEET_ID manquant."
        );
    }
}
