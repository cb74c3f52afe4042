use crate::{
    errors::UpstreamError,
    structs::auth::{Claims, ServiceAccountKey, TokenResponse},
    utils::reqwest::get_raw_string,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, Method};
use std::collections::HashMap;

const SERVICE: &str = "Google OAuth";
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
pub const CHAT_SCOPE: &str = "https://www.googleapis.com/auth/chat.bot";

/// access token 的來源，啟動時決定一次
#[derive(Clone)]
pub enum TokenSource {
    /// GOOGLE_ACCESS_TOKEN
    Static(String),
    /// GOOGLE_APPLICATION_CREDENTIALS
    ServiceAccount(ServiceAccountKey),
    /// Cloud Run / GCE 的 metadata server
    Metadata,
}

impl TokenSource {
    pub async fn from_config(
        access_token: Option<&str>,
        credentials_path: Option<&str>,
    ) -> anyhow::Result<Self> {
        if let Some(token) = access_token {
            return Ok(TokenSource::Static(token.to_string()));
        }

        match credentials_path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
                    anyhow::anyhow!("failed to read service account key {}: {}", path, err)
                })?;
                let key = serde_json::from_str::<ServiceAccountKey>(&raw).map_err(|err| {
                    anyhow::anyhow!("invalid service account key {}: {}", path, err)
                })?;
                Ok(TokenSource::ServiceAccount(key))
            }
            None => Ok(TokenSource::Metadata),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TokenSource::Static(_) => "static token",
            TokenSource::ServiceAccount(_) => "service account",
            TokenSource::Metadata => "metadata server",
        }
    }

    /// 每次請求都重新取得，不做快取
    pub async fn access_token(&self, client: &Client, scope: &str) -> Result<String, UpstreamError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::ServiceAccount(key) => exchange_jwt(client, key, scope).await,
            TokenSource::Metadata => metadata_token(client, scope).await,
        }
    }
}

pub fn encode_jwt(key: &ServiceAccountKey, scope: &str) -> Result<String, UpstreamError> {
    let now = Utc::now();
    let exp = (now + Duration::hours(1)).timestamp() as usize;
    let iat = now.timestamp() as usize;

    let claim = Claims {
        iss: key.client_email.clone(),
        scope: scope.to_string(),
        aud: key.token_uri.clone(),
        exp,
        iat,
    };

    let encoding_key =
        EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|err| {
            UpstreamError::BadConfig {
                service: SERVICE,
                detail: format!("private key illisible : {}", err),
            }
        })?;

    encode(&Header::new(Algorithm::RS256), &claim, &encoding_key).map_err(|err| {
        UpstreamError::BadConfig {
            service: SERVICE,
            detail: err.to_string(),
        }
    })
}

async fn exchange_jwt(
    client: &Client,
    key: &ServiceAccountKey,
    scope: &str,
) -> Result<String, UpstreamError> {
    let assertion = encode_jwt(key, scope)?;

    let body = get_raw_string(
        client,
        SERVICE,
        &key.token_uri,
        Method::POST,
        None,
        Some(vec![
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ]),
    )
    .await?;

    parse_token(&body)
}

async fn metadata_token(client: &Client, scope: &str) -> Result<String, UpstreamError> {
    let url = format!("{}?scopes={}", METADATA_TOKEN_URL, scope);
    let headers = HashMap::from([("Metadata-Flavor", "Google".to_string())]);

    let body = get_raw_string(client, SERVICE, &url, Method::GET, Some(headers), None).await?;

    parse_token(&body)
}

fn parse_token(body: &str) -> Result<String, UpstreamError> {
    serde_json::from_str::<TokenResponse>(body)
        .map(|response| response.access_token)
        .map_err(|err| UpstreamError::invalid_response(SERVICE, err))
}
