use serde::{Deserialize, Serialize};

/// service account 簽 JWT assertion 用的 claims
#[derive(Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
}

/// GOOGLE_APPLICATION_CREDENTIALS 指向的 json key 檔
#[derive(Deserialize, Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
