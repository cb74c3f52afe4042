use crate::{
    auth::{TokenSource, CHAT_SCOPE},
    errors::UpstreamError,
    structs::{chat::NewChatMessage, google::ChatPublisher},
};
use async_trait::async_trait;
use reqwest::Client;

const SERVICE: &str = "Google Chat";

pub struct ChatRepository {
    client: Client,
    token_source: TokenSource,
}

impl ChatRepository {
    pub fn new(client: Client, token_source: TokenSource) -> Self {
        Self {
            client,
            token_source,
        }
    }
}

/// `spaces/AAA` 或只給 `AAA` 都可以
pub fn messages_url(space: &str) -> String {
    let space = space.trim().trim_matches('/');
    if space.starts_with("spaces/") {
        format!("https://chat.googleapis.com/v1/{}/messages", space)
    } else {
        format!("https://chat.googleapis.com/v1/spaces/{}/messages", space)
    }
}

#[async_trait]
impl ChatPublisher for ChatRepository {
    async fn publish(&self, space: &str, text: &str) -> Result<(), UpstreamError> {
        let token = self
            .token_source
            .access_token(&self.client, CHAT_SCOPE)
            .await?;

        let response = self
            .client
            .post(messages_url(space))
            .bearer_auth(token)
            .json(&NewChatMessage { text })
            .send()
            .await
            .map_err(|err| UpstreamError::network(SERVICE, err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::from_status(SERVICE, status, body));
        }

        Ok(())
    }
}
