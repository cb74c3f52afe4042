use crate::{
    auth::TokenSource,
    config::AppConfig,
    repositories::{chat::ChatRepository, sheets::SheetsRepository},
    services::templates::load_catalog,
    structs::{
        google::{ChatPublisher, GridSource},
        templates::TemplateCatalog,
    },
};
use reqwest::Client;
use std::sync::Arc;

/// 所有請求共用，內容皆不可變
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    templates: Arc<TemplateCatalog>,
    grid_source: Arc<dyn GridSource>,
    publisher: Arc<dyn ChatPublisher>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let templates = load_catalog(config.templates_path.as_deref())?;
        let token_source = TokenSource::from_config(
            config.google_access_token.as_deref(),
            config.google_credentials_path.as_deref(),
        )
        .await?;
        tracing::info!("google credentials: {}", token_source.kind());

        let http_client = Client::new();
        let grid_source = SheetsRepository::new(
            http_client.clone(),
            token_source.clone(),
            config.spreadsheet_id.clone(),
            config.sheet_name.clone(),
        );
        let publisher = ChatRepository::new(http_client.clone(), token_source);

        Ok(Self::with_sources(
            config,
            templates,
            Arc::new(grid_source),
            Arc::new(publisher),
        ))
    }

    pub fn with_sources(
        config: AppConfig,
        templates: TemplateCatalog,
        grid_source: Arc<dyn GridSource>,
        publisher: Arc<dyn ChatPublisher>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            templates: Arc::new(templates),
            grid_source,
            publisher,
        }
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn get_templates(&self) -> &TemplateCatalog {
        &self.templates
    }

    pub fn get_grid_source(&self) -> &dyn GridSource {
        self.grid_source.as_ref()
    }

    pub fn get_publisher(&self) -> &dyn ChatPublisher {
        self.publisher.as_ref()
    }
}
