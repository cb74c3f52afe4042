use crate::{
    auth::{TokenSource, SHEETS_SCOPE},
    errors::{AppError, ConfigError, UpstreamError},
    structs::{
        google::GridSource,
        sheets::{GridRow, Spreadsheet},
    },
};
use async_trait::async_trait;
use reqwest::Client;

const SERVICE: &str = "Google Sheets";
const FIELDS: &str = "sheets.data.rowData.values(formattedValue,effectiveFormat.backgroundColor)";

pub struct SheetsRepository {
    client: Client,
    token_source: TokenSource,
    spreadsheet_id: Option<String>,
    sheet_name: String,
}

impl SheetsRepository {
    pub fn new(
        client: Client,
        token_source: TokenSource,
        spreadsheet_id: Option<String>,
        sheet_name: String,
    ) -> Self {
        Self {
            client,
            token_source,
            spreadsheet_id,
            sheet_name,
        }
    }
}

/// A1 notation 的分頁名稱要加單引號
pub fn quoted_range(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}

#[async_trait]
impl GridSource for SheetsRepository {
    async fn fetch_rows(&self) -> Result<Vec<GridRow>, AppError> {
        let spreadsheet_id = self
            .spreadsheet_id
            .as_deref()
            .ok_or(ConfigError::Missing("SPREADSHEET_ID"))?;

        let token = self
            .token_source
            .access_token(&self.client, SHEETS_SCOPE)
            .await?;

        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}",
            spreadsheet_id
        );

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[
                ("ranges", quoted_range(&self.sheet_name).as_str()),
                ("includeGridData", "true"),
                ("fields", FIELDS),
            ])
            .send()
            .await
            .map_err(|err| UpstreamError::network(SERVICE, err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::from_status(SERVICE, status, body).into());
        }

        let spreadsheet = response
            .json::<Spreadsheet>()
            .await
            .map_err(|err| UpstreamError::invalid_response(SERVICE, err))?;

        let rows = spreadsheet.into_rows();
        tracing::debug!("fetched {} rows from sheet {}", rows.len(), self.sheet_name);

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_sheet_names() {
        assert_eq!(quoted_range("Planning"), "'Planning'");
        assert_eq!(quoted_range("Astreinte d'été"), "'Astreinte d''été'");
    }

    #[tokio::test]
    async fn missing_spreadsheet_id_is_a_config_error() {
        let repository = SheetsRepository::new(
            Client::new(),
            TokenSource::Static("token".into()),
            None,
            "Planning".into(),
        );

        let err = repository.fetch_rows().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::ConfigError(ConfigError::Missing("SPREADSHEET_ID"))
        ));
    }
}
