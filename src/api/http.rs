use crate::api::{wire, ApiError, Backend};
use crate::config::{Config, Endpoints};
use crate::model::{PageMetadata, Query, ResultPage, SuggestionSet};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

/// Backend reached over HTTP/JSON
///
/// Widget endpoints (find, suggest, autocomplete) are served by the tool's
/// own API; document metadata comes from the public page summary service.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpBackend {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mitmachen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoints })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            config.endpoints.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Build the metadata URL for `page_id`, percent-encoding it as one segment
    fn metadata_url(&self, page_id: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.endpoints.metadata)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.endpoints.metadata)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.endpoints.metadata.clone()))?
            .pop_if_empty()
            .push(&page_id.replace(' ', "_"));
        Ok(url)
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// A body that is not JSON is logged and treated as `null`, so callers see
    /// empty fields instead of an error.
    async fn get_json(&self, url: Url) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            tracing::warn!(
                url = %url,
                status = %status,
                error = %body,
                "backend returned error"
            );

            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        match serde_json::from_str(&text) {
            Ok(json) => Ok(json),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "backend response is not JSON");
                Ok(Value::Null)
            }
        }
    }

    fn endpoint(raw: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let parsed = if params.is_empty() {
            Url::parse(raw)
        } else {
            Url::parse_with_params(raw, params)
        };
        parsed.map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn find(&self, query: &Query, offset: usize) -> Result<ResultPage, ApiError> {
        tracing::debug!(query = %query, offset, "find request");

        let offset = offset.to_string();
        let url = Self::endpoint(
            &self.endpoints.find,
            &[("q", query.as_str()), ("offset", offset.as_str())],
        )?;
        let json = self.get_json(url).await?;
        let page = wire::result_page(&json);

        tracing::debug!(
            query = %query,
            result_count = page.documents.len(),
            more = page.has_more,
            "find completed"
        );

        Ok(page)
    }

    async fn suggest(&self) -> Result<SuggestionSet, ApiError> {
        let url = Self::endpoint(&self.endpoints.suggest, &[])?;
        let json = self.get_json(url).await?;
        Ok(wire::suggestion_set(&json))
    }

    async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>, ApiError> {
        let url = Self::endpoint(&self.endpoints.autocomplete, &[("q", prefix)])?;
        let json = self.get_json(url).await?;
        Ok(wire::categories(&json))
    }

    async fn metadata(&self, page_id: &str) -> Result<PageMetadata, ApiError> {
        let url = self.metadata_url(page_id)?;
        let json = self.get_json(url).await?;
        Ok(wire::page_metadata(&json))
    }
}
