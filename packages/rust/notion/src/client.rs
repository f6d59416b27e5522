//! HTTP implementation of [`BlocksApi`] on top of `reqwest`.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use tracing::{debug, instrument};
use url::Url;

use togglenote_shared::{Block, BlockId, NotionConfig, Result, TogglenoteError};

use crate::BlocksApi;
use crate::payload::{AppendChildren, ApiErrorBody, ChildrenPage, NewBlock};

/// User-Agent string for Notion requests.
const USER_AGENT: &str = concat!("togglenote/", env!("CARGO_PKG_VERSION"));

/// Version header required on every Notion request.
const NOTION_VERSION: HeaderName = HeaderName::from_static("notion-version");

/// Longest slice of an unparseable error body echoed into an error message.
const MAX_ERROR_BODY: usize = 200;

/// Short-lived Notion client bound to one caller's integration token.
///
/// Built per request so that no process-wide value ever holds a caller's credential.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: Client,
    base_url: Url,
}

impl NotionClient {
    /// Build a client that sends `api_key` as a bearer token on every request.
    pub fn new(api_key: &str, config: &NotionConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| TogglenoteError::validation("notion API key contains invalid characters"))?;
        auth.set_sensitive(true);

        let version = HeaderValue::from_str(&config.api_version).map_err(|_| {
            TogglenoteError::config(format!("invalid Notion-Version {:?}", config.api_version))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(NOTION_VERSION, version);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TogglenoteError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
        })
    }

    /// `{base}/blocks/{id}/children`, with the id kept to a single path segment.
    fn children_url(&self, block_id: &BlockId) -> Result<Url> {
        let id = block_id.as_str();
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '?', '#', '\\']) {
            return Err(TogglenoteError::validation(format!("invalid block id {id:?}")));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TogglenoteError::config(format!("base URL {} cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["blocks", id, "children"]);
        Ok(url)
    }
}

impl BlocksApi for NotionClient {
    #[instrument(skip_all, fields(block_id = %block_id))]
    async fn list_children(&self, block_id: &BlockId) -> Result<Vec<Block>> {
        let url = self.children_url(block_id)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TogglenoteError::Network(format!("{url}: {e}")))?;

        let body = read_success_body(response, &url).await?;
        let page: ChildrenPage = serde_json::from_str(&body)
            .map_err(|e| TogglenoteError::Decode(format!("{url}: {e}")))?;

        if page.has_more {
            debug!("child listing truncated to the first page");
        }
        debug!(children = page.results.len(), "listed children");

        Ok(page.results)
    }

    #[instrument(skip_all, fields(block_id = %block_id))]
    async fn append_numbered_item(&self, block_id: &BlockId, text: &str) -> Result<()> {
        let url = self.children_url(block_id)?;
        let body = AppendChildren::single(NewBlock::numbered_item(text));

        let response = self
            .client
            .patch(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| TogglenoteError::Network(format!("{url}: {e}")))?;

        read_success_body(response, &url).await?;
        Ok(())
    }
}

/// Read the response body, turning non-success statuses into [`TogglenoteError::Notion`].
async fn read_success_body(response: Response, url: &Url) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TogglenoteError::Network(format!("{url}: failed to read body: {e}")))?;

    if status.is_success() {
        return Ok(body);
    }

    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(err) if !err.message.is_empty() => format!("{}: {}", err.code, err.message),
        _ => body.chars().take(MAX_ERROR_BODY).collect(),
    };

    Err(TogglenoteError::Notion {
        status: status.as_u16(),
        message,
    })
}
