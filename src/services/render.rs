// src/services/render.rs

//! Client for the headless render service.
//!
//! Pages behind this crawler need JavaScript to produce their markup,
//! so rendering is delegated to a sidecar (a Puppeteer service) that
//! takes `{url, selector}` and answers `{html}` once the selector has
//! appeared in the rendered DOM.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::RendererConfig;

/// Anything that can turn a URL into rendered HTML.
///
/// The engine is generic over this seam; tests drive it with stubs.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render the page at `url` and return its HTML. `selector` tells
    /// the renderer which element to wait for before snapshotting.
    async fn render(&self, url: &str, selector: &str) -> Result<String>;
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    url: &'a str,
    selector: &'a str,
}

#[derive(Deserialize)]
struct RenderResponse {
    html: String,
}

/// HTTP client for the render sidecar.
///
/// Cheap to clone; the underlying connection pool is shared, so one
/// instance serves all workers concurrently.
#[derive(Clone)]
pub struct RenderClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RenderClient {
    /// Create a client with the configured endpoint and per-request
    /// timeout.
    pub fn new(config: &RendererConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl Renderer for RenderClient {
    async fn render(&self, url: &str, selector: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RenderRequest { url, selector })
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let rendered: RenderResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::MalformedResponse(e.to_string()))?;

        if rendered.html.trim().is_empty() {
            return Err(AppError::EmptyContent {
                url: url.to_string(),
            });
        }

        Ok(rendered.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_request_wire_shape() {
        let request = RenderRequest {
            url: "https://example.com/events",
            selector: "div.events-elem",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["url"], "https://example.com/events");
        assert_eq!(json["selector"], "div.events-elem");
    }

    #[test]
    fn render_response_requires_html_field() {
        assert!(serde_json::from_str::<RenderResponse>(r#"{"html":"<div/>"}"#).is_ok());
        assert!(serde_json::from_str::<RenderResponse>(r#"{"page":"<div/>"}"#).is_err());
    }
}
