use std::future::Future;

use reqwest::Url;

use data::EngineConfig;

use crate::FetchError;
use crate::payload::{GraphRequest, HoverRequest, LoadRequest};
use crate::response::{self, AjaxGraph, HoverData};

/// Anything that can answer graph requests.
///
/// The engine only talks to this trait, tests plug in scripted backends.
pub trait GraphBackend: Clone + Send + Sync + 'static {
    fn refresh(
        &self,
        request: GraphRequest,
    ) -> impl Future<Output = Result<AjaxGraph, FetchError>> + Send;

    fn hover(
        &self,
        request: HoverRequest,
    ) -> impl Future<Output = Result<HoverData, FetchError>> + Send;

    fn load(&self, request: LoadRequest)
    -> impl Future<Output = Result<AjaxGraph, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    graph_url: Url,
    hover_url: Url,
    content_url: Url,
}

impl HttpBackend {
    pub fn new(config: &EngineConfig) -> Result<Self, FetchError> {
        let base = Url::parse(&config.base_url)?;

        Ok(Self {
            client: reqwest::Client::new(),
            graph_url: base.join(&config.endpoints.graph)?,
            hover_url: base.join(&config.endpoints.hover)?,
            content_url: base.join(&config.endpoints.content)?,
        })
    }

    async fn post_form(&self, url: &Url, form: &[(&str, String)]) -> Result<String, FetchError> {
        let response = self.client.post(url.clone()).form(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{} answered with {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

impl GraphBackend for HttpBackend {
    async fn refresh(&self, request: GraphRequest) -> Result<AjaxGraph, FetchError> {
        let body = self.post_form(&self.graph_url, &request.form()?).await?;
        response::decode(&body)
    }

    async fn hover(&self, request: HoverRequest) -> Result<HoverData, FetchError> {
        let body = self.post_form(&self.hover_url, &request.form()?).await?;
        response::decode(&body)
    }

    async fn load(&self, request: LoadRequest) -> Result<AjaxGraph, FetchError> {
        let body = self.post_form(&self.content_url, &request.form()?).await?;
        response::decode(&body)
    }
}
