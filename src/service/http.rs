use crate::{
    config::Config,
    error::{FlowgenError, Result},
    models::{
        ErrorResponseBody, GenerateRequestBody, GenerateResponseBody, GenerationRequest,
        ImageReference,
    },
    service::traits::GenerationService,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

#[derive(Clone)]
pub struct HttpGenerationService {
    client: Client,
    endpoint: String,
}

impl HttpGenerationService {
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = config.endpoint_url()?.to_string();
        Ok(Self::with_client(Client::new(), endpoint))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageReference> {
        let payload = GenerateRequestBody {
            query: request.query.clone(),
        };

        log::info!("Submitting generation request {} to {}", request.id, self.endpoint);
        log::debug!("Generation request {} query: {:?}", request.id, request.query);

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.build_headers())
            .json(&payload)
            .send()
            .await
            .map_err(|e| FlowgenError::Transport(format!("generation request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FlowgenError::Transport(format!("failed to read response body: {}", e)))?;

        log::debug!("Generation request {} answered with {}", request.id, status);

        if status.is_success() {
            parse_success(&body)
        } else {
            Err(parse_rejection(status, &body))
        }
    }
}

fn parse_success(body: &str) -> Result<ImageReference> {
    let parsed: GenerateResponseBody = serde_json::from_str(body)
        .map_err(|e| FlowgenError::MalformedResponse(format!("invalid success body: {}", e)))?;

    parsed
        .img_url
        .and_then(ImageReference::new)
        .ok_or_else(|| FlowgenError::MalformedResponse("success body has no img_url".into()))
}

fn parse_rejection(status: StatusCode, body: &str) -> FlowgenError {
    let parsed: ErrorResponseBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            return FlowgenError::MalformedResponse(format!(
                "invalid error body for status {}: {}",
                status, e
            ))
        }
    };

    // The upstream server reports empty queries under `message` instead of `error`.
    let non_blank = |m: &String| !m.trim().is_empty();
    match parsed.error.filter(non_blank).or(parsed.message.filter(non_blank)) {
        Some(message) => FlowgenError::Rejected {
            status: status.as_u16(),
            message,
        },
        None => FlowgenError::MalformedResponse(format!(
            "error body for status {} has no message",
            status
        )),
    }
}
