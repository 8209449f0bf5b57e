use async_trait::async_trait;
use log::{error, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;
use validator::Validate;

use crate::error::ClientError;
use crate::exchange::Exchange;
use crate::upload::StagedFile;

/// The remote side that classifies a message and drafts a reply.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify_text(&self, request: &TextRequest) -> Result<Exchange, ClientError>;

    async fn classify_file(&self, file: &StagedFile) -> Result<Exchange, ClientError>;
}

/// JSON body of a typed-message submission.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct TextRequest {
    #[validate(length(min = 1))]
    pub prompt: String,
}

impl TextRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

#[derive(Clone)]
pub struct HttpClassifier {
    client: Client,
    endpoint: Url,
}

impl HttpClassifier {
    pub fn new(endpoint: Url) -> Result<Self, ClientError> {
        // No timeout: a request resolves whenever the transport does
        let client = Client::builder()
            .user_agent(concat!("Emailer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn read_exchange(&self, response: Response) -> Result<Exchange, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Classifier API error: HTTP {}: {}", status, body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let exchange: Exchange = serde_json::from_str(&body)?;
        info!(
            "Received classification from {} (productive: {})",
            self.endpoint, exchange.productive
        );
        Ok(exchange)
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify_text(&self, request: &TextRequest) -> Result<Exchange, ClientError> {
        info!("Sending message to classifier ({} chars)", request.prompt.chars().count());

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        self.read_exchange(response).await
    }

    async fn classify_file(&self, file: &StagedFile) -> Result<Exchange, ClientError> {
        info!(
            "Uploading {} ({}, {}) to classifier",
            file.name,
            file.mime,
            file.size_label()
        );

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        self.read_exchange(response).await
    }
}
