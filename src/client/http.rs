//! HTTP implementation of the assistant backend
//!
//! Talks to the study-assistant service over plain HTTP: JSON for `/history`
//! and `/ask`, multipart form data for `/upload`.

use crate::client::{AskReply, AskRequest, AssistantBackend, UploadFile, UploadReply};
use crate::config::ServerConfig;
use crate::error::{Result, ScholarError};
use crate::session::SessionStore;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// `reqwest`-backed [`AssistantBackend`]
///
/// # Examples
///
/// ```no_run
/// use scholar::client::{AssistantBackend, HttpBackend};
/// use scholar::config::ServerConfig;
///
/// # async fn example() -> scholar::error::Result<()> {
/// let backend = HttpBackend::new(&ServerConfig::default())?;
/// let history = backend.fetch_history().await?;
/// println!("{} sessions", history.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a backend for the configured service address
    ///
    /// # Errors
    ///
    /// Returns [`ScholarError::Config`] if the base URL does not parse, and
    /// [`ScholarError::Transport`] if the HTTP client cannot be built
    ///
    /// # Examples
    ///
    /// ```
    /// use scholar::client::HttpBackend;
    /// use scholar::config::ServerConfig;
    ///
    /// let backend = HttpBackend::new(&ServerConfig::default()).unwrap();
    /// assert_eq!(backend.base_url().as_str(), "http://localhost:8000/");
    /// ```
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| {
            ScholarError::Config(format!("Invalid base URL {}: {}", config.base_url, e))
        })?;
        // Endpoints are joined relative to the base, so it must end in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ScholarError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized assistant backend: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ScholarError::Config(format!("Invalid endpoint {}: {}", path, e)).into())
    }
}

fn transport_error(call: &str, error: reqwest::Error) -> ScholarError {
    match error.status() {
        Some(status) => ScholarError::Transport(format!("{} returned {}", call, status)),
        None => ScholarError::Transport(format!("{} failed: {}", call, error)),
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn fetch_history(&self) -> Result<SessionStore> {
        let url = self.endpoint("history")?;
        tracing::debug!(%url, "Fetching history");

        let store = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| transport_error("GET /history", e))?
            .json::<SessionStore>()
            .await
            .map_err(|e| transport_error("GET /history", e))?;

        tracing::debug!(sessions = store.len(), "History fetched");
        Ok(store)
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskReply> {
        let url = self.endpoint("ask")?;
        tracing::debug!(
            %url,
            session_id = %request.session_id,
            mode = %request.mode,
            "Sending question"
        );

        let reply = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| transport_error("POST /ask", e))?
            .json::<AskReply>()
            .await
            .map_err(|e| transport_error("POST /ask", e))?;

        Ok(reply)
    }

    async fn upload(&self, file: &UploadFile) -> Result<UploadReply> {
        let url = self.endpoint("upload")?;
        tracing::debug!(
            %url,
            file = %file.name,
            content_type = %file.content_type,
            size = file.bytes.len(),
            "Uploading file"
        );

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ScholarError::Upload(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let reply = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| transport_error("POST /upload", e))?
            .json::<UploadReply>()
            .await
            .map_err(|e| transport_error("POST /upload", e))?;

        Ok(reply)
    }
}
