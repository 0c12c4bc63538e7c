//! Wire types for the assistant service and the tagged outcomes they settle into

use crate::chat_mode::ChatMode;
use crate::error::{Result, ScholarError};
use crate::session::{Message, SessionId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Assistant reply shown when the backend could not be reached
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error. Is the backend running?";

/// Assistant reply shown when a document could not be analyzed
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to analyze file. Only PDF and DOCX are supported.";

const PDF_CONTENT_TYPE: &str = "application/pdf";
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Body of `POST /ask`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub session_id: SessionId,
    pub mode: ChatMode,
}

/// Body returned by `POST /ask`
///
/// The service answers with either `answer` or `error`; both are optional so
/// that a partial payload still decodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AskReply {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body returned by `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReply {
    pub filename: String,
    pub analysis: String,
}

/// A document staged for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Build an upload from in-memory bytes, inferring the content type from
    /// the file extension
    ///
    /// # Examples
    ///
    /// ```
    /// use scholar::client::UploadFile;
    ///
    /// let file = UploadFile::new("notes.pdf", b"%PDF-1.7".to_vec());
    /// assert_eq!(file.content_type, "application/pdf");
    /// ```
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = infer_content_type(&name).to_string();
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk for upload
    ///
    /// # Errors
    ///
    /// Returns [`ScholarError::Upload`] if the path has no file name, and an
    /// IO error if the file cannot be read
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ScholarError::Upload(format!("Not a file path: {}", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await.map_err(ScholarError::Io)?;
        tracing::debug!(file = %name, size = bytes.len(), "Staged file for upload");
        Ok(Self::new(name, bytes))
    }
}

fn infer_content_type(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    match extension.as_deref() {
        Some("pdf") => PDF_CONTENT_TYPE,
        Some("docx") => DOCX_CONTENT_TYPE,
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// Settled result of an ask round trip
///
/// Every variant is a recovered outcome that ends up in the transcript as an
/// assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// The service answered
    Answer(String),
    /// The round trip succeeded but the payload carried an error
    AppError(String),
    /// The service could not be reached or replied with garbage
    TransportError,
}

impl AskOutcome {
    /// Classify a decoded `/ask` payload
    ///
    /// An empty `error` string counts as no error, and a missing `answer`
    /// becomes an empty reply.
    ///
    /// # Examples
    ///
    /// ```
    /// use scholar::client::{AskOutcome, AskReply};
    ///
    /// let reply = AskReply { answer: None, error: Some("rate limited".into()) };
    /// assert_eq!(AskOutcome::from_reply(reply), AskOutcome::AppError("rate limited".into()));
    /// ```
    pub fn from_reply(reply: AskReply) -> Self {
        match reply.error {
            Some(error) if !error.is_empty() => Self::AppError(error),
            _ => Self::Answer(reply.answer.unwrap_or_default()),
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer(_))
    }

    /// Assistant message recording this outcome
    pub fn to_message(&self) -> Message {
        match self {
            Self::Answer(answer) => Message::assistant(answer.clone()),
            Self::AppError(error) => Message::assistant(format!("Error: {}", error)),
            Self::TransportError => Message::assistant(CONNECTION_ERROR_MESSAGE),
        }
    }
}

/// Settled result of an upload round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The document was analyzed
    Analyzed {
        /// Local name of the uploaded file
        name: String,
        /// File name reported by the service
        filename: String,
        /// Extracted analysis text
        analysis: String,
    },
    /// Upload or analysis failed
    Failed,
}

impl UploadOutcome {
    pub fn analyzed(name: impl Into<String>, reply: UploadReply) -> Self {
        Self::Analyzed {
            name: name.into(),
            filename: reply.filename,
            analysis: reply.analysis,
        }
    }

    /// Messages this outcome appends, in order
    ///
    /// A successful analysis appends a user/assistant pair; a failure appends
    /// a single advisory.
    pub fn to_messages(&self) -> Vec<Message> {
        match self {
            Self::Analyzed {
                name,
                filename,
                analysis,
            } => vec![
                Message::user(format!("Uploaded file: {}", name)),
                Message::assistant(format!("# File Analysis: {}\n\n{}", filename, analysis)),
            ],
            Self::Failed => vec![Message::assistant(UPLOAD_FAILED_MESSAGE)],
        }
    }
}
