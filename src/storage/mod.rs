use std::sync::Arc;

use crate::config::BackendConfig;
use crate::models::Note;

use self::local::LocalBackend;
use self::remote::RemoteBackend;

pub mod device;
pub mod local;
pub mod remote;

/// Most notes a board ever reads or keeps on a device.
pub const MAX_NOTES: usize = 24;

/// Most notes a running board holds in memory; older ones drop off the end.
pub const MAX_SESSION_NOTES: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("backend key is not a valid header value: {0}")]
    InvalidKey(#[from] reqwest::header::InvalidHeaderValue),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
}

pub trait NoteBackend {
    /// Whether notes written here are visible to every visitor
    fn is_shared(&self) -> bool;

    /// Up to [`MAX_NOTES`] notes, newest first
    fn fetch_notes(&self) -> impl std::future::Future<Output = Result<Vec<Note>, BackendError>> + Send;

    /// Stores one note and returns its canonical representation
    fn create_note(
        &self,
        note: &Note,
    ) -> impl std::future::Future<Output = Result<Note, BackendError>> + Send;
}

#[derive(Debug)]
pub enum AnyBackend {
    Remote(RemoteBackend),
    Local(Arc<LocalBackend>),
}

impl NoteBackend for AnyBackend {
    fn is_shared(&self) -> bool {
        match self {
            Self::Remote(backend) => backend.is_shared(),
            Self::Local(backend) => backend.is_shared(),
        }
    }

    async fn fetch_notes(&self) -> Result<Vec<Note>, BackendError> {
        match self {
            Self::Remote(backend) => backend.fetch_notes().await,
            Self::Local(backend) => backend.fetch_notes().await,
        }
    }

    async fn create_note(&self, note: &Note) -> Result<Note, BackendError> {
        match self {
            Self::Remote(backend) => backend.create_note(note).await,
            Self::Local(backend) => backend.create_note(note).await,
        }
    }
}

/// Picks the remote backend when both url and key are set, the device
/// store otherwise.
pub fn select_backend(
    config: &BackendConfig,
    local: Arc<LocalBackend>,
) -> Result<AnyBackend, BackendError> {
    if !config.is_configured() {
        tracing::info!("No remote backend configured, notes stay on this device");
        return Ok(AnyBackend::Local(local));
    }

    let remote = RemoteBackend::new(config)?;
    tracing::info!("Using shared board at {}", remote.collection_url());
    Ok(AnyBackend::Remote(remote))
}
