use std::fmt;

use thiserror::Error;
use wizard_core::{ArtifactId, DatasetMetadata, DatasetSummary, Stage, VisualizationKind};

/// A failed backend call. `message` is what the user gets to read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    LocalFile,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::LocalFile => write!(f, "local file error"),
        }
    }
}

/// Completion of one queued client command.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    StageCompleted {
        stage: Stage,
        origin: Option<ArtifactId>,
        result: Result<ArtifactId, ApiError>,
    },
    MetadataFetched {
        artifact_id: ArtifactId,
        result: Result<DatasetMetadata, ApiError>,
    },
    ChannelsFetched {
        artifact_id: ArtifactId,
        result: Result<Vec<String>, ApiError>,
    },
    EventNamesFetched {
        artifact_id: ArtifactId,
        result: Result<Vec<String>, ApiError>,
    },
    DatasetsFetched {
        result: Result<Vec<DatasetSummary>, ApiError>,
    },
    DatasetDeleted {
        id: ArtifactId,
        result: Result<(), ApiError>,
    },
    VisualizationFetched {
        artifact_id: ArtifactId,
        kind: VisualizationKind,
        result: Result<Vec<u8>, ApiError>,
    },
}
