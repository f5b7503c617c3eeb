use std::fmt;

use serde::Deserialize;

/// Summary facts about a dataset, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetMetadata {
    pub duration_seconds: f64,
    pub sampling_frequency_hz: f64,
    pub time_points: u64,
    pub eeg_channel_count: u32,
    pub highpass_hz: f64,
    pub lowpass_hz: f64,
}

/// One row of the dataset sidebar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetSummary {
    pub id: String,
    pub original_filename: String,
    pub size_bytes: u64,
    pub created_at: f64,
    pub modified_at: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VisualizationKind {
    Psd,
    Raw,
    Topomap,
    Spectrogram,
}

impl VisualizationKind {
    pub const ALL: [VisualizationKind; 4] = [
        VisualizationKind::Psd,
        VisualizationKind::Raw,
        VisualizationKind::Topomap,
        VisualizationKind::Spectrogram,
    ];

    /// Path segment used by the visualization endpoint.
    pub fn id(self) -> &'static str {
        match self {
            VisualizationKind::Psd => "psd",
            VisualizationKind::Raw => "raw",
            VisualizationKind::Topomap => "topomap",
            VisualizationKind::Spectrogram => "spectrogram",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VisualizationKind::Psd => "PSD Plot",
            VisualizationKind::Raw => "Raw Signal",
            VisualizationKind::Topomap => "Topomap",
            VisualizationKind::Spectrogram => "Spectrogram",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id.trim()))
    }
}

impl fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A fetched image, saved by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizationImage {
    pub byte_len: u64,
    pub location: String,
}
