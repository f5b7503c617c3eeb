//! Per-stage form state and the local validation that runs before any request.
mod annotations;
mod channels;
mod epochs;
mod filter;
mod montage;
mod upload;

pub use annotations::{
    auto_map_columns, parse_csv_header, AnnotationForm, AnnotationsRequest, ColumnField,
    ColumnMapping, CSV_HEADER_PREFIX_BYTES,
};
pub use channels::{ChannelSelection, PickChannelsRequest, PickMode, TEN_TWENTY};
pub use epochs::{
    BaselineOption, EpochForm, EpochPreset, EpochsRequest, RejectCriteria, EPOCH_PRESETS,
};
pub use filter::{FilterForm, FilterKind, FilterPreset, FilterRequest, FILTER_PRESETS};
pub use montage::{MontageForm, MontagePreset, MontageRequest, DEFAULT_MONTAGE, MONTAGE_PRESETS};
pub use upload::{UploadForm, UploadRequest};

use crate::Stage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("select a file first")]
    NoFileSelected,
    #[error("unsupported file type: expected an .edf recording")]
    UnsupportedFileType,
    #[error("select at least one channel")]
    NoChannelsSelected,
    #[error("enter a montage name")]
    EmptyMontageName,
    #[error("select a CSV file")]
    NoCsvFile,
    #[error("could not parse CSV headers; check the file format")]
    UnparsableCsvHeader,
    #[error("map all three columns: onset, duration, and description")]
    UnmappedColumns,
    #[error("column {0:?} is not present in the CSV header")]
    UnknownColumn(String),
    #[error("no filter specified: enter at least one frequency (low or high)")]
    NoFilterSpecified,
    #[error("low frequency must be a positive number")]
    InvalidLowFrequency,
    #[error("high frequency must be a positive number")]
    InvalidHighFrequency,
    #[error("low frequency must be less than high frequency for a band-pass filter")]
    BandOrder,
    #[error("enter valid time values for tmin and tmax")]
    InvalidTimeWindow,
    #[error("tmin must be less than tmax")]
    TminNotBeforeTmax,
    #[error("invalid baseline start value")]
    InvalidBaselineStart,
    #[error("invalid baseline end value")]
    InvalidBaselineEnd,
    #[error("reject threshold must be a positive number")]
    InvalidRejectThreshold,
    #[error("unknown preset {0}")]
    UnknownPreset(usize),
}

/// A validated outbound operation for one stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageRequest {
    Upload(UploadRequest),
    Metadata,
    PickChannels(PickChannelsRequest),
    SetMontage(MontageRequest),
    SetAnnotations(AnnotationsRequest),
    Filter(FilterRequest),
    CreateEpochs(EpochsRequest),
}

impl StageRequest {
    pub fn stage(&self) -> Stage {
        match self {
            StageRequest::Upload(_) => Stage::Upload,
            StageRequest::Metadata => Stage::Metadata,
            StageRequest::PickChannels(_) => Stage::Channels,
            StageRequest::SetMontage(_) => Stage::Montage,
            StageRequest::SetAnnotations(_) => Stage::Annotations,
            StageRequest::Filter(_) => Stage::Filter,
            StageRequest::CreateEpochs(_) => Stage::Epochs,
        }
    }
}

/// Parsed state of a free-text numeric input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NumberInput {
    Empty,
    Value(f64),
    Invalid,
}

impl NumberInput {
    pub(crate) fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return NumberInput::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => NumberInput::Value(value),
            _ => NumberInput::Invalid,
        }
    }

    pub(crate) fn value(self) -> Option<f64> {
        match self {
            NumberInput::Value(value) => Some(value),
            NumberInput::Empty | NumberInput::Invalid => None,
        }
    }
}

/// Adds `item` when absent, removes it when present. Keeps insertion order.
pub(crate) fn toggle(list: &mut Vec<String>, item: &str) {
    if let Some(pos) = list.iter().position(|existing| existing == item) {
        list.remove(pos);
    } else {
        list.push(item.to_string());
    }
}
