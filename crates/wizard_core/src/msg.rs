use std::path::PathBuf;

use crate::forms::{BaselineOption, ColumnField};
use crate::{ArtifactId, DatasetMetadata, DatasetSummary, Stage, VisualizationImage, VisualizationKind};

/// A single edit to the form of the page being shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    UploadFile(PathBuf),
    /// A CSV was read; `header_text` holds its leading bytes.
    AnnotationsFile { path: PathBuf, header_text: String },
    /// The CSV could not be read from disk.
    AnnotationsFileUnreadable { message: String },
    ClearAnnotationsFile,
    MapColumn { field: ColumnField, column: String },
    ToggleChannel(String),
    SelectAllChannels,
    SelectTenTwenty,
    ClearChannels,
    MontageName(String),
    FilterLow(String),
    FilterHigh(String),
    Tmin(String),
    Tmax(String),
    Baseline(BaselineOption),
    RejectEeg(String),
    ToggleReference,
    ToggleEvent(String),
    SelectAllEvents,
    ClearEvents,
    /// Index into the preset list of the page being shown.
    Preset(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User moved to another wizard page.
    Navigate(Stage),
    /// User changed a form field on the current page.
    Edit(FormEdit),
    /// User submitted the current page.
    SubmitClicked,
    /// Backend accepted a stage request and produced a new artifact.
    StageSucceeded {
        stage: Stage,
        origin: Option<ArtifactId>,
        artifact_id: ArtifactId,
    },
    /// Stage request failed at the transport or backend.
    StageFailed {
        stage: Stage,
        origin: Option<ArtifactId>,
        message: String,
    },
    MetadataLoaded {
        artifact_id: ArtifactId,
        metadata: DatasetMetadata,
    },
    ChannelsLoaded {
        artifact_id: ArtifactId,
        channels: Vec<String>,
    },
    EventNamesLoaded {
        artifact_id: ArtifactId,
        events: Vec<String>,
    },
    /// An on-entry fetch for a page failed.
    PageLoadFailed {
        stage: Stage,
        artifact_id: ArtifactId,
        message: String,
    },
    /// User clicked Reset Pipeline.
    ResetClicked,
    /// Sidebar should re-fetch the dataset list.
    DatasetsRefreshRequested,
    DatasetsLoaded(Vec<DatasetSummary>),
    DatasetsLoadFailed(String),
    /// User picked a dataset from the sidebar.
    DatasetSelected(ArtifactId),
    DeleteDatasetClicked(ArtifactId),
    DatasetDeleted(ArtifactId),
    DatasetDeleteFailed {
        id: ArtifactId,
        message: String,
    },
    VisualizationRequested(VisualizationKind),
    VisualizationLoaded {
        artifact_id: ArtifactId,
        kind: VisualizationKind,
        image: VisualizationImage,
    },
    VisualizationFailed {
        artifact_id: ArtifactId,
        kind: VisualizationKind,
        message: String,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
