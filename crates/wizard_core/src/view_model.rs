use std::path::PathBuf;

use crate::forms::{AnnotationForm, ChannelSelection, EpochForm, FilterForm, FilterKind, MontageForm};
use crate::page::PagePhase;
use crate::state::VisualizationSlot;
use crate::{AppState, ArtifactId, ArtifactTracker, DatasetMetadata, PipelineStep, Stage, VisualizationKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub stage: Stage,
    pub completed: bool,
    pub current: bool,
    /// Artifact recorded the first time this stage completed.
    pub artifact_id: Option<ArtifactId>,
}

/// Projects the tracker history onto the fixed wizard stages.
pub fn timeline(tracker: &ArtifactTracker, route: Stage) -> Vec<TimelineEntry> {
    Stage::ALL
        .into_iter()
        .map(|stage| TimelineEntry {
            stage,
            completed: tracker.has_completed(stage.id()),
            current: stage == route,
            artifact_id: tracker.artifact_for(stage.id()).cloned(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    Upload {
        file: Option<PathBuf>,
    },
    Metadata(Option<DatasetMetadata>),
    Channels(ChannelSelection),
    Montage(MontageForm),
    Annotations(AnnotationForm),
    Filter {
        form: FilterForm,
        kind: FilterKind,
        description: String,
    },
    Epochs(EpochForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub stage: Stage,
    pub phase: PagePhase,
    pub error: Option<String>,
    pub loading: bool,
    pub body: PageBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRow {
    pub id: ArtifactId,
    pub filename: String,
    pub size_bytes: u64,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidebarView {
    pub rows: Vec<DatasetRow>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizationRow {
    pub kind: VisualizationKind,
    pub slot: Option<VisualizationSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub route: Stage,
    pub current_artifact: Option<ArtifactId>,
    pub previous_artifact: Option<ArtifactId>,
    pub history: Vec<PipelineStep>,
    pub timeline: Vec<TimelineEntry>,
    pub can_reset: bool,
    pub page: PageView,
    pub sidebar: SidebarView,
    pub visualizations: Vec<VisualizationRow>,
    pub dirty: bool,
}

pub(crate) fn project(state: &AppState, dirty: bool) -> AppViewModel {
    let tracker = &state.tracker;
    let route = state.route;
    let page = state.page(route);
    let forms = &state.forms;

    let body = match route {
        Stage::Upload => PageBody::Upload {
            file: forms.upload.file.clone(),
        },
        Stage::Metadata => PageBody::Metadata(state.metadata.clone()),
        Stage::Channels => PageBody::Channels(forms.channels.clone()),
        Stage::Montage => PageBody::Montage(forms.montage.clone()),
        Stage::Annotations => PageBody::Annotations(forms.annotations.clone()),
        Stage::Filter => PageBody::Filter {
            form: forms.filter.clone(),
            kind: forms.filter.kind(),
            description: forms.filter.description(),
        },
        Stage::Epochs => PageBody::Epochs(forms.epochs.clone()),
    };

    let current = tracker.current().cloned();
    let rows = state
        .sidebar
        .datasets
        .iter()
        .map(|dataset| DatasetRow {
            id: ArtifactId::new(dataset.id.clone()),
            filename: dataset.original_filename.clone(),
            size_bytes: dataset.size_bytes,
            is_current: current.as_ref().is_some_and(|id| id.as_str() == dataset.id),
        })
        .collect();

    let visualizations = match &current {
        Some(artifact_id) => VisualizationKind::ALL
            .into_iter()
            .map(|kind| VisualizationRow {
                kind,
                slot: state.visualization(artifact_id, kind).cloned(),
            })
            .collect(),
        None => Vec::new(),
    };

    AppViewModel {
        route,
        current_artifact: current,
        previous_artifact: tracker.previous().cloned(),
        history: tracker.history().to_vec(),
        timeline: timeline(tracker, route),
        can_reset: !tracker.is_empty(),
        page: PageView {
            stage: route,
            phase: page.phase().clone(),
            error: page.error().map(ToOwned::to_owned),
            loading: page.is_loading(),
            body,
        },
        sidebar: SidebarView {
            rows,
            loading: state.sidebar.loading,
            error: state.sidebar.error.clone(),
        },
        visualizations,
        dirty,
    }
}
