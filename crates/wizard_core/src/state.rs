use std::collections::BTreeMap;

use crate::forms::{AnnotationForm, ChannelSelection, EpochForm, FilterForm, MontageForm, UploadForm};
use crate::page::PageState;
use crate::view_model::{self, AppViewModel};
use crate::{
    ArtifactId, ArtifactTracker, DatasetMetadata, DatasetSummary, Stage, VisualizationImage,
    VisualizationKind,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Forms {
    pub upload: UploadForm,
    pub channels: ChannelSelection,
    pub montage: MontageForm,
    pub annotations: AnnotationForm,
    pub filter: FilterForm,
    pub epochs: EpochForm,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SidebarState {
    pub datasets: Vec<DatasetSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualizationSlot {
    Loading,
    Ready(VisualizationImage),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) tracker: ArtifactTracker,
    pub(crate) route: Stage,
    pub(crate) pages: BTreeMap<Stage, PageState>,
    pub(crate) forms: Forms,
    pub(crate) metadata: Option<DatasetMetadata>,
    pub(crate) sidebar: SidebarState,
    /// Images fetched during the current page view.
    pub(crate) visualizations: BTreeMap<(ArtifactId, VisualizationKind), VisualizationSlot>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracker(&self) -> &ArtifactTracker {
        &self.tracker
    }

    pub fn route(&self) -> Stage {
        self.route
    }

    pub fn forms(&self) -> &Forms {
        &self.forms
    }

    pub fn page(&self, stage: Stage) -> PageState {
        self.pages.get(&stage).cloned().unwrap_or_default()
    }

    pub fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    pub fn visualization(&self, artifact_id: &ArtifactId, kind: VisualizationKind) -> Option<&VisualizationSlot> {
        self.visualizations.get(&(artifact_id.clone(), kind))
    }

    pub fn view(&self) -> AppViewModel {
        view_model::project(self, self.dirty)
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn page_mut(&mut self, stage: Stage) -> &mut PageState {
        self.pages.entry(stage).or_default()
    }

    /// Drops everything tied to the previous dataset lineage.
    pub(crate) fn clear_session(&mut self) {
        self.pages.clear();
        self.forms = Forms::default();
        self.metadata = None;
        self.visualizations.clear();
    }
}
