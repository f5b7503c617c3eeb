//! Wizard core: artifact tracking, stage forms, and the pure state machine.
mod catalog;
mod effect;
pub mod forms;
mod msg;
mod page;
mod stage;
mod state;
mod tracker;
mod update;
mod view_model;

pub use catalog::{DatasetMetadata, DatasetSummary, VisualizationImage, VisualizationKind};
pub use effect::Effect;
pub use msg::{FormEdit, Msg};
pub use page::{PagePhase, PageState};
pub use stage::Stage;
pub use state::{AppState, Forms, SidebarState, VisualizationSlot};
pub use tracker::{ArtifactId, ArtifactTracker, PipelineStep, TrackerEvent};
pub use update::{update, STALE_RESULT_MESSAGE};
pub use view_model::{
    timeline, AppViewModel, DatasetRow, PageBody, PageView, SidebarView, TimelineEntry,
    VisualizationRow,
};
