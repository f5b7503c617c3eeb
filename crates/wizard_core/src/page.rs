use wizard_logging::wizard_debug;

use crate::{ArtifactId, Stage};

/// Lifecycle of one stage page's submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PagePhase {
    #[default]
    Idle,
    Validating,
    /// A request issued against `origin` is in flight.
    Submitting { origin: Option<ArtifactId> },
    Succeeded { artifact_id: ArtifactId },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageState {
    phase: PagePhase,
    error: Option<String>,
    loading: bool,
}

impl PageState {
    pub fn phase(&self) -> &PagePhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, PagePhase::Submitting { .. })
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub(crate) fn begin_validation(&mut self, stage: Stage) {
        wizard_debug!("{} page: validating", stage.id());
        self.phase = PagePhase::Validating;
        self.error = None;
    }

    pub(crate) fn begin_submit(&mut self, stage: Stage, origin: Option<ArtifactId>) {
        wizard_debug!("{} page: submitting", stage.id());
        self.phase = PagePhase::Submitting { origin };
    }

    pub(crate) fn succeed(&mut self, artifact_id: ArtifactId) {
        self.phase = PagePhase::Succeeded { artifact_id };
        self.error = None;
    }

    /// Shows `message` and returns the page to `Idle`.
    pub(crate) fn fail(&mut self, stage: Stage, message: impl Into<String>) {
        let message = message.into();
        wizard_debug!("{} page: failed: {}", stage.id(), message);
        self.phase = PagePhase::Idle;
        self.error = Some(message);
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.error = None;
        }
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}
