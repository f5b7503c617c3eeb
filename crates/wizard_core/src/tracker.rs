use std::fmt;

use chrono::{DateTime, Utc};

/// Opaque token naming one backend-held version of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters followed by `...`, as shown in the timeline.
    pub fn short(&self) -> String {
        wizard_logging::short_id(&self.0)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ArtifactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStep {
    pub stage: String,
    pub artifact_id: ArtifactId,
    pub timestamp: DateTime<Utc>,
}

/// Change notification published whenever the tracker is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    StageRecorded { stage: String, artifact_id: ArtifactId },
    /// History was cleared and restarted at `artifact_id`.
    LineageStarted { stage: String, artifact_id: ArtifactId },
    Reset,
}

/// Current/previous artifact ids plus the ordered stage history.
///
/// `current` always equals the artifact of the last history entry, or is
/// unset while the history is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactTracker {
    current: Option<ArtifactId>,
    previous: Option<ArtifactId>,
    history: Vec<PipelineStep>,
}

impl ArtifactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ArtifactId> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&ArtifactId> {
        self.previous.as_ref()
    }

    pub fn history(&self) -> &[PipelineStep] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn record_stage(&mut self, artifact_id: ArtifactId, stage: impl Into<String>) -> TrackerEvent {
        self.record_stage_at(artifact_id, stage, Utc::now())
    }

    /// Same as [`record_stage`](Self::record_stage) with an explicit timestamp.
    pub fn record_stage_at(
        &mut self,
        artifact_id: ArtifactId,
        stage: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> TrackerEvent {
        let stage = stage.into();
        self.previous = self.current.replace(artifact_id.clone());
        self.history.push(PipelineStep {
            stage: stage.clone(),
            artifact_id: artifact_id.clone(),
            timestamp,
        });
        TrackerEvent::StageRecorded { stage, artifact_id }
    }

    pub fn reset(&mut self) -> TrackerEvent {
        self.current = None;
        self.previous = None;
        self.history.clear();
        TrackerEvent::Reset
    }

    /// Clears the history and records `stage` as its first step, as one change.
    pub fn start_lineage(&mut self, artifact_id: ArtifactId, stage: impl Into<String>) -> TrackerEvent {
        let stage = stage.into();
        self.reset();
        self.record_stage(artifact_id.clone(), stage.clone());
        TrackerEvent::LineageStarted { stage, artifact_id }
    }

    pub fn has_completed(&self, stage: &str) -> bool {
        self.history.iter().any(|step| step.stage == stage)
    }

    /// Artifact produced the first time `stage` completed.
    pub fn artifact_for(&self, stage: &str) -> Option<&ArtifactId> {
        self.history
            .iter()
            .find(|step| step.stage == stage)
            .map(|step| &step.artifact_id)
    }
}
