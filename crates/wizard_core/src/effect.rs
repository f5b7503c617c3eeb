use crate::forms::StageRequest;
use crate::{ArtifactId, TrackerEvent, VisualizationKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Perform a stage's outbound request against `origin` (unset for uploads).
    Submit {
        origin: Option<ArtifactId>,
        request: StageRequest,
    },
    FetchMetadata { artifact_id: ArtifactId },
    FetchChannels { artifact_id: ArtifactId },
    FetchEventNames { artifact_id: ArtifactId },
    FetchDatasets,
    DeleteDataset { id: ArtifactId },
    FetchVisualization {
        artifact_id: ArtifactId,
        kind: VisualizationKind,
    },
    /// Tracker changed; deliver to every subscriber.
    Publish(TrackerEvent),
}
