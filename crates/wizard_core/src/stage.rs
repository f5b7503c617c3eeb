/// One page of the preprocessing wizard, in wizard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Stage {
    #[default]
    Upload,
    Metadata,
    Channels,
    Montage,
    Annotations,
    Filter,
    Epochs,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Upload,
        Stage::Metadata,
        Stage::Channels,
        Stage::Montage,
        Stage::Annotations,
        Stage::Filter,
        Stage::Epochs,
    ];

    /// Name recorded in the tracker history when this stage completes.
    pub fn id(self) -> &'static str {
        match self {
            Stage::Upload => "upload",
            Stage::Metadata => "metadata",
            Stage::Channels => "channels",
            Stage::Montage => "montage",
            Stage::Annotations => "annotations",
            Stage::Filter => "filter",
            Stage::Epochs => "epochs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Upload => "Upload",
            Stage::Metadata => "Metadata",
            Stage::Channels => "Channels",
            Stage::Montage => "Montage",
            Stage::Annotations => "Annotations",
            Stage::Filter => "Filter",
            Stage::Epochs => "Epochs",
        }
    }

    pub fn from_id(id: &str) -> Option<Stage> {
        let id = id.trim();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.id().eq_ignore_ascii_case(id))
    }

    /// Whether the page needs a current artifact before it can be shown.
    pub fn requires_artifact(self) -> bool {
        self != Stage::Upload
    }
}
