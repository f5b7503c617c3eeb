use serde::Serialize;

use super::{toggle, ValidationError};

/// Standard 10-20 EEG electrode positions.
pub const TEN_TWENTY: [&str; 19] = [
    "Fp1", "Fp2", "F7", "F3", "Fz", "F4", "F8", "T7", "C3", "Cz", "C4", "T8", "P7", "P3", "Pz",
    "P4", "P8", "O1", "O2",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PickMode {
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickChannelsRequest {
    pub mode: PickMode,
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelSelection {
    pub available: Vec<String>,
    pub selected: Vec<String>,
}

impl ChannelSelection {
    /// Replaces the channel list; everything is pre-selected when the stage already ran.
    pub fn load(&mut self, channels: Vec<String>, already_completed: bool) {
        self.selected = if already_completed {
            channels.clone()
        } else {
            self.selected
                .iter()
                .filter(|name| channels.contains(name))
                .cloned()
                .collect()
        };
        self.available = channels;
    }

    pub fn toggle(&mut self, channel: &str) {
        if self.available.iter().any(|name| name == channel) {
            toggle(&mut self.selected, channel);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.available.clone();
    }

    pub fn select_ten_twenty(&mut self) {
        self.selected = self
            .available
            .iter()
            .filter(|name| TEN_TWENTY.contains(&name.as_str()))
            .cloned()
            .collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn validate(&self) -> Result<PickChannelsRequest, ValidationError> {
        if self.selected.is_empty() {
            return Err(ValidationError::NoChannelsSelected);
        }
        Ok(PickChannelsRequest {
            mode: PickMode::Manual,
            channels: self.selected.clone(),
        })
    }
}
