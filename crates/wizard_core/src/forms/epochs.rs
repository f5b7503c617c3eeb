use serde::Serialize;

use super::{toggle, NumberInput, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BaselineOption {
    None,
    #[default]
    StartToZero,
    /// Empty bounds mean "epoch start" / "epoch end".
    Custom { start: String, end: String },
}

impl BaselineOption {
    pub fn summary(&self) -> String {
        match self {
            BaselineOption::None => "None".to_string(),
            BaselineOption::StartToZero => "Start -> 0".to_string(),
            BaselineOption::Custom { start, end } => {
                let start = if start.trim().is_empty() { "start" } else { start.trim() };
                let end = if end.trim().is_empty() { "end" } else { end.trim() };
                format!("{start} -> {end}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RejectCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eeg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eog: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochsRequest {
    pub tmin: f64,
    pub tmax: f64,
    pub baseline: Option<(Option<f64>, Option<f64>)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_criteria: Option<RejectCriteria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_reference: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochPreset {
    pub label: &'static str,
    pub tmin: &'static str,
    pub tmax: &'static str,
    pub baseline: BaselineOption,
}

pub const EPOCH_PRESETS: [EpochPreset; 4] = [
    EpochPreset {
        label: "ERP (-0.2 to 0.8s)",
        tmin: "-0.2",
        tmax: "0.8",
        baseline: BaselineOption::StartToZero,
    },
    EpochPreset {
        label: "Motor Imagery (-0.5 to 1.0s)",
        tmin: "-0.5",
        tmax: "1.0",
        baseline: BaselineOption::StartToZero,
    },
    EpochPreset {
        label: "P300 (-0.1 to 0.6s)",
        tmin: "-0.1",
        tmax: "0.6",
        baseline: BaselineOption::StartToZero,
    },
    EpochPreset {
        label: "SSVEP (0 to 2.0s)",
        tmin: "0",
        tmax: "2.0",
        baseline: BaselineOption::None,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochForm {
    pub tmin: String,
    pub tmax: String,
    pub baseline: BaselineOption,
    /// Peak-to-peak EEG threshold in volts; empty disables rejection.
    pub reject_eeg: String,
    pub set_reference: bool,
    pub available_events: Vec<String>,
    pub selected_events: Vec<String>,
}

impl Default for EpochForm {
    fn default() -> Self {
        Self {
            tmin: "-0.2".to_string(),
            tmax: "0.8".to_string(),
            baseline: BaselineOption::StartToZero,
            reject_eeg: String::new(),
            set_reference: false,
            available_events: Vec::new(),
            selected_events: Vec::new(),
        }
    }
}

impl EpochForm {
    pub fn apply_preset(&mut self, index: usize) -> Result<(), ValidationError> {
        let preset = EPOCH_PRESETS
            .get(index)
            .ok_or(ValidationError::UnknownPreset(index))?;
        self.tmin = preset.tmin.to_string();
        self.tmax = preset.tmax.to_string();
        self.baseline = preset.baseline.clone();
        Ok(())
    }

    pub fn set_available_events(&mut self, events: Vec<String>) {
        self.selected_events.retain(|event| events.contains(event));
        self.available_events = events;
    }

    pub fn toggle_event(&mut self, event: &str) {
        toggle(&mut self.selected_events, event);
    }

    pub fn select_all_events(&mut self) {
        self.selected_events = self.available_events.clone();
    }

    pub fn clear_events(&mut self) {
        self.selected_events.clear();
    }

    pub fn validate(&self) -> Result<EpochsRequest, ValidationError> {
        let (tmin, tmax) = match (
            NumberInput::parse(&self.tmin).value(),
            NumberInput::parse(&self.tmax).value(),
        ) {
            (Some(tmin), Some(tmax)) => (tmin, tmax),
            _ => return Err(ValidationError::InvalidTimeWindow),
        };
        if tmin >= tmax {
            return Err(ValidationError::TminNotBeforeTmax);
        }

        let baseline = match &self.baseline {
            BaselineOption::None => None,
            BaselineOption::StartToZero => Some((None, Some(0.0))),
            BaselineOption::Custom { start, end } => {
                let start = optional_bound(start).ok_or(ValidationError::InvalidBaselineStart)?;
                let end = optional_bound(end).ok_or(ValidationError::InvalidBaselineEnd)?;
                Some((start, end))
            }
        };

        let reject_criteria = match NumberInput::parse(&self.reject_eeg) {
            NumberInput::Empty => None,
            NumberInput::Value(value) if value > 0.0 => Some(RejectCriteria {
                eeg: Some(value),
                eog: None,
            }),
            NumberInput::Value(_) | NumberInput::Invalid => {
                return Err(ValidationError::InvalidRejectThreshold)
            }
        };

        let events_filter = if self.selected_events.is_empty() {
            None
        } else {
            Some(self.selected_events.clone())
        };

        Ok(EpochsRequest {
            tmin,
            tmax,
            baseline,
            reject_criteria,
            events_filter,
            set_reference: self.set_reference.then_some(true),
        })
    }
}

fn optional_bound(raw: &str) -> Option<Option<f64>> {
    match NumberInput::parse(raw) {
        NumberInput::Empty => Some(None),
        NumberInput::Value(value) => Some(Some(value)),
        NumberInput::Invalid => None,
    }
}
