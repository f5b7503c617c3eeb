use serde::Serialize;

use super::{NumberInput, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    None,
    HighPass,
    LowPass,
    BandPass,
}

impl FilterKind {
    /// Classifies by which of the two inputs hold a usable number.
    pub fn classify(l_freq: &str, h_freq: &str) -> Self {
        let has_low = NumberInput::parse(l_freq).value().is_some();
        let has_high = NumberInput::parse(h_freq).value().is_some();
        match (has_low, has_high) {
            (true, true) => FilterKind::BandPass,
            (true, false) => FilterKind::HighPass,
            (false, true) => FilterKind::LowPass,
            (false, false) => FilterKind::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterKind::None => "No Filter",
            FilterKind::HighPass => "High-pass Filter",
            FilterKind::LowPass => "Low-pass Filter",
            FilterKind::BandPass => "Band-pass Filter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPreset {
    pub label: &'static str,
    pub l_freq: &'static str,
    pub h_freq: &'static str,
}

pub const FILTER_PRESETS: [FilterPreset; 6] = [
    FilterPreset { label: "1-40 Hz (EEG standard)", l_freq: "1", h_freq: "40" },
    FilterPreset { label: "0.1-100 Hz (Wide)", l_freq: "0.1", h_freq: "100" },
    FilterPreset { label: "1 Hz High-pass", l_freq: "1", h_freq: "" },
    FilterPreset { label: "40 Hz Low-pass", l_freq: "", h_freq: "40" },
    FilterPreset { label: "8-13 Hz (Alpha)", l_freq: "8", h_freq: "13" },
    FilterPreset { label: "13-30 Hz (Beta)", l_freq: "13", h_freq: "30" },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l_freq: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h_freq: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterForm {
    pub l_freq: String,
    pub h_freq: String,
}

impl FilterForm {
    pub fn new(l_freq: impl Into<String>, h_freq: impl Into<String>) -> Self {
        Self {
            l_freq: l_freq.into(),
            h_freq: h_freq.into(),
        }
    }

    pub fn kind(&self) -> FilterKind {
        FilterKind::classify(&self.l_freq, &self.h_freq)
    }

    pub fn apply_preset(&mut self, index: usize) -> Result<(), ValidationError> {
        let preset = FILTER_PRESETS
            .get(index)
            .ok_or(ValidationError::UnknownPreset(index))?;
        self.l_freq = preset.l_freq.to_string();
        self.h_freq = preset.h_freq.to_string();
        Ok(())
    }

    pub fn description(&self) -> String {
        let low = self.l_freq.trim();
        let high = self.h_freq.trim();
        match self.kind() {
            FilterKind::HighPass => {
                format!("Passes frequencies above {low} Hz (removes slow drifts)")
            }
            FilterKind::LowPass => {
                format!("Passes frequencies below {high} Hz (removes high-frequency noise)")
            }
            FilterKind::BandPass => format!("Passes frequencies between {low} Hz and {high} Hz"),
            FilterKind::None => "Specify at least one frequency to apply a filter".to_string(),
        }
    }

    pub fn validate(&self) -> Result<FilterRequest, ValidationError> {
        let kind = self.kind();
        if kind == FilterKind::None {
            return Err(ValidationError::NoFilterSpecified);
        }

        let low = non_negative(&self.l_freq).ok_or(ValidationError::InvalidLowFrequency)?;
        let high = non_negative(&self.h_freq).ok_or(ValidationError::InvalidHighFrequency)?;

        if let (Some(low), Some(high)) = (low, high) {
            if low >= high {
                return Err(ValidationError::BandOrder);
            }
        }

        Ok(FilterRequest {
            l_freq: low,
            h_freq: high,
        })
    }
}

/// `Some(None)` for an empty field, `None` when the text is not a usable frequency.
fn non_negative(raw: &str) -> Option<Option<f64>> {
    match NumberInput::parse(raw) {
        NumberInput::Empty => Some(None),
        NumberInput::Value(value) if value >= 0.0 => Some(Some(value)),
        NumberInput::Value(_) | NumberInput::Invalid => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_all_kinds() {
        assert_eq!(FilterKind::classify("", ""), FilterKind::None);
        assert_eq!(FilterKind::classify("1", ""), FilterKind::HighPass);
        assert_eq!(FilterKind::classify(" ", "40"), FilterKind::LowPass);
        assert_eq!(FilterKind::classify("8", "13"), FilterKind::BandPass);
        assert_eq!(FilterKind::classify("abc", "40"), FilterKind::LowPass);
    }

    #[test]
    fn garbage_in_a_non_empty_field_is_rejected() {
        let form = FilterForm::new("abc", "40");
        assert_eq!(form.validate(), Err(ValidationError::InvalidLowFrequency));
    }

    #[test]
    fn negative_frequency_is_rejected() {
        let form = FilterForm::new("1", "-40");
        assert_eq!(form.validate(), Err(ValidationError::InvalidHighFrequency));
    }

    #[test]
    fn presets_fill_both_fields() {
        let mut form = FilterForm::default();
        form.apply_preset(3).unwrap();
        assert_eq!(form, FilterForm::new("", "40"));
        assert_eq!(form.kind(), FilterKind::LowPass);
        assert_eq!(form.apply_preset(99), Err(ValidationError::UnknownPreset(99)));
    }
}
