use super::ValidationError;

pub const DEFAULT_MONTAGE: &str = "standard_1020";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MontagePreset {
    pub label: &'static str,
    pub value: &'static str,
}

pub const MONTAGE_PRESETS: [MontagePreset; 5] = [
    MontagePreset { label: "10-20", value: "standard_1020" },
    MontagePreset { label: "10-10", value: "standard_1005" },
    MontagePreset { label: "BioSemi 64", value: "biosemi64" },
    MontagePreset { label: "BioSemi 128", value: "biosemi128" },
    MontagePreset { label: "EasyCap M1", value: "easycap-M1" },
];

/// Sent as the `montage_name` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MontageRequest {
    pub montage_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MontageForm {
    pub name: String,
}

impl Default for MontageForm {
    fn default() -> Self {
        Self {
            name: DEFAULT_MONTAGE.to_string(),
        }
    }
}

impl MontageForm {
    pub fn apply_preset(&mut self, index: usize) -> Result<(), ValidationError> {
        let preset = MONTAGE_PRESETS
            .get(index)
            .ok_or(ValidationError::UnknownPreset(index))?;
        self.name = preset.value.to_string();
        Ok(())
    }

    pub fn validate(&self) -> Result<MontageRequest, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyMontageName);
        }
        Ok(MontageRequest {
            montage_name: name.to_string(),
        })
    }
}
