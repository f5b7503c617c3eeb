use std::path::PathBuf;

use super::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadForm {
    pub file: Option<PathBuf>,
}

impl UploadForm {
    pub fn validate(&self) -> Result<UploadRequest, ValidationError> {
        let path = self.file.as_ref().ok_or(ValidationError::NoFileSelected)?;
        let is_edf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("edf"));
        if !is_edf {
            return Err(ValidationError::UnsupportedFileType);
        }
        Ok(UploadRequest { path: path.clone() })
    }
}
