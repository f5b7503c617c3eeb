use std::path::PathBuf;

use super::ValidationError;

/// Only this many leading bytes of a CSV are read to find its header line.
pub const CSV_HEADER_PREFIX_BYTES: usize = 4096;

/// Splits the first line of `text` into trimmed column names.
///
/// Double quotes toggle a quoted section in which commas do not separate
/// fields; the quote characters themselves are dropped. Empty names are
/// discarded.
pub fn parse_csv_header(text: &str) -> Vec<String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let first_line = text.split('\n').next().unwrap_or_default();
    let first_line = first_line.strip_suffix('\r').unwrap_or(first_line);

    let mut columns = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in first_line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                columns.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    columns.push(current.trim().to_string());

    columns.retain(|column| !column.is_empty());
    columns
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnField {
    Onset,
    Duration,
    Description,
}

impl ColumnField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "onset" => Some(ColumnField::Onset),
            "duration" => Some(ColumnField::Duration),
            "description" => Some(ColumnField::Description),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMapping {
    pub onset: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}

impl ColumnMapping {
    pub fn is_complete(&self) -> bool {
        self.onset.is_some() && self.duration.is_some() && self.description.is_some()
    }

    fn slot(&mut self, field: ColumnField) -> &mut Option<String> {
        match field {
            ColumnField::Onset => &mut self.onset,
            ColumnField::Duration => &mut self.duration,
            ColumnField::Description => &mut self.description,
        }
    }
}

/// Guesses a mapping from common column names; the first match per field wins.
pub fn auto_map_columns(columns: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();
    for column in columns {
        let lower = column.to_lowercase();
        if mapping.onset.is_none()
            && (lower.contains("onset") || lower == "start" || lower == "time")
        {
            mapping.onset = Some(column.clone());
        }
        if mapping.duration.is_none() && (lower.contains("duration") || lower == "length") {
            mapping.duration = Some(column.clone());
        }
        if mapping.description.is_none()
            && (lower.contains("description")
                || lower.contains("desc")
                || lower == "event"
                || lower == "label"
                || lower == "type")
        {
            mapping.description = Some(column.clone());
        }
    }
    mapping
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationsRequest {
    pub csv_path: PathBuf,
    pub onset_column: String,
    pub duration_column: String,
    pub description_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationForm {
    pub file: Option<PathBuf>,
    pub columns: Vec<String>,
    pub mapping: ColumnMapping,
}

impl AnnotationForm {
    /// Accepts a CSV by its header text. On a header with no columns the
    /// form is cleared and the parse error returned.
    pub fn load_csv(&mut self, path: PathBuf, header_text: &str) -> Result<(), ValidationError> {
        let columns = parse_csv_header(header_text);
        if columns.is_empty() {
            self.clear();
            return Err(ValidationError::UnparsableCsvHeader);
        }
        self.mapping = auto_map_columns(&columns);
        self.columns = columns;
        self.file = Some(path);
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn map_column(&mut self, field: ColumnField, column: &str) -> Result<(), ValidationError> {
        let column = self
            .columns
            .iter()
            .find(|existing| existing.as_str() == column.trim())
            .cloned()
            .ok_or_else(|| ValidationError::UnknownColumn(column.to_string()))?;
        *self.mapping.slot(field) = Some(column);
        Ok(())
    }

    pub fn validate(&self) -> Result<AnnotationsRequest, ValidationError> {
        let csv_path = self.file.clone().ok_or(ValidationError::NoCsvFile)?;
        match (
            &self.mapping.onset,
            &self.mapping.duration,
            &self.mapping.description,
        ) {
            (Some(onset), Some(duration), Some(description)) => Ok(AnnotationsRequest {
                csv_path,
                onset_column: onset.clone(),
                duration_column: duration.clone(),
                description_column: description.clone(),
            }),
            _ => Err(ValidationError::UnmappedColumns),
        }
    }
}
