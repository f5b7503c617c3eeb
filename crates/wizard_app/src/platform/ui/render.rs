use chrono::Local;
use wizard_core::forms::{
    AnnotationForm, ChannelSelection, ColumnMapping, EpochForm, EPOCH_PRESETS, FILTER_PRESETS,
    MONTAGE_PRESETS,
};
use wizard_core::{
    AppViewModel, DatasetMetadata, PageBody, PagePhase, PageView, SidebarView, TimelineEntry,
    VisualizationRow, VisualizationSlot,
};

/// Renders the whole screen as lines of text.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("=== EEG Preprocessing Wizard ===".to_string());
    lines.push(format_timeline(&view.timeline));
    lines.push(format!(
        "Current: {}   Previous: {}",
        view.current_artifact
            .as_ref()
            .map_or_else(|| "-".to_string(), |id| id.short()),
        view.previous_artifact
            .as_ref()
            .map_or_else(|| "-".to_string(), |id| id.short()),
    ));
    if let Some(step) = view.history.last() {
        lines.push(format!(
            "Last step: {} at {} ({} steps, `reset` to start over)",
            step.stage,
            step.timestamp.with_timezone(&Local).format("%H:%M:%S"),
            view.history.len()
        ));
    }

    lines.push(String::new());
    render_page(&view.page, view.current_artifact.is_some(), &mut lines);

    lines.push(String::new());
    render_sidebar(&view.sidebar, &mut lines);

    if !view.visualizations.is_empty() {
        lines.push(String::new());
        lines.push("Visualizations:".to_string());
        lines.extend(view.visualizations.iter().map(format_visualization));
    }
    lines
}

fn format_timeline(timeline: &[TimelineEntry]) -> String {
    let entries: Vec<String> = timeline
        .iter()
        .map(|entry| {
            let mark = if entry.completed { "x" } else { " " };
            let cursor = if entry.current { ">" } else { "" };
            match &entry.artifact_id {
                Some(id) => format!("{cursor}[{mark}] {} ({})", entry.stage.label(), id.short()),
                None => format!("{cursor}[{mark}] {}", entry.stage.label()),
            }
        })
        .collect();
    entries.join("  ")
}

fn render_page(page: &PageView, has_artifact: bool, lines: &mut Vec<String>) {
    lines.push(format!("--- {} ---", page.stage.label()));
    match &page.phase {
        PagePhase::Idle => {}
        PagePhase::Validating => lines.push("validating...".to_string()),
        PagePhase::Submitting { .. } => lines.push("submitting...".to_string()),
        PagePhase::Succeeded { artifact_id } => {
            lines.push(format!("done: produced {}", artifact_id.short()))
        }
    }
    if page.loading {
        lines.push("loading...".to_string());
    }
    if let Some(error) = &page.error {
        lines.push(format!("! {error}"));
    }

    match &page.body {
        PageBody::Upload { file } => {
            match file {
                Some(path) => lines.push(format!("File: {}", path.display())),
                None => lines.push("File: none (file <path.edf>)".to_string()),
            }
            if has_artifact {
                lines.push("A dataset is active; `go metadata` to continue with it.".to_string());
            }
        }
        PageBody::Metadata(metadata) => match metadata {
            Some(metadata) => lines.extend(format_metadata(metadata)),
            None if page.loading => {}
            None => lines.push("No metadata loaded.".to_string()),
        },
        PageBody::Channels(selection) => render_channels(selection, lines),
        PageBody::Montage(form) => {
            lines.push(format!("Montage: {}", form.name));
            lines.extend(numbered(MONTAGE_PRESETS.iter().map(|p| {
                format!("{} ({})", p.label, p.value)
            })));
        }
        PageBody::Annotations(form) => render_annotations(form, lines),
        PageBody::Filter {
            form,
            kind,
            description,
        } => {
            lines.push(format!(
                "Low: {}   High: {}",
                or_dash(&form.l_freq),
                or_dash(&form.h_freq)
            ));
            lines.push(format!("{}: {}", kind.label(), description));
            lines.extend(numbered(FILTER_PRESETS.iter().map(|p| p.label.to_string())));
        }
        PageBody::Epochs(form) => render_epochs(form, lines),
    }
}

fn format_metadata(metadata: &DatasetMetadata) -> Vec<String> {
    vec![
        format!("Duration: {:.2} s", metadata.duration_seconds),
        format!("Sampling frequency: {} Hz", metadata.sampling_frequency_hz),
        format!("Time points: {}", metadata.time_points),
        format!("EEG channels: {}", metadata.eeg_channel_count),
        format!("High-pass: {} Hz", metadata.highpass_hz),
        format!("Low-pass: {} Hz", metadata.lowpass_hz),
    ]
}

fn render_channels(selection: &ChannelSelection, lines: &mut Vec<String>) {
    lines.push(format!(
        "Selected {} of {} channels",
        selection.selected.len(),
        selection.available.len()
    ));
    let row: Vec<String> = selection
        .available
        .iter()
        .map(|channel| {
            let mark = if selection.selected.contains(channel) { "x" } else { " " };
            format!("[{mark}] {channel}")
        })
        .collect();
    for chunk in row.chunks(8) {
        lines.push(chunk.join("  "));
    }
}

fn render_annotations(form: &AnnotationForm, lines: &mut Vec<String>) {
    match &form.file {
        Some(path) => lines.push(format!("CSV: {}", path.display())),
        None => lines.push("CSV: none (file <path.csv>)".to_string()),
    }
    if !form.columns.is_empty() {
        lines.push(format!("Columns: {}", form.columns.join(", ")));
        let ColumnMapping {
            onset,
            duration,
            description,
        } = &form.mapping;
        for (field, column) in [
            ("onset", onset),
            ("duration", duration),
            ("description", description),
        ] {
            lines.push(format!(
                "  {field:<12} <- {}",
                column.as_deref().unwrap_or("(unmapped)")
            ));
        }
    }
}

fn render_epochs(form: &EpochForm, lines: &mut Vec<String>) {
    lines.push(format!("Window: {} .. {} s", form.tmin, form.tmax));
    lines.push(format!("Baseline: {}", form.baseline.summary()));
    lines.push(format!("Reject EEG: {}", or_dash(&form.reject_eeg)));
    lines.push(format!(
        "Average reference: {}",
        if form.set_reference { "on" } else { "off" }
    ));
    if !form.available_events.is_empty() {
        let selected = if form.selected_events.is_empty() {
            "all".to_string()
        } else {
            form.selected_events.join(", ")
        };
        lines.push(format!(
            "Events: {} (selected: {selected})",
            form.available_events.join(", ")
        ));
    }
    lines.extend(numbered(EPOCH_PRESETS.iter().map(|p| {
        format!("{} ({} .. {} s, baseline {})", p.label, p.tmin, p.tmax, p.baseline.summary())
    })));
}

fn render_sidebar(sidebar: &SidebarView, lines: &mut Vec<String>) {
    let status = if sidebar.loading { " (refreshing)" } else { "" };
    lines.push(format!("Datasets{status}:"));
    if let Some(error) = &sidebar.error {
        lines.push(format!("! {error}"));
    }
    if sidebar.rows.is_empty() && !sidebar.loading {
        lines.push("  (none)".to_string());
    }
    for row in &sidebar.rows {
        let marker = if row.is_current { "*" } else { " " };
        lines.push(format!(
            "{marker} {}  {}  {}",
            row.filename,
            format_bytes(row.size_bytes),
            row.id
        ));
    }
}

fn format_visualization(row: &VisualizationRow) -> String {
    let status = match &row.slot {
        None => format!("not loaded (viz {})", row.kind.id()),
        Some(VisualizationSlot::Loading) => "loading...".to_string(),
        Some(VisualizationSlot::Ready(image)) => {
            format!("{} ({})", image.location, format_bytes(image.byte_len))
        }
        Some(VisualizationSlot::Failed(message)) => format!("! {message}"),
    };
    format!("  {:<12} {status}", row.kind.label())
}

fn numbered(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut lines = vec!["Presets:".to_string()];
    lines.extend(items.enumerate().map(|(i, item)| format!("  {}. {item}", i + 1)));
    lines
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Human-readable size with one decimal, e.g. `1.5 KB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 10.0).round() / 10.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use wizard_core::{update, AppState, FormEdit, Msg, Stage};

    use super::*;

    #[test]
    fn bytes_are_humanized() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
    }

    #[test]
    fn fresh_screen_shows_upload_page() {
        let lines = render(&AppState::new().view());
        assert!(lines.iter().any(|line| line == "--- Upload ---"));
        assert!(lines[1].starts_with(">[ ] Upload"));
        assert!(lines.iter().any(|line| line.contains("Current: -")));
    }

    #[test]
    fn timeline_marks_completed_stage_with_short_id() {
        let (state, _) = update(
            AppState::new(),
            Msg::Edit(FormEdit::UploadFile(PathBuf::from("a.edf"))),
        );
        let (state, _) = update(state, Msg::SubmitClicked);
        let (state, _) = update(
            state,
            Msg::StageSucceeded {
                stage: Stage::Upload,
                origin: None,
                artifact_id: "0123456789".into(),
            },
        );
        let lines = render(&state.view());
        assert!(lines[1].starts_with("[x] Upload (01234567...)"));
        assert!(lines[1].contains(">[ ] Metadata"));
        assert!(lines.iter().any(|line| line.starts_with("Last step: upload")));
    }
}
