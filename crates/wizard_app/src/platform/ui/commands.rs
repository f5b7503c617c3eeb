use std::path::PathBuf;

use thiserror::Error;
use wizard_core::forms::{BaselineOption, ColumnField};
use wizard_core::{ArtifactId, FormEdit, Msg, Stage, VisualizationKind};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    /// Meaning depends on the page: the recording on upload, the CSV on annotations.
    File(PathBuf),
    Msg(Msg),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown stage `{0}`")]
    UnknownStage(String),
    #[error("unknown visualization `{0}` (psd, raw, topomap, spectrogram)")]
    UnknownVisualization(String),
}

pub const HELP: &[&str] = &[
    "go <stage>                       upload, metadata, channels, montage, annotations, filter, epochs",
    "file <path>                      choose the .edf (upload) or the annotations .csv",
    "submit                           send the current page",
    "preset <n>                       apply preset n on filter, epochs or montage",
    "low <hz|-> / high <hz|->         filter cutoffs",
    "tmin <s> / tmax <s>              epoch window",
    "baseline none|start|custom <a|-> <b|->",
    "reject <v|->                     EEG peak-to-peak rejection threshold",
    "reference                        toggle average reference",
    "event <name> / events all|clear  event selection",
    "ch <name> / channels all|1020|clear",
    "montage <name>",
    "map onset|duration|description <column>",
    "datasets / use <id> / delete <id>",
    "viz psd|raw|topomap|spectrogram",
    "reset / help / quit",
];

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let Some((verb, rest)) = split_word(line) else {
        return Ok(None);
    };
    let rest = rest.trim();

    let command = match verb {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "go" => {
            let stage = Stage::from_id(required(rest, "go <stage>")?)
                .ok_or_else(|| CommandError::UnknownStage(rest.to_string()))?;
            Command::Msg(Msg::Navigate(stage))
        }
        "file" => Command::File(PathBuf::from(required(rest, "file <path>")?)),
        "submit" => Command::Msg(Msg::SubmitClicked),
        "reset" => Command::Msg(Msg::ResetClicked),
        "datasets" => Command::Msg(Msg::DatasetsRefreshRequested),
        "use" => Command::Msg(Msg::DatasetSelected(ArtifactId::new(required(
            rest,
            "use <id>",
        )?))),
        "delete" => Command::Msg(Msg::DeleteDatasetClicked(ArtifactId::new(required(
            rest,
            "delete <id>",
        )?))),
        "viz" => {
            let kind = VisualizationKind::from_id(required(rest, "viz <kind>")?)
                .ok_or_else(|| CommandError::UnknownVisualization(rest.to_string()))?;
            Command::Msg(Msg::VisualizationRequested(kind))
        }
        "preset" => {
            let number: usize = required(rest, "preset <n>")?
                .parse()
                .map_err(|_| CommandError::Usage("preset <n>"))?;
            let index = number
                .checked_sub(1)
                .ok_or(CommandError::Usage("preset <n> (numbered from 1)"))?;
            edit(FormEdit::Preset(index))
        }
        "low" => edit(FormEdit::FilterLow(optional_value(rest, "low <hz|->")?)),
        "high" => edit(FormEdit::FilterHigh(optional_value(rest, "high <hz|->")?)),
        "tmin" => edit(FormEdit::Tmin(required(rest, "tmin <s>")?.to_string())),
        "tmax" => edit(FormEdit::Tmax(required(rest, "tmax <s>")?.to_string())),
        "baseline" => edit(FormEdit::Baseline(parse_baseline(rest)?)),
        "reject" => edit(FormEdit::RejectEeg(optional_value(rest, "reject <v|->")?)),
        "reference" => edit(FormEdit::ToggleReference),
        "event" => edit(FormEdit::ToggleEvent(required(rest, "event <name>")?.to_string())),
        "events" => match rest {
            "all" => edit(FormEdit::SelectAllEvents),
            "clear" => edit(FormEdit::ClearEvents),
            _ => return Err(CommandError::Usage("events all|clear")),
        },
        "ch" => edit(FormEdit::ToggleChannel(required(rest, "ch <name>")?.to_string())),
        "channels" => match rest {
            "all" => edit(FormEdit::SelectAllChannels),
            "1020" | "10-20" => edit(FormEdit::SelectTenTwenty),
            "clear" => edit(FormEdit::ClearChannels),
            _ => return Err(CommandError::Usage("channels all|1020|clear")),
        },
        "montage" => edit(FormEdit::MontageName(required(rest, "montage <name>")?.to_string())),
        "map" => {
            const USAGE: &str = "map onset|duration|description <column>";
            let (field, column) = split_word(rest).ok_or(CommandError::Usage(USAGE))?;
            let field = match field {
                "onset" => ColumnField::Onset,
                "duration" => ColumnField::Duration,
                "description" => ColumnField::Description,
                _ => return Err(CommandError::Usage(USAGE)),
            };
            edit(FormEdit::MapColumn {
                field,
                column: required(column.trim(), USAGE)?.to_string(),
            })
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn edit(edit: FormEdit) -> Command {
    Command::Msg(Msg::Edit(edit))
}

fn split_word(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    Some(text.split_once(char::is_whitespace).unwrap_or((text, "")))
}

fn required<'a>(value: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(value)
    }
}

/// `-` clears the field.
fn optional_value(value: &str, usage: &'static str) -> Result<String, CommandError> {
    match required(value, usage)? {
        "-" => Ok(String::new()),
        value => Ok(value.to_string()),
    }
}

fn parse_baseline(rest: &str) -> Result<BaselineOption, CommandError> {
    const USAGE: &str = "baseline none|start|custom <a|-> <b|->";
    let mut words = rest.split_whitespace();
    let option = match words.next() {
        Some("none") => BaselineOption::None,
        Some("start") => BaselineOption::StartToZero,
        Some("custom") => {
            let start = optional_value(words.next().unwrap_or_default(), USAGE)?;
            let end = optional_value(words.next().unwrap_or_default(), USAGE)?;
            BaselineOption::Custom { start, end }
        }
        _ => return Err(CommandError::Usage(USAGE)),
    };
    match words.next() {
        Some(_) => Err(CommandError::Usage(USAGE)),
        None => Ok(option),
    }
}
