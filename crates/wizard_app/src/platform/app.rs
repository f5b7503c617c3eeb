use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use wizard_client::{read_csv_prefix, ApiSettings, ClientHandle};
use wizard_core::{update, AppState, FormEdit, Msg, Stage};
use wizard_logging::{wizard_info, wizard_warn};

use super::effects::EffectRunner;
use super::events::{spawn_sidebar_subscriber, TrackerEventBus};
use super::ui::{self, commands::Command};

pub struct AppConfig {
    pub api: ApiSettings,
    pub output_dir: PathBuf,
}

/// Everything the main loop reacts to.
enum Inbox {
    Msg(Msg),
    Line(String),
    InputClosed,
}

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let client = ClientHandle::connect(config.api).context("failed to configure backend client")?;
    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();

    let mut bus = TrackerEventBus::new();
    let sidebar_tx = inbox_tx.clone();
    spawn_sidebar_subscriber(bus.subscribe(), move |msg| {
        sidebar_tx.send(Inbox::Msg(msg)).is_ok()
    });

    let client_tx = inbox_tx.clone();
    let mut runner = EffectRunner::new(client, bus, config.output_dir, move |msg| {
        client_tx.send(Inbox::Msg(msg)).is_ok()
    });

    spawn_stdin_reader(inbox_tx.clone());
    let _ = inbox_tx.send(Inbox::Msg(Msg::Navigate(Stage::Upload)));
    let _ = inbox_tx.send(Inbox::Msg(Msg::DatasetsRefreshRequested));
    drop(inbox_tx);

    wizard_info!("Wizard started");
    let mut state = AppState::new();
    while let Ok(item) = inbox_rx.recv() {
        let msg = match item {
            Inbox::Msg(msg) => Some(msg),
            Inbox::InputClosed => break,
            Inbox::Line(line) => match ui::commands::parse(&line) {
                Ok(None) => None,
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Help)) => {
                    print_lines(ui::commands::HELP.iter().map(|line| line.to_string()));
                    None
                }
                Ok(Some(Command::File(path))) => match file_msg(state.route(), path) {
                    Ok(msg) => Some(msg),
                    Err(message) => {
                        print_lines([format!("! {message}")]);
                        None
                    }
                },
                Ok(Some(Command::Msg(msg))) => Some(msg),
                Err(err) => {
                    print_lines([format!("! {err}")]);
                    None
                }
            },
        };

        if let Some(msg) = msg {
            let (next, effects) = update(state, msg);
            state = next;
            runner.run(effects);
        }

        if state.consume_dirty() {
            print_lines(ui::render::render(&state.view()));
        }
    }

    wizard_info!("Wizard stopped");
    Ok(())
}

/// Resolves `file <path>` against the page being shown.
fn file_msg(route: Stage, path: PathBuf) -> Result<Msg, String> {
    match route {
        Stage::Upload => Ok(Msg::Edit(FormEdit::UploadFile(path))),
        Stage::Annotations => Ok(Msg::Edit(match read_csv_prefix(&path) {
            Ok(header_text) => FormEdit::AnnotationsFile { path, header_text },
            Err(err) => {
                wizard_warn!("Could not read {}: {}", path.display(), err);
                FormEdit::AnnotationsFileUnreadable {
                    message: format!("cannot read {}: {err}", path.display()),
                }
            }
        })),
        other => Err(format!(
            "`file` applies to the upload and annotations pages, not {}",
            other.label()
        )),
    }
}

fn spawn_stdin_reader(inbox_tx: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if inbox_tx.send(Inbox::Line(line)).is_err() {
                return;
            }
        }
        let _ = inbox_tx.send(Inbox::InputClosed);
    });
}

fn print_lines(lines: impl IntoIterator<Item = String>) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out, "> ");
    let _ = out.flush();
}
