use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use wizard_client::{
    visualization_filename, ApiError, AtomicFileWriter, ClientEvent, ClientHandle,
};
use wizard_core::{ArtifactId, Effect, Msg, Stage, VisualizationImage};
use wizard_logging::{wizard_info, wizard_warn};

use super::events::TrackerEventBus;

/// Hands effects to the backend client and the tracker bus.
pub struct EffectRunner {
    client: ClientHandle,
    bus: TrackerEventBus,
}

impl EffectRunner {
    /// Starts forwarding client completions to `deliver` as messages.
    pub fn new<F>(client: ClientHandle, bus: TrackerEventBus, output_dir: PathBuf, deliver: F) -> Self
    where
        F: FnMut(Msg) -> bool + Send + 'static,
    {
        let runner = Self { client, bus };
        runner.spawn_event_loop(AtomicFileWriter::new(output_dir), deliver);
        runner
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit { origin, request } => {
                    wizard_info!(
                        "Submit {} against {:?}",
                        request.stage().id(),
                        origin.as_ref().map(|id| id.short())
                    );
                    self.client.submit(origin, request);
                }
                Effect::FetchMetadata { artifact_id } => self.client.fetch_metadata(artifact_id),
                Effect::FetchChannels { artifact_id } => self.client.fetch_channels(artifact_id),
                Effect::FetchEventNames { artifact_id } => {
                    self.client.fetch_event_names(artifact_id)
                }
                Effect::FetchDatasets => self.client.fetch_datasets(),
                Effect::DeleteDataset { id } => self.client.delete_dataset(id),
                Effect::FetchVisualization { artifact_id, kind } => {
                    self.client.fetch_visualization(artifact_id, kind)
                }
                Effect::Publish(event) => self.bus.publish(event),
            }
        }
    }

    fn spawn_event_loop<F>(&self, writer: AtomicFileWriter, mut deliver: F)
    where
        F: FnMut(Msg) -> bool + Send + 'static,
    {
        let client = self.client.clone();
        thread::spawn(move || loop {
            if let Some(event) = client.try_recv() {
                if !deliver(event_to_msg(event, &writer)) {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

/// Turns a client completion into the message the state machine expects.
///
/// Fetched images are written to disk here so the core only sees their location.
fn event_to_msg(event: ClientEvent, writer: &AtomicFileWriter) -> Msg {
    match event {
        ClientEvent::StageCompleted {
            stage,
            origin,
            result,
        } => match result {
            Ok(artifact_id) => Msg::StageSucceeded {
                stage,
                origin,
                artifact_id,
            },
            Err(err) => {
                wizard_warn!("{} failed ({}): {}", stage.id(), err.kind, err.message);
                Msg::StageFailed {
                    stage,
                    origin,
                    message: err.to_string(),
                }
            }
        },
        ClientEvent::MetadataFetched {
            artifact_id,
            result,
        } => match result {
            Ok(metadata) => Msg::MetadataLoaded {
                artifact_id,
                metadata,
            },
            Err(err) => page_load_failed(Stage::Metadata, artifact_id, err),
        },
        ClientEvent::ChannelsFetched {
            artifact_id,
            result,
        } => match result {
            Ok(channels) => Msg::ChannelsLoaded {
                artifact_id,
                channels,
            },
            Err(err) => page_load_failed(Stage::Channels, artifact_id, err),
        },
        ClientEvent::EventNamesFetched {
            artifact_id,
            result,
        } => match result {
            Ok(events) => Msg::EventNamesLoaded {
                artifact_id,
                events,
            },
            Err(err) => page_load_failed(Stage::Epochs, artifact_id, err),
        },
        ClientEvent::DatasetsFetched { result } => match result {
            Ok(datasets) => Msg::DatasetsLoaded(datasets),
            Err(err) => Msg::DatasetsLoadFailed(err.to_string()),
        },
        ClientEvent::DatasetDeleted { id, result } => match result {
            Ok(()) => Msg::DatasetDeleted(id),
            Err(err) => Msg::DatasetDeleteFailed {
                id,
                message: err.to_string(),
            },
        },
        ClientEvent::VisualizationFetched {
            artifact_id,
            kind,
            result,
        } => {
            let saved = result.map_err(|err| err.to_string()).and_then(|bytes| {
                writer
                    .write(&visualization_filename(&artifact_id, kind), &bytes)
                    .map(|path| VisualizationImage {
                        byte_len: bytes.len() as u64,
                        location: path.display().to_string(),
                    })
                    .map_err(|err| err.to_string())
            });
            match saved {
                Ok(image) => Msg::VisualizationLoaded {
                    artifact_id,
                    kind,
                    image,
                },
                Err(message) => {
                    wizard_warn!("{} visualization failed: {}", kind, message);
                    Msg::VisualizationFailed {
                        artifact_id,
                        kind,
                        message,
                    }
                }
            }
        }
    }
}

fn page_load_failed(stage: Stage, artifact_id: ArtifactId, err: ApiError) -> Msg {
    wizard_warn!("Loading {} page data failed: {}", stage.id(), err.message);
    Msg::PageLoadFailed {
        stage,
        artifact_id,
        message: err.to_string(),
    }
}
