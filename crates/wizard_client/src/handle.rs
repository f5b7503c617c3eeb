use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use wizard_core::forms::StageRequest;
use wizard_core::{ArtifactId, VisualizationKind};
use wizard_logging::{wizard_error, wizard_info};

use crate::api::{self, PreprocessingApi, ReqwestApi};
use crate::{ApiError, ApiSettings, ClientEvent, FailureKind};

enum ClientCommand {
    Submit {
        origin: Option<ArtifactId>,
        request: StageRequest,
    },
    FetchMetadata(ArtifactId),
    FetchChannels(ArtifactId),
    FetchEventNames(ArtifactId),
    FetchDatasets,
    DeleteDataset(ArtifactId),
    FetchVisualization {
        artifact_id: ArtifactId,
        kind: VisualizationKind,
    },
}

/// Runs backend calls on a dedicated tokio runtime thread.
///
/// Commands are fire-and-forget; each one yields exactly one [`ClientEvent`].
#[derive(Clone)]
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<ClientEvent>>>,
}

impl ClientHandle {
    pub fn connect(settings: ApiSettings) -> Result<Self, ApiError> {
        let api = ReqwestApi::new(settings)?;
        wizard_info!("Backend at {}", api.settings().base_url);
        Ok(Self::new(Arc::new(api)))
    }

    pub fn new(api: Arc<dyn PreprocessingApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    wizard_error!("Failed to start client runtime: {}", err);
                    let error = ApiError::new(FailureKind::Network, "client runtime unavailable");
                    while let Ok(command) = cmd_rx.recv() {
                        let _ = event_tx.send(failed(command, error.clone()));
                    }
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(api.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn submit(&self, origin: Option<ArtifactId>, request: StageRequest) {
        self.send(ClientCommand::Submit { origin, request });
    }

    pub fn fetch_metadata(&self, artifact_id: ArtifactId) {
        self.send(ClientCommand::FetchMetadata(artifact_id));
    }

    pub fn fetch_channels(&self, artifact_id: ArtifactId) {
        self.send(ClientCommand::FetchChannels(artifact_id));
    }

    pub fn fetch_event_names(&self, artifact_id: ArtifactId) {
        self.send(ClientCommand::FetchEventNames(artifact_id));
    }

    pub fn fetch_datasets(&self) {
        self.send(ClientCommand::FetchDatasets);
    }

    pub fn delete_dataset(&self, id: ArtifactId) {
        self.send(ClientCommand::DeleteDataset(id));
    }

    pub fn fetch_visualization(&self, artifact_id: ArtifactId, kind: VisualizationKind) {
        self.send(ClientCommand::FetchVisualization { artifact_id, kind });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    fn send(&self, command: ClientCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(api: &dyn PreprocessingApi, command: ClientCommand) -> ClientEvent {
    match command {
        ClientCommand::Submit { origin, request } => {
            let result = api::submit(api, origin.as_ref(), &request).await;
            ClientEvent::StageCompleted {
                stage: request.stage(),
                origin,
                result,
            }
        }
        ClientCommand::FetchMetadata(artifact_id) => {
            let result = api.metadata(&artifact_id).await;
            ClientEvent::MetadataFetched {
                artifact_id,
                result,
            }
        }
        ClientCommand::FetchChannels(artifact_id) => {
            let result = api.channels(&artifact_id).await;
            ClientEvent::ChannelsFetched {
                artifact_id,
                result,
            }
        }
        ClientCommand::FetchEventNames(artifact_id) => {
            let result = api.event_names(&artifact_id).await;
            ClientEvent::EventNamesFetched {
                artifact_id,
                result,
            }
        }
        ClientCommand::FetchDatasets => ClientEvent::DatasetsFetched {
            result: api.list_datasets().await,
        },
        ClientCommand::DeleteDataset(id) => {
            let result = api.delete_dataset(&id).await;
            ClientEvent::DatasetDeleted { id, result }
        }
        ClientCommand::FetchVisualization { artifact_id, kind } => {
            let result = api.visualization(&artifact_id, kind).await;
            ClientEvent::VisualizationFetched {
                artifact_id,
                kind,
                result,
            }
        }
    }
}

fn failed(command: ClientCommand, error: ApiError) -> ClientEvent {
    match command {
        ClientCommand::Submit { origin, request } => ClientEvent::StageCompleted {
            stage: request.stage(),
            origin,
            result: Err(error),
        },
        ClientCommand::FetchMetadata(artifact_id) => ClientEvent::MetadataFetched {
            artifact_id,
            result: Err(error),
        },
        ClientCommand::FetchChannels(artifact_id) => ClientEvent::ChannelsFetched {
            artifact_id,
            result: Err(error),
        },
        ClientCommand::FetchEventNames(artifact_id) => ClientEvent::EventNamesFetched {
            artifact_id,
            result: Err(error),
        },
        ClientCommand::FetchDatasets => ClientEvent::DatasetsFetched { result: Err(error) },
        ClientCommand::DeleteDataset(id) => ClientEvent::DatasetDeleted {
            id,
            result: Err(error),
        },
        ClientCommand::FetchVisualization { artifact_id, kind } => {
            ClientEvent::VisualizationFetched {
                artifact_id,
                kind,
                result: Err(error),
            }
        }
    }
}
