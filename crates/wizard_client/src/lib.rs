//! Wizard client: backend calls and local file IO for the platform layer.
mod api;
mod handle;
mod persist;
mod settings;
mod types;

pub use api::{submit, PreprocessingApi, ReqwestApi};
pub use handle::ClientHandle;
pub use persist::{
    ensure_output_dir, read_csv_prefix, visualization_filename, AtomicFileWriter, PersistError,
};
pub use settings::{
    ApiSettings, DEFAULT_BASE_URL, DEFAULT_MAX_IMAGE_BYTES, ENV_API_URL, ENV_CONNECT_TIMEOUT,
    ENV_REQUEST_TIMEOUT,
};
pub use types::{ApiError, ClientEvent, FailureKind};
