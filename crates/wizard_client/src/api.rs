use std::path::Path;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;
use wizard_core::forms::{
    AnnotationsRequest, EpochsRequest, FilterRequest, MontageRequest, PickChannelsRequest,
    StageRequest,
};
use wizard_core::{ArtifactId, DatasetMetadata, DatasetSummary, VisualizationKind};
use wizard_logging::{wizard_debug, wizard_info};

use crate::{ApiError, ApiSettings, FailureKind};

/// The preprocessing backend, one method per endpoint.
///
/// Every operation that produces a new artifact returns its id.
#[async_trait::async_trait]
pub trait PreprocessingApi: Send + Sync {
    async fn upload_dataset(&self, path: &Path) -> Result<ArtifactId, ApiError>;

    async fn metadata(&self, id: &ArtifactId) -> Result<DatasetMetadata, ApiError>;

    async fn channels(&self, id: &ArtifactId) -> Result<Vec<String>, ApiError>;

    async fn pick_channels(
        &self,
        id: &ArtifactId,
        request: &PickChannelsRequest,
    ) -> Result<ArtifactId, ApiError>;

    async fn set_montage(
        &self,
        id: &ArtifactId,
        request: &MontageRequest,
    ) -> Result<ArtifactId, ApiError>;

    async fn filter(&self, id: &ArtifactId, request: &FilterRequest)
        -> Result<ArtifactId, ApiError>;

    async fn event_names(&self, id: &ArtifactId) -> Result<Vec<String>, ApiError>;

    async fn create_epochs(
        &self,
        id: &ArtifactId,
        request: &EpochsRequest,
    ) -> Result<ArtifactId, ApiError>;

    async fn set_annotations(
        &self,
        id: &ArtifactId,
        request: &AnnotationsRequest,
    ) -> Result<ArtifactId, ApiError>;

    async fn list_datasets(&self) -> Result<Vec<DatasetSummary>, ApiError>;

    async fn delete_dataset(&self, id: &ArtifactId) -> Result<(), ApiError>;

    async fn visualization(
        &self,
        id: &ArtifactId,
        kind: VisualizationKind,
    ) -> Result<Vec<u8>, ApiError>;
}

/// Sends a validated stage request against `origin`.
///
/// Uploads start a new lineage and ignore `origin`; every other stage needs one.
pub async fn submit(
    api: &dyn PreprocessingApi,
    origin: Option<&ArtifactId>,
    request: &StageRequest,
) -> Result<ArtifactId, ApiError> {
    let require = || {
        origin.ok_or_else(|| {
            ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} requires a current dataset", request.stage().label()),
            )
        })
    };
    match request {
        StageRequest::Upload(upload) => api.upload_dataset(&upload.path).await,
        StageRequest::Metadata => {
            let id = require()?;
            api.metadata(id).await.map(|_| id.clone())
        }
        StageRequest::PickChannels(body) => api.pick_channels(require()?, body).await,
        StageRequest::SetMontage(body) => api.set_montage(require()?, body).await,
        StageRequest::SetAnnotations(body) => api.set_annotations(require()?, body).await,
        StageRequest::Filter(body) => api.filter(require()?, body).await,
        StageRequest::CreateEpochs(body) => api.create_epochs(require()?, body).await,
    }
}

#[derive(Debug, Deserialize)]
struct ArtifactResponse {
    #[serde(alias = "dataset_id", alias = "uuid")]
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChannelsResponse {
    Wrapped { channels: Vec<String> },
    Bare(Vec<String>),
}

impl ChannelsResponse {
    fn into_channels(self) -> Vec<String> {
        match self {
            ChannelsResponse::Wrapped { channels } | ChannelsResponse::Bare(channels) => channels,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url).map_err(|err| {
            ApiError::new(
                FailureKind::InvalidUrl,
                format!("invalid backend url {:?}: {err}", settings.base_url),
            )
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("backend url {:?} cannot carry a path", settings.base_url),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Joins percent-encoded `segments` onto the base url.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn preprocessing(&self, id: &ArtifactId, operation: &str) -> Url {
        self.endpoint(&["api", "preprocessing", id.as_str(), operation])
    }

    async fn post_json<B: serde::Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
        action: &str,
    ) -> Result<ArtifactId, ApiError> {
        wizard_debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        artifact_from(expect_success(response, action).await?).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, action: &str) -> Result<T, ApiError> {
        wizard_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        expect_success(response, action)
            .await?
            .json::<T>()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl PreprocessingApi for ReqwestApi {
    async fn upload_dataset(&self, path: &Path) -> Result<ArtifactId, ApiError> {
        let form = Form::new().part("file", file_part(path).await?);
        let url = self.endpoint(&["api", "datasets", "new"]);
        wizard_info!("Uploading {}", path.display());
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        artifact_from(expect_success(response, "upload file").await?).await
    }

    async fn metadata(&self, id: &ArtifactId) -> Result<DatasetMetadata, ApiError> {
        let url = self.endpoint(&["api", "datasets", id.as_str(), "metadata"]);
        self.get_json(url, "fetch metadata").await
    }

    async fn channels(&self, id: &ArtifactId) -> Result<Vec<String>, ApiError> {
        let url = self.preprocessing(id, "channels");
        let response: ChannelsResponse = self.get_json(url, "fetch channels").await?;
        Ok(response.into_channels())
    }

    async fn pick_channels(
        &self,
        id: &ArtifactId,
        request: &PickChannelsRequest,
    ) -> Result<ArtifactId, ApiError> {
        let url = self.preprocessing(id, "pick_channels");
        self.post_json(url, request, "pick channels").await
    }

    async fn set_montage(
        &self,
        id: &ArtifactId,
        request: &MontageRequest,
    ) -> Result<ArtifactId, ApiError> {
        let mut url = self.preprocessing(id, "set_montage");
        url.query_pairs_mut()
            .append_pair("montage_name", &request.montage_name);
        wizard_debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        artifact_from(expect_success(response, "set montage").await?).await
    }

    async fn filter(
        &self,
        id: &ArtifactId,
        request: &FilterRequest,
    ) -> Result<ArtifactId, ApiError> {
        let url = self.preprocessing(id, "filter");
        self.post_json(url, request, "apply filter").await
    }

    async fn event_names(&self, id: &ArtifactId) -> Result<Vec<String>, ApiError> {
        let url = self.preprocessing(id, "event_names");
        self.get_json(url, "fetch event names").await
    }

    async fn create_epochs(
        &self,
        id: &ArtifactId,
        request: &EpochsRequest,
    ) -> Result<ArtifactId, ApiError> {
        let url = self.preprocessing(id, "create_epochs");
        self.post_json(url, request, "create epochs").await
    }

    async fn set_annotations(
        &self,
        id: &ArtifactId,
        request: &AnnotationsRequest,
    ) -> Result<ArtifactId, ApiError> {
        let form = Form::new()
            .part("file", file_part(&request.csv_path).await?)
            .text("onset_column", request.onset_column.clone())
            .text("duration_column", request.duration_column.clone())
            .text("description_column", request.description_column.clone());
        let url = self.preprocessing(id, "set_annotations");
        wizard_debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        artifact_from(expect_success(response, "set annotations").await?).await
    }

    async fn list_datasets(&self) -> Result<Vec<DatasetSummary>, ApiError> {
        let url = self.endpoint(&["api", "datasets", ""]);
        self.get_json(url, "fetch datasets").await
    }

    async fn delete_dataset(&self, id: &ArtifactId) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "datasets", id.as_str()]);
        wizard_debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        expect_success(response, "delete dataset").await?;
        Ok(())
    }

    async fn visualization(
        &self,
        id: &ArtifactId,
        kind: VisualizationKind,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["api", "datasets", id.as_str(), "visualizations", kind.id()]);
        wizard_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = expect_success(response, "load visualization").await?;

        let max_bytes = self.settings.max_image_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        ApiError::new(
            FailureKind::LocalFile,
            format!("cannot read {}: {err}", path.display()),
        )
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}

/// Passes 2xx responses through; otherwise reads the body for a `detail` message.
async fn expect_success(response: Response, action: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::new(
        FailureKind::HttpStatus(status.as_u16()),
        error_message(&body, action, status),
    ))
}

fn error_message(body: &str, action: &str, status: StatusCode) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());
    match detail {
        Some(Value::String(text)) if !text.is_empty() => text,
        Some(Value::Null) | Some(Value::String(_)) | None => format!("Failed to {action}: {status}"),
        Some(other) => other.to_string(),
    }
}

async fn artifact_from(response: Response) -> Result<ArtifactId, ApiError> {
    let body: ArtifactResponse = response.json().await.map_err(map_reqwest_error)?;
    if body.id.trim().is_empty() {
        return Err(ApiError::new(
            FailureKind::Decode,
            "response did not include an artifact id",
        ));
    }
    Ok(ArtifactId::new(body.id))
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> ApiError {
    ApiError::new(
        FailureKind::TooLarge { max_bytes, actual },
        format!("image exceeds the {} byte limit", max_bytes),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
