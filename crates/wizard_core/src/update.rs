use wizard_logging::{wizard_debug, wizard_info, wizard_warn};

use crate::forms::{StageRequest, ValidationError};
use crate::state::VisualizationSlot;
use crate::{AppState, ArtifactId, Effect, FormEdit, Msg, Stage};

/// Shown when a response arrives for a dataset that is no longer current.
pub const STALE_RESULT_MESSAGE: &str =
    "result discarded: the active dataset changed while the request was in flight";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigate(stage) => navigate(&mut state, stage),
        Msg::Edit(edit) => {
            apply_edit(&mut state, edit);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::StageSucceeded {
            stage,
            origin,
            artifact_id,
        } => stage_succeeded(&mut state, stage, origin, artifact_id),
        Msg::StageFailed {
            stage,
            origin,
            message,
        } => {
            // The tracker is never touched on failure; only the page reports it.
            if !is_current(&state, origin.as_ref()) {
                wizard_debug!("{} failure arrived for a stale origin", stage.id());
            }
            state.page_mut(stage).fail(stage, message);
            state.mark_dirty();
            Vec::new()
        }
        Msg::MetadataLoaded {
            artifact_id,
            metadata,
        } => {
            if !is_current(&state, Some(&artifact_id)) {
                return discard_stale(state, Stage::Metadata, &artifact_id);
            }
            state.metadata = Some(metadata);
            state.page_mut(Stage::Metadata).set_loading(false);
            state.mark_dirty();
            // Metadata is a non-mutating stage: it completes against the same artifact.
            if state.tracker.has_completed(Stage::Metadata.id()) {
                Vec::new()
            } else {
                let event = state
                    .tracker
                    .record_stage(artifact_id.clone(), Stage::Metadata.id());
                state.page_mut(Stage::Metadata).succeed(artifact_id);
                vec![Effect::Publish(event)]
            }
        }
        Msg::ChannelsLoaded {
            artifact_id,
            channels,
        } => {
            if !is_current(&state, Some(&artifact_id)) {
                return discard_stale(state, Stage::Channels, &artifact_id);
            }
            let completed = state.tracker.has_completed(Stage::Channels.id());
            state.forms.channels.load(channels, completed);
            state.page_mut(Stage::Channels).set_loading(false);
            state.mark_dirty();
            Vec::new()
        }
        Msg::EventNamesLoaded {
            artifact_id,
            events,
        } => {
            if !is_current(&state, Some(&artifact_id)) {
                return discard_stale(state, Stage::Epochs, &artifact_id);
            }
            state.forms.epochs.set_available_events(events);
            state.page_mut(Stage::Epochs).set_loading(false);
            state.mark_dirty();
            Vec::new()
        }
        Msg::PageLoadFailed {
            stage,
            artifact_id,
            message,
        } => {
            if !is_current(&state, Some(&artifact_id)) {
                return discard_stale(state, stage, &artifact_id);
            }
            let page = state.page_mut(stage);
            page.set_loading(false);
            page.set_error(message);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ResetClicked => {
            if state.tracker.is_empty() {
                return (state, Vec::new());
            }
            wizard_info!("Pipeline reset");
            let event = state.tracker.reset();
            state.clear_session();
            state.route = Stage::Upload;
            state.mark_dirty();
            vec![Effect::Publish(event)]
        }
        Msg::DatasetsRefreshRequested => {
            state.sidebar.loading = true;
            state.mark_dirty();
            vec![Effect::FetchDatasets]
        }
        Msg::DatasetsLoaded(datasets) => {
            state.sidebar.datasets = datasets;
            state.sidebar.loading = false;
            state.sidebar.error = None;
            state.mark_dirty();
            Vec::new()
        }
        Msg::DatasetsLoadFailed(message) => {
            wizard_warn!("Failed to fetch datasets: {}", message);
            state.sidebar.loading = false;
            state.sidebar.error = Some(message);
            state.mark_dirty();
            Vec::new()
        }
        Msg::DatasetSelected(id) => {
            wizard_info!("Switching session to dataset {}", id.short());
            state.clear_session();
            let mut effects = vec![Effect::Publish(
                state.tracker.start_lineage(id, Stage::Upload.id()),
            )];
            effects.extend(navigate(&mut state, Stage::Metadata));
            effects
        }
        Msg::DeleteDatasetClicked(id) => vec![Effect::DeleteDataset { id }],
        Msg::DatasetDeleted(id) => {
            state
                .sidebar
                .datasets
                .retain(|dataset| dataset.id != id.as_str());
            state.mark_dirty();
            Vec::new()
        }
        Msg::DatasetDeleteFailed { id, message } => {
            wizard_warn!("Failed to delete dataset {}: {}", id, message);
            state.sidebar.error = Some(format!("failed to delete {}: {message}", id.short()));
            state.mark_dirty();
            Vec::new()
        }
        Msg::VisualizationRequested(kind) => {
            let Some(artifact_id) = state.tracker.current().cloned() else {
                return (state, Vec::new());
            };
            let key = (artifact_id.clone(), kind);
            match state.visualizations.get(&key) {
                Some(VisualizationSlot::Ready(_)) | Some(VisualizationSlot::Loading) => Vec::new(),
                Some(VisualizationSlot::Failed(_)) | None => {
                    state.visualizations.insert(key, VisualizationSlot::Loading);
                    state.mark_dirty();
                    vec![Effect::FetchVisualization { artifact_id, kind }]
                }
            }
        }
        Msg::VisualizationLoaded {
            artifact_id,
            kind,
            image,
        } => {
            if let Some(slot) = state.visualizations.get_mut(&(artifact_id, kind)) {
                *slot = VisualizationSlot::Ready(image);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::VisualizationFailed {
            artifact_id,
            kind,
            message,
        } => {
            if let Some(slot) = state.visualizations.get_mut(&(artifact_id, kind)) {
                *slot = VisualizationSlot::Failed(message);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn is_current(state: &AppState, origin: Option<&ArtifactId>) -> bool {
    state.tracker.current() == origin
}

fn discard_stale(state: AppState, stage: Stage, artifact_id: &ArtifactId) -> (AppState, Vec<Effect>) {
    wizard_debug!(
        "Ignoring {} data for non-current artifact {}",
        stage.id(),
        artifact_id.short()
    );
    (state, Vec::new())
}

/// Shows `stage`, redirecting to the upload page while no artifact exists,
/// and returns the on-entry fetches for that page.
fn navigate(state: &mut AppState, stage: Stage) -> Vec<Effect> {
    let target = match state.tracker.current() {
        None if stage.requires_artifact() => {
            wizard_debug!("No current artifact; redirecting {} to upload", stage.id());
            Stage::Upload
        }
        _ => stage,
    };

    state.route = target;
    state.metadata = None;
    state.visualizations.clear();
    state.mark_dirty();

    let page = state.page_mut(target);
    if !page.is_submitting() {
        *page = Default::default();
    }
    entry_fetch(state, target)
}

/// Loads the data a page shows for the current artifact.
fn entry_fetch(state: &mut AppState, target: Stage) -> Vec<Effect> {
    let Some(artifact_id) = state.tracker.current().cloned() else {
        return Vec::new();
    };
    let effect = match target {
        Stage::Metadata => Effect::FetchMetadata { artifact_id },
        Stage::Channels => Effect::FetchChannels { artifact_id },
        Stage::Epochs => Effect::FetchEventNames { artifact_id },
        Stage::Upload | Stage::Montage | Stage::Annotations | Stage::Filter => return Vec::new(),
    };
    state.page_mut(target).set_loading(true);
    vec![effect]
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    let stage = state.route;
    if state.page(stage).is_submitting() {
        wizard_debug!("{} submit ignored: request already in flight", stage.id());
        return Vec::new();
    }
    if stage.requires_artifact() && state.tracker.current().is_none() {
        return navigate(state, Stage::Upload);
    }

    state.mark_dirty();
    state.page_mut(stage).begin_validation(stage);
    let forms = &state.forms;
    let validated: Result<StageRequest, ValidationError> = match stage {
        Stage::Upload => forms.upload.validate().map(StageRequest::Upload),
        Stage::Metadata => Ok(StageRequest::Metadata),
        Stage::Channels => forms.channels.validate().map(StageRequest::PickChannels),
        Stage::Montage => forms.montage.validate().map(StageRequest::SetMontage),
        Stage::Annotations => forms
            .annotations
            .validate()
            .map(StageRequest::SetAnnotations),
        Stage::Filter => forms.filter.validate().map(StageRequest::Filter),
        Stage::Epochs => forms.epochs.validate().map(StageRequest::CreateEpochs),
    };

    match validated {
        Err(err) => {
            state.page_mut(stage).fail(stage, err.to_string());
            Vec::new()
        }
        // Metadata has nothing to send; submitting re-runs the fetch.
        Ok(StageRequest::Metadata) => navigate(state, Stage::Metadata),
        Ok(request) => {
            // Uploads do not derive from any artifact.
            let origin = match stage {
                Stage::Upload => None,
                _ => state.tracker.current().cloned(),
            };
            state.page_mut(stage).begin_submit(stage, origin.clone());
            vec![Effect::Submit { origin, request }]
        }
    }
}

fn stage_succeeded(
    state: &mut AppState,
    stage: Stage,
    origin: Option<ArtifactId>,
    artifact_id: ArtifactId,
) -> Vec<Effect> {
    state.mark_dirty();
    if stage != Stage::Upload && !is_current(state, origin.as_ref()) {
        wizard_warn!(
            "Discarding {} result {}: issued against {:?}, current is {:?}",
            stage.id(),
            artifact_id.short(),
            origin.as_ref().map(ArtifactId::short),
            state.tracker.current().map(ArtifactId::short)
        );
        state.page_mut(stage).fail(stage, STALE_RESULT_MESSAGE);
        return Vec::new();
    }

    wizard_info!("Stage {} produced artifact {}", stage.id(), artifact_id.short());
    if stage == Stage::Upload {
        state.clear_session();
        let event = state.tracker.start_lineage(artifact_id.clone(), stage.id());
        state.page_mut(stage).succeed(artifact_id);
        let mut effects = vec![Effect::Publish(event)];
        effects.extend(navigate(state, Stage::Metadata));
        return effects;
    }

    let event = state.tracker.record_stage(artifact_id.clone(), stage.id());
    state.page_mut(stage).succeed(artifact_id);
    let mut effects = vec![Effect::Publish(event)];
    // The page on screen now describes the previous artifact; reload it.
    if state.route == stage {
        effects.extend(entry_fetch(state, stage));
    }
    effects
}

fn apply_edit(state: &mut AppState, edit: FormEdit) {
    let route = state.route;
    let forms = &mut state.forms;
    let result: Result<(), ValidationError> = match edit {
        FormEdit::UploadFile(path) => {
            forms.upload.file = Some(path);
            Ok(())
        }
        FormEdit::AnnotationsFile { path, header_text } => {
            forms.annotations.load_csv(path, &header_text)
        }
        FormEdit::AnnotationsFileUnreadable { message } => {
            forms.annotations.clear();
            state.page_mut(Stage::Annotations).set_error(message);
            state.mark_dirty();
            return;
        }
        FormEdit::ClearAnnotationsFile => {
            forms.annotations.clear();
            Ok(())
        }
        FormEdit::MapColumn { field, column } => forms.annotations.map_column(field, &column),
        FormEdit::ToggleChannel(channel) => {
            forms.channels.toggle(&channel);
            Ok(())
        }
        FormEdit::SelectAllChannels => {
            forms.channels.select_all();
            Ok(())
        }
        FormEdit::SelectTenTwenty => {
            forms.channels.select_ten_twenty();
            Ok(())
        }
        FormEdit::ClearChannels => {
            forms.channels.clear();
            Ok(())
        }
        FormEdit::MontageName(name) => {
            forms.montage.name = name;
            Ok(())
        }
        FormEdit::FilterLow(value) => {
            forms.filter.l_freq = value;
            Ok(())
        }
        FormEdit::FilterHigh(value) => {
            forms.filter.h_freq = value;
            Ok(())
        }
        FormEdit::Tmin(value) => {
            forms.epochs.tmin = value;
            Ok(())
        }
        FormEdit::Tmax(value) => {
            forms.epochs.tmax = value;
            Ok(())
        }
        FormEdit::Baseline(option) => {
            forms.epochs.baseline = option;
            Ok(())
        }
        FormEdit::RejectEeg(value) => {
            forms.epochs.reject_eeg = value;
            Ok(())
        }
        FormEdit::ToggleReference => {
            forms.epochs.set_reference = !forms.epochs.set_reference;
            Ok(())
        }
        FormEdit::ToggleEvent(event) => {
            forms.epochs.toggle_event(&event);
            Ok(())
        }
        FormEdit::SelectAllEvents => {
            forms.epochs.select_all_events();
            Ok(())
        }
        FormEdit::ClearEvents => {
            forms.epochs.clear_events();
            Ok(())
        }
        FormEdit::Preset(index) => match route {
            Stage::Filter => forms.filter.apply_preset(index),
            Stage::Epochs => forms.epochs.apply_preset(index),
            Stage::Montage => forms.montage.apply_preset(index),
            Stage::Upload | Stage::Metadata | Stage::Channels | Stage::Annotations => {
                Err(ValidationError::UnknownPreset(index))
            }
        },
    };

    state.mark_dirty();
    if let Err(err) = result {
        state.page_mut(route).set_error(err.to_string());
    }
}
