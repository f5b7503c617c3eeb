use std::path::PathBuf;
use std::sync::Once;

use wizard_core::forms::{ColumnField, StageRequest};
use wizard_core::{
    update, AppState, ArtifactId, DatasetMetadata, DatasetSummary, Effect, FormEdit, Msg,
    PageBody, PagePhase, Stage, TrackerEvent, VisualizationImage, VisualizationKind,
    VisualizationSlot, STALE_RESULT_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(wizard_logging::initialize_for_tests);
}

fn apply(state: AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();
    let state = msgs.into_iter().fold(state, |state, msg| {
        let (next, mut produced) = update(state, msg);
        effects.append(&mut produced);
        next
    });
    (state, effects)
}

fn metadata() -> DatasetMetadata {
    DatasetMetadata {
        duration_seconds: 60.0,
        sampling_frequency_hz: 256.0,
        time_points: 15_360,
        eeg_channel_count: 19,
        highpass_hz: 0.0,
        lowpass_hz: 128.0,
    }
}

/// Uploads a recording and lands on the metadata page with `id` current.
fn uploaded(id: &str) -> AppState {
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::Edit(FormEdit::UploadFile(PathBuf::from("rec.edf"))),
            Msg::SubmitClicked,
            Msg::StageSucceeded {
                stage: Stage::Upload,
                origin: None,
                artifact_id: id.into(),
            },
        ],
    );
    state
}

#[test]
fn stage_pages_redirect_to_upload_without_artifact() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Navigate(Stage::Filter));
    assert_eq!(state.route(), Stage::Upload);
    assert!(effects.is_empty());
}

#[test]
fn upload_success_records_stage_and_enters_metadata() {
    init_logging();
    let (state, effects) = apply(
        AppState::new(),
        vec![
            Msg::Edit(FormEdit::UploadFile(PathBuf::from("rec.edf"))),
            Msg::SubmitClicked,
        ],
    );
    assert_eq!(
        effects,
        vec![Effect::Submit {
            origin: None,
            request: StageRequest::Upload(wizard_core::forms::UploadRequest {
                path: PathBuf::from("rec.edf"),
            }),
        }]
    );
    assert!(state.page(Stage::Upload).is_submitting());

    let (state, effects) = update(
        state,
        Msg::StageSucceeded {
            stage: Stage::Upload,
            origin: None,
            artifact_id: "a1".into(),
        },
    );
    assert_eq!(state.tracker().current(), Some(&ArtifactId::new("a1")));
    assert_eq!(state.route(), Stage::Metadata);
    assert_eq!(
        effects,
        vec![
            Effect::Publish(TrackerEvent::LineageStarted {
                stage: "upload".into(),
                artifact_id: "a1".into(),
            }),
            Effect::FetchMetadata {
                artifact_id: "a1".into()
            },
        ]
    );
}

#[test]
fn metadata_load_completes_stage_once_with_same_artifact() {
    init_logging();
    let state = uploaded("a1");
    let (state, effects) = update(
        state,
        Msg::MetadataLoaded {
            artifact_id: "a1".into(),
            metadata: metadata(),
        },
    );
    assert!(state.tracker().has_completed("metadata"));
    assert_eq!(state.tracker().current(), Some(&ArtifactId::new("a1")));
    assert_eq!(state.tracker().previous(), Some(&ArtifactId::new("a1")));
    assert_eq!(effects.len(), 1);
    assert!(matches!(state.view().page.body, PageBody::Metadata(Some(_))));

    // Revisiting does not record the stage again.
    let (state, effects) = apply(
        state,
        vec![
            Msg::Navigate(Stage::Metadata),
            Msg::MetadataLoaded {
                artifact_id: "a1".into(),
                metadata: metadata(),
            },
        ],
    );
    assert_eq!(
        effects,
        vec![Effect::FetchMetadata {
            artifact_id: "a1".into()
        }]
    );
    assert_eq!(state.tracker().history().len(), 2);
}

#[test]
fn invalid_filter_is_rejected_before_any_request() {
    init_logging();
    let (state, effects) = apply(
        uploaded("a1"),
        vec![Msg::Navigate(Stage::Filter), Msg::SubmitClicked],
    );
    assert!(effects.is_empty());
    let page = state.page(Stage::Filter);
    assert_eq!(page.phase(), &PagePhase::Idle);
    assert!(page.error().unwrap().contains("no filter specified"));
}

#[test]
fn filter_submission_advances_tracker_on_success() {
    init_logging();
    let (state, effects) = apply(
        uploaded("a1"),
        vec![
            Msg::Navigate(Stage::Filter),
            Msg::Edit(FormEdit::Preset(4)),
            Msg::SubmitClicked,
        ],
    );
    let Some(Effect::Submit { origin, request }) = effects.last() else {
        panic!("expected submit effect, got {effects:?}");
    };
    assert_eq!(origin.as_ref(), Some(&ArtifactId::new("a1")));
    assert_eq!(request.stage(), Stage::Filter);

    let (state, effects) = update(
        state,
        Msg::StageSucceeded {
            stage: Stage::Filter,
            origin: Some("a1".into()),
            artifact_id: "a2".into(),
        },
    );
    assert_eq!(state.tracker().current(), Some(&ArtifactId::new("a2")));
    assert_eq!(state.tracker().previous(), Some(&ArtifactId::new("a1")));
    assert!(state.tracker().has_completed("filter"));
    assert_eq!(
        effects,
        vec![Effect::Publish(TrackerEvent::StageRecorded {
            stage: "filter".into(),
            artifact_id: "a2".into(),
        })]
    );
    assert_eq!(
        state.page(Stage::Filter).phase(),
        &PagePhase::Succeeded {
            artifact_id: "a2".into()
        }
    );
}

#[test]
fn failed_submission_leaves_tracker_unchanged() {
    init_logging();
    let (state, _) = apply(
        uploaded("a1"),
        vec![Msg::Navigate(Stage::Montage), Msg::SubmitClicked],
    );
    let before = state.tracker().clone();

    let (state, effects) = update(
        state,
        Msg::StageFailed {
            stage: Stage::Montage,
            origin: Some("a1".into()),
            message: "Unknown montage".into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.tracker(), &before);
    assert_eq!(state.tracker().current(), Some(&ArtifactId::new("a1")));
    let page = state.page(Stage::Montage);
    assert_eq!(page.phase(), &PagePhase::Idle);
    assert_eq!(page.error(), Some("Unknown montage"));
}

#[test]
fn duplicate_submit_is_ignored_while_in_flight() {
    init_logging();
    let (state, first) = apply(
        uploaded("a1"),
        vec![Msg::Navigate(Stage::Montage), Msg::SubmitClicked],
    );
    assert_eq!(first.len(), 1);
    let (_state, second) = update(state, Msg::SubmitClicked);
    assert!(second.is_empty());
}

#[test]
fn late_result_for_replaced_dataset_is_discarded() {
    init_logging();
    let (state, _) = apply(
        uploaded("a1"),
        vec![
            Msg::Navigate(Stage::Montage),
            Msg::SubmitClicked,
            // User switches dataset while the montage request is in flight.
            Msg::DatasetSelected("other".into()),
        ],
    );
    let before = state.tracker().clone();

    let (state, effects) = update(
        state,
        Msg::StageSucceeded {
            stage: Stage::Montage,
            origin: Some("a1".into()),
            artifact_id: "a2".into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.tracker(), &before);
    assert_eq!(state.tracker().current(), Some(&ArtifactId::new("other")));
    assert_eq!(state.page(Stage::Montage).error(), Some(STALE_RESULT_MESSAGE));
}

#[test]
fn sidebar_selection_starts_new_lineage() {
    init_logging();
    let (state, _) = apply(
        uploaded("a1"),
        vec![Msg::StageSucceeded {
            stage: Stage::Metadata,
            origin: Some("a1".into()),
            artifact_id: "a1".into(),
        }],
    );
    assert_eq!(state.tracker().history().len(), 2);

    let (state, effects) = update(state, Msg::DatasetSelected("b7".into()));
    let history = state.tracker().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].stage, "upload");
    assert_eq!(state.tracker().previous(), None);
    assert_eq!(state.route(), Stage::Metadata);
    assert_eq!(
        effects,
        vec![
            Effect::Publish(TrackerEvent::LineageStarted {
                stage: "upload".into(),
                artifact_id: "b7".into(),
            }),
            Effect::FetchMetadata {
                artifact_id: "b7".into()
            },
        ]
    );
}

#[test]
fn upload_in_flight_survives_reset() {
    init_logging();
    let (state, effects) = apply(
        uploaded("a1"),
        vec![
            Msg::Navigate(Stage::Upload),
            Msg::Edit(FormEdit::UploadFile(PathBuf::from("second.edf"))),
            Msg::SubmitClicked,
        ],
    );
    let Some(Effect::Submit { origin, .. }) = effects.last() else {
        panic!("expected submit effect, got {effects:?}");
    };
    assert_eq!(origin, &None);

    let (state, effects) = apply(
        state,
        vec![
            Msg::ResetClicked,
            Msg::StageSucceeded {
                stage: Stage::Upload,
                origin: None,
                artifact_id: "c1".into(),
            },
        ],
    );
    assert_eq!(state.tracker().current(), Some(&ArtifactId::new("c1")));
    assert_eq!(state.tracker().history().len(), 1);
    assert_eq!(state.route(), Stage::Metadata);
    assert_eq!(state.page(Stage::Upload).error(), None);
    assert_eq!(
        effects.last(),
        Some(&Effect::FetchMetadata {
            artifact_id: "c1".into()
        })
    );
}

#[test]
fn channel_pick_reloads_list_for_new_artifact() {
    init_logging();
    let (state, _) = apply(
        uploaded("a1"),
        vec![
            Msg::Navigate(Stage::Channels),
            Msg::ChannelsLoaded {
                artifact_id: "a1".into(),
                channels: vec!["Fp1".into(), "Fp2".into(), "STIM".into()],
            },
            Msg::Edit(FormEdit::ToggleChannel("Fp1".into())),
            Msg::SubmitClicked,
        ],
    );

    let (state, effects) = update(
        state,
        Msg::StageSucceeded {
            stage: Stage::Channels,
            origin: Some("a1".into()),
            artifact_id: "a2".into(),
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::Publish(TrackerEvent::StageRecorded {
                stage: "channels".into(),
                artifact_id: "a2".into(),
            }),
            Effect::FetchChannels {
                artifact_id: "a2".into()
            },
        ]
    );
    assert!(state.page(Stage::Channels).is_loading());
    assert_eq!(
        state.page(Stage::Channels).phase(),
        &PagePhase::Succeeded {
            artifact_id: "a2".into()
        }
    );

    let (state, _) = update(
        state,
        Msg::ChannelsLoaded {
            artifact_id: "a2".into(),
            channels: vec!["Fp1".into()],
        },
    );
    assert_eq!(state.forms().channels.available, vec!["Fp1"]);
    assert_eq!(state.forms().channels.selected, vec!["Fp1"]);
}

#[test]
fn epochs_success_reloads_event_names() {
    init_logging();
    let (state, _) = apply(
        uploaded("a1"),
        vec![
            Msg::Navigate(Stage::Epochs),
            Msg::EventNamesLoaded {
                artifact_id: "a1".into(),
                events: vec!["left".into(), "right".into()],
            },
            Msg::SubmitClicked,
        ],
    );
    let (state, effects) = update(
        state,
        Msg::StageSucceeded {
            stage: Stage::Epochs,
            origin: Some("a1".into()),
            artifact_id: "e1".into(),
        },
    );
    assert_eq!(
        effects.last(),
        Some(&Effect::FetchEventNames {
            artifact_id: "e1".into()
        })
    );
    assert!(state.page(Stage::Epochs).is_loading());
}

#[test]
fn reset_clears_everything_and_returns_to_upload() {
    init_logging();
    let (state, effects) = apply(
        uploaded("a1"),
        vec![Msg::Navigate(Stage::Filter), Msg::ResetClicked],
    );
    assert_eq!(effects.last(), Some(&Effect::Publish(TrackerEvent::Reset)));
    assert_eq!(state.tracker().current(), None);
    assert!(state.tracker().history().is_empty());
    assert_eq!(state.route(), Stage::Upload);
    assert!(!state.view().can_reset);

    // Reset on an empty pipeline is a no-op.
    let (_, effects) = update(state, Msg::ResetClicked);
    assert!(effects.is_empty());
}

#[test]
fn channels_page_fetches_on_entry_and_preselects_when_completed() {
    init_logging();
    let (state, effects) = update(uploaded("a1"), Msg::Navigate(Stage::Channels));
    assert_eq!(
        effects,
        vec![Effect::FetchChannels {
            artifact_id: "a1".into()
        }]
    );
    assert!(state.page(Stage::Channels).is_loading());

    let (state, _) = apply(
        state,
        vec![
            Msg::ChannelsLoaded {
                artifact_id: "a1".into(),
                channels: vec!["Fz".into(), "Cz".into()],
            },
            Msg::Edit(FormEdit::ToggleChannel("Cz".into())),
            Msg::SubmitClicked,
            Msg::StageSucceeded {
                stage: Stage::Channels,
                origin: Some("a1".into()),
                artifact_id: "a2".into(),
            },
            Msg::Navigate(Stage::Channels),
            Msg::ChannelsLoaded {
                artifact_id: "a2".into(),
                channels: vec!["Cz".into()],
            },
        ],
    );
    assert_eq!(state.forms().channels.selected, vec!["Cz"]);
    assert!(!state.page(Stage::Channels).is_loading());
}

#[test]
fn channel_list_for_stale_artifact_is_ignored() {
    init_logging();
    let (state, _) = update(uploaded("a1"), Msg::Navigate(Stage::Channels));
    let (state, _) = update(
        state,
        Msg::ChannelsLoaded {
            artifact_id: "old".into(),
            channels: vec!["Fz".into()],
        },
    );
    assert!(state.forms().channels.available.is_empty());
}

#[test]
fn annotations_unparsable_csv_reports_local_error() {
    init_logging();
    let (state, effects) = apply(
        uploaded("a1"),
        vec![
            Msg::Navigate(Stage::Annotations),
            Msg::Edit(FormEdit::AnnotationsFile {
                path: PathBuf::from("empty.csv"),
                header_text: "\n".into(),
            }),
        ],
    );
    assert!(effects.is_empty());
    assert!(state.page(Stage::Annotations).error().is_some());
    assert!(state.forms().annotations.file.is_none());

    let (state, effects) = apply(
        state,
        vec![
            Msg::Edit(FormEdit::AnnotationsFile {
                path: PathBuf::from("ev.csv"),
                header_text: "onset,duration,kind\n".into(),
            }),
            Msg::Edit(FormEdit::MapColumn {
                field: ColumnField::Description,
                column: "kind".into(),
            }),
            Msg::SubmitClicked,
        ],
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::Submit {
            request: StageRequest::SetAnnotations(_),
            ..
        }]
    ));
    assert!(state.page(Stage::Annotations).is_submitting());
}

#[test]
fn visualization_is_fetched_once_and_cached_for_the_view() {
    init_logging();
    let state = uploaded("a1");
    let (state, effects) = update(state, Msg::VisualizationRequested(VisualizationKind::Psd));
    assert_eq!(
        effects,
        vec![Effect::FetchVisualization {
            artifact_id: "a1".into(),
            kind: VisualizationKind::Psd
        }]
    );
    let image = VisualizationImage {
        byte_len: 2048,
        location: "out/a1_psd.png".into(),
    };
    let (state, _) = update(
        state,
        Msg::VisualizationLoaded {
            artifact_id: "a1".into(),
            kind: VisualizationKind::Psd,
            image: image.clone(),
        },
    );
    assert_eq!(
        state.visualization(&"a1".into(), VisualizationKind::Psd),
        Some(&VisualizationSlot::Ready(image))
    );

    let (state, effects) = update(state, Msg::VisualizationRequested(VisualizationKind::Psd));
    assert!(effects.is_empty());

    // Leaving the page drops the cache.
    let (state, _) = update(state, Msg::Navigate(Stage::Montage));
    assert_eq!(state.visualization(&"a1".into(), VisualizationKind::Psd), None);
}

#[test]
fn visualization_failure_is_isolated_and_retriable() {
    init_logging();
    let (state, _) = update(uploaded("a1"), Msg::VisualizationRequested(VisualizationKind::Raw));
    let before = state.tracker().clone();
    let (state, _) = update(
        state,
        Msg::VisualizationFailed {
            artifact_id: "a1".into(),
            kind: VisualizationKind::Raw,
            message: "HTTP 500".into(),
        },
    );
    assert_eq!(state.tracker(), &before);
    assert_eq!(state.page(Stage::Metadata).error(), None);

    let (_, effects) = update(state, Msg::VisualizationRequested(VisualizationKind::Raw));
    assert_eq!(effects.len(), 1);
}

#[test]
fn dataset_list_refresh_and_delete() {
    init_logging();
    let summary = |id: &str| DatasetSummary {
        id: id.to_string(),
        original_filename: format!("{id}.edf"),
        size_bytes: 1024,
        created_at: 1.0,
        modified_at: 2.0,
    };
    let (state, effects) = update(uploaded("a1"), Msg::DatasetsRefreshRequested);
    assert_eq!(effects, vec![Effect::FetchDatasets]);
    assert!(state.view().sidebar.loading);

    let (state, _) = update(state, Msg::DatasetsLoaded(vec![summary("a1"), summary("b2")]));
    let view = state.view();
    assert!(!view.sidebar.loading);
    assert_eq!(view.sidebar.rows.len(), 2);
    assert!(view.sidebar.rows[0].is_current);
    assert!(!view.sidebar.rows[1].is_current);

    let (state, effects) = update(state, Msg::DeleteDatasetClicked("b2".into()));
    assert_eq!(effects, vec![Effect::DeleteDataset { id: "b2".into() }]);
    let (state, _) = update(state, Msg::DatasetDeleted("b2".into()));
    assert_eq!(state.view().sidebar.rows.len(), 1);
}

#[test]
fn timeline_reflects_history_and_route() {
    init_logging();
    let (mut state, _) = apply(
        uploaded("abcdef0123456789"),
        vec![Msg::Navigate(Stage::Filter)],
    );
    let view = state.view();
    let upload = &view.timeline[0];
    assert_eq!(upload.stage, Stage::Upload);
    assert!(upload.completed);
    assert!(!upload.current);
    assert_eq!(upload.artifact_id.as_ref().unwrap().short(), "abcdef01...");

    let filter = view
        .timeline
        .iter()
        .find(|entry| entry.stage == Stage::Filter)
        .unwrap();
    assert!(filter.current);
    assert!(!filter.completed);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}
