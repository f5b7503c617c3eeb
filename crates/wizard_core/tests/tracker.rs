use chrono::{TimeZone, Utc};
use wizard_core::{ArtifactId, ArtifactTracker, TrackerEvent};

fn init_logging() {
    wizard_logging::initialize_for_tests();
}

const STAGES: [&str; 5] = ["upload", "metadata", "channels", "filter", "custom-step"];

/// Deterministic pseudo-random stage picks (LCG) for interleaving checks.
fn stage_sequence(seed: u64, len: usize) -> Vec<&'static str> {
    let mut x = seed;
    (0..len)
        .map(|_| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            STAGES[((x >> 33) % STAGES.len() as u64) as usize]
        })
        .collect()
}

#[test]
fn new_tracker_is_empty() {
    let tracker = ArtifactTracker::new();
    assert_eq!(tracker.current(), None);
    assert_eq!(tracker.previous(), None);
    assert!(tracker.history().is_empty());
    assert!(!tracker.has_completed("upload"));
}

#[test]
fn record_stage_shifts_current_into_previous() {
    init_logging();
    for seed in 1..20 {
        let mut tracker = ArtifactTracker::new();
        for (i, stage) in stage_sequence(seed, 12).into_iter().enumerate() {
            let before = tracker.current().cloned();
            let id = ArtifactId::new(format!("artifact-{seed}-{i}"));

            let event = tracker.record_stage(id.clone(), stage);

            assert_eq!(tracker.current(), Some(&id));
            assert_eq!(tracker.previous(), before.as_ref());
            assert_eq!(tracker.history().last().unwrap().artifact_id, id);
            assert_eq!(tracker.history().last().unwrap().stage, stage);
            assert_eq!(tracker.history().len(), i + 1);
            assert_eq!(
                event,
                TrackerEvent::StageRecorded {
                    stage: stage.to_string(),
                    artifact_id: id
                }
            );
        }
    }
}

#[test]
fn history_keeps_completion_order_and_timestamps() {
    let mut tracker = ArtifactTracker::new();
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap();
    tracker.record_stage_at("a".into(), "upload", t0);
    tracker.record_stage_at("a".into(), "metadata", t1);

    let stages: Vec<_> = tracker.history().iter().map(|s| s.stage.as_str()).collect();
    assert_eq!(stages, vec!["upload", "metadata"]);
    assert_eq!(tracker.history()[1].timestamp, t1);
    assert_eq!(tracker.previous(), Some(&ArtifactId::new("a")));
}

#[test]
fn reset_returns_to_initial_state_regardless_of_history() {
    for len in [0, 1, 2, 7, 30] {
        let mut tracker = ArtifactTracker::new();
        for (i, stage) in stage_sequence(len as u64 + 3, len).into_iter().enumerate() {
            tracker.record_stage(ArtifactId::new(format!("id-{i}")), stage);
        }

        assert_eq!(tracker.reset(), TrackerEvent::Reset);
        assert_eq!(tracker, ArtifactTracker::new());
        assert_eq!(tracker.current(), None);
        assert_eq!(tracker.previous(), None);
        assert!(tracker.history().is_empty());
        for stage in STAGES {
            assert!(!tracker.has_completed(stage));
        }
    }
}

#[test]
fn start_lineage_replaces_history_with_one_step() {
    let mut tracker = ArtifactTracker::new();
    tracker.record_stage("a".into(), "upload");
    tracker.record_stage("b".into(), "filter");

    let event = tracker.start_lineage("c".into(), "upload");
    assert_eq!(
        event,
        TrackerEvent::LineageStarted {
            stage: "upload".into(),
            artifact_id: "c".into()
        }
    );
    assert_eq!(tracker.current(), Some(&ArtifactId::new("c")));
    assert_eq!(tracker.previous(), None);
    assert_eq!(tracker.history().len(), 1);
    assert!(!tracker.has_completed("filter"));
}

#[test]
fn has_completed_matches_recorded_stage_names() {
    for seed in 1..30 {
        let mut tracker = ArtifactTracker::new();
        let sequence = stage_sequence(seed, (seed % 9) as usize);
        for (i, stage) in sequence.iter().enumerate() {
            tracker.record_stage(ArtifactId::new(i.to_string()), *stage);
        }
        for stage in STAGES {
            assert_eq!(tracker.has_completed(stage), sequence.contains(&stage));
        }
        assert!(!tracker.has_completed("never-recorded"));
    }
}

#[test]
fn artifact_for_returns_first_completion() {
    let mut tracker = ArtifactTracker::new();
    tracker.record_stage("first".into(), "filter");
    tracker.record_stage("second".into(), "filter");

    assert_eq!(tracker.artifact_for("filter"), Some(&ArtifactId::new("first")));
    assert_eq!(tracker.current(), Some(&ArtifactId::new("second")));
    assert_eq!(tracker.artifact_for("epochs"), None);
}

#[test]
fn short_id_is_used_for_timeline_labels() {
    assert_eq!(ArtifactId::new("0123456789abcdef").short(), "01234567...");
}
