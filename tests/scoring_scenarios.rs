//! End-to-end scoring scenarios and cross-stage properties.

use roi_reliability::{
    score_reliability, Frame, Rect, RegionOfInterest, ReliabilityLabel, ReliabilityPipeline,
    Recommendation, TripRule,
};

fn uniform(count: usize, fps: f64, boxes: &[Rect], blur: f64) -> Vec<Frame> {
    (0..count)
        .map(|i| Frame::new(i as f64 / fps, boxes.to_vec(), blur))
        .collect()
}

/// Frames whose single box covers `pct` percent of the full-frame ROI.
fn from_pattern(pcts: &[f64], fps: f64) -> Vec<Frame> {
    pcts.iter()
        .enumerate()
        .map(|(i, &pct)| {
            let boxes = if pct > 0.0 {
                vec![Rect::new(0.0, 0.0, pct / 100.0, 1.0)]
            } else {
                vec![]
            };
            Frame::new(i as f64 / fps, boxes, 1500.0)
        })
        .collect()
}

#[test]
fn small_centered_subject_on_sharp_feed_is_reliable() {
    let roi = RegionOfInterest::user(Rect::UNIT);
    let frames = uniform(10, 5.0, &[Rect::new(0.4, 0.4, 0.6, 0.6)], 3000.0);
    let report = score_reliability(&frames, &roi, 5.0).unwrap();

    assert_eq!(report.signals.occlusion_pct_avg, 4.0);
    assert_eq!(report.signals.occlusion_pct_max, 4.0);
    assert_eq!(report.signals.dwell_s_max, 0.0);
    assert_eq!(report.signals.blur_score_avg, 3000);
    assert_eq!(report.timestamps.flip_at_s, 0.0);
    assert_eq!(report.timestamps.standard_ai_alert_at_s, 0.0);
    assert!(report.timestamps.early_not_triggered);
    assert!(report.timestamps.standard_not_triggered);
    assert_eq!(report.reliability_score, 98);
    assert_eq!(report.reliability_label, ReliabilityLabel::Reliable);
    assert_eq!(report.occlusion_series.len(), 10);
}

#[test]
fn subject_filling_the_zone_is_not_reliable() {
    let zone = Rect::new(0.25, 0.6, 0.75, 0.95);
    let roi = RegionOfInterest::user(zone);
    let frames = uniform(15, 5.0, &[zone], 0.0);
    let run = ReliabilityPipeline::default().run(&frames, &roi, 5.0).unwrap();

    assert!(run.series.iter().all(|s| s.pct == 100.0));
    let early = run.early_trip.expect("early trip");
    assert_eq!(early.rule, TripRule::Sustain);
    assert_eq!(early.frame_index, 2);
    let standard = run.standard_trip.expect("standard trip");
    assert_eq!(standard.rule, TripRule::Sustain);
    assert_eq!(standard.timestamp_s, 2.0);

    let report = score_reliability(&frames, &roi, 5.0).unwrap();
    assert_eq!(report.signals.occlusion_pct_max, 100.0);
    assert_eq!(report.signals.dwell_s_max, 3.0);
    assert_eq!(report.signals.dwell_s_total, 3.0);
    assert_eq!(report.timestamps.flip_at_s, 0.4);
    assert_eq!(report.timestamps.standard_ai_alert_at_s, 2.0);
    assert_eq!(report.debug.alert_frame_index, Some(2));
    // risk = 0.6 + 0.3 * 0.6 + 0.1
    assert_eq!(report.reliability_score, 12);
    assert_eq!(report.reliability_label, ReliabilityLabel::NotReliable);
    assert_eq!(report.recommendation, Recommendation::AddOppositeCamera);
}

#[test]
fn boxes_that_miss_the_zone_leave_it_clear() {
    let roi = RegionOfInterest::user(Rect::new(0.0, 0.5, 0.4, 1.0));
    let frames = uniform(
        25,
        5.0,
        &[Rect::new(0.5, 0.0, 1.0, 0.5), Rect::new(0.6, 0.6, 0.9, 0.9)],
        800.0,
    );
    let report = score_reliability(&frames, &roi, 5.0).unwrap();
    assert_eq!(report.signals.occlusion_pct_avg, 0.0);
    assert_eq!(report.signals.occlusion_pct_max, 0.0);
    assert_eq!(report.signals.dwell_s_max, 0.0);
    assert_eq!(report.timestamps.flip_at_s, 0.0);
    assert_eq!(report.timestamps.standard_ai_alert_at_s, 0.0);
}

#[test]
fn degenerate_zone_is_never_occluded() {
    let roi = RegionOfInterest::user(Rect::new(0.5, 0.2, 0.5, 0.8));
    let frames = uniform(10, 5.0, &[Rect::UNIT], 500.0);
    let report = score_reliability(&frames, &roi, 5.0).unwrap();
    assert_eq!(report.signals.occlusion_pct_max, 0.0);
    assert!(report.timestamps.early_not_triggered);
}

#[test]
fn occlusion_stays_in_range_under_heavy_overlap() {
    let roi = RegionOfInterest::user(Rect::new(0.1, 0.1, 0.9, 0.9));
    let boxes: Vec<Rect> = (0..12)
        .map(|i| {
            let o = i as f64 * 0.05;
            Rect::new(o, 0.0, (o + 0.45).min(1.0), 1.0)
        })
        .collect();
    let frames = uniform(5, 5.0, &boxes, 100.0);
    let run = ReliabilityPipeline::default().run(&frames, &roi, 5.0).unwrap();
    assert!(run.series.iter().all(|s| (0.0..=100.0).contains(&s.pct)));
}

#[test]
fn early_policy_never_trips_after_standard() {
    let patterns: Vec<Vec<f64>> = vec![
        vec![70.0; 40],
        vec![35.0; 40],
        vec![15.0; 40],
        [vec![0.0; 5], vec![65.0; 20], vec![0.0; 5], vec![90.0; 15]].concat(),
        (0..60).map(|i| if i % 7 == 0 { 5.0 } else { 62.0 }).collect(),
        (0..60).map(|i| (i as f64 * 3.7) % 100.0).collect(),
    ];
    for pcts in patterns {
        let frames = from_pattern(&pcts, 5.0);
        let report = score_reliability(&frames, &RegionOfInterest::full_frame(), 5.0).unwrap();
        let t = &report.timestamps;
        if !t.early_not_triggered && !t.standard_not_triggered {
            assert!(t.flip_at_s <= t.standard_ai_alert_at_s, "pattern {:?}", pcts);
        }
        if !t.standard_not_triggered {
            assert!(!t.early_not_triggered);
        }
    }
}

#[test]
fn dwell_grows_as_pattern_repeats() {
    let pattern = [0.0, 40.0, 40.0, 15.0, 5.0, 25.0];
    let mut pcts = Vec::new();
    let mut last = 0.0;
    for _ in 0..6 {
        pcts.extend_from_slice(&pattern);
        let frames = from_pattern(&pcts, 5.0);
        let report = score_reliability(&frames, &RegionOfInterest::full_frame(), 5.0).unwrap();
        assert!(report.signals.dwell_s_max >= last);
        last = report.signals.dwell_s_max;
    }
}

#[test]
fn runs_are_deterministic() {
    let pcts: Vec<f64> = (0..50).map(|i| ((i * 13) % 97) as f64).collect();
    let frames = from_pattern(&pcts, 10.0);
    let roi = RegionOfInterest::user(Rect::new(0.0, 0.0, 0.8, 1.0));
    let a = score_reliability(&frames, &roi, 10.0).unwrap();
    let b = score_reliability(&frames, &roi, 10.0).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn parallel_runs_do_not_interfere() {
    let frames = from_pattern(&[50.0; 30], 5.0);
    let expected = score_reliability(&frames, &RegionOfInterest::full_frame(), 5.0).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let frames = frames.clone();
            std::thread::spawn(move || {
                score_reliability(&frames, &RegionOfInterest::full_frame(), 5.0).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn report_uses_wire_field_names() {
    let frames = from_pattern(&[20.0; 3], 5.0);
    let report = score_reliability(&frames, &RegionOfInterest::full_frame(), 5.0).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["reliability_label"], "RELIABLE");
    assert!(value["signals"]["occlusion_pct_avg"].is_number());
    assert!(value["timestamps"]["standard_ai_alert_at_s"].is_number());
    assert!(value["occlusion_series"][0]["occlusion_pct"].is_number());
    assert!(value["occlusion_series"][0]["timestamp"].is_number());
    assert_eq!(value["debug"]["roi_source"], "AUTO");
    assert_eq!(value["debug"]["input_digest"].as_str().unwrap().len(), 64);
}
