use approx::assert_abs_diff_eq;
use fruit_catcher_core::{Hsv, HsvImage};
use fruit_catcher_vision::{
    estimate, CaptureOutcome, ColorCalibrator, MarkerTracker, ReadingSource, TrackReading,
};
use nalgebra::Point2;

const BACKGROUND: Hsv = Hsv::new(20, 30, 60);
const RED: Hsv = Hsv::new(3, 210, 190);
const BLUE: Hsv = Hsv::new(112, 200, 180);

fn disc(img: &mut HsvImage, cx: i64, cy: i64, r: i64, color: Hsv) {
    for y in cy - r..=cy + r {
        for x in cx - r..=cx + r {
            if (x - cx).pow(2) + (y - cy).pow(2) <= r * r {
                img.put(x, y, color);
            }
        }
    }
}

fn calibrated(frame: &HsvImage, clicks: [(i64, i64); 2]) -> ColorCalibrator {
    let mut calibrator = ColorCalibrator::default();
    for (x, y) in clicks {
        let sample = frame.get(x, y).expect("click inside frame");
        calibrator.capture(sample);
    }
    assert!(calibrator.is_complete());
    calibrator
}

#[test]
fn tilted_pair_gives_expected_control_value() {
    let mut frame = HsvImage::filled(200, 150, BACKGROUND);
    disc(&mut frame, 50, 120, 10, RED);
    disc(&mut frame, 150, 20, 10, BLUE);

    let calibrator = calibrated(&frame, [(50, 120), (150, 20)]);
    let tracker = MarkerTracker::default();
    let view = frame.view();
    let r0 = tracker.track(&view, calibrator.window(0).unwrap(), &TrackReading::default());
    let r1 = tracker.track(&view, calibrator.window(1).unwrap(), &TrackReading::default());
    assert!(r0.is_found() && r1.is_found());

    let o = estimate(r0.centroid, r1.centroid);
    assert_abs_diff_eq!(o.angle, -std::f32::consts::FRAC_PI_4, epsilon = 1e-4);
    assert_abs_diff_eq!(o.normalized_pos, 0.75, epsilon = 1e-4);
}

#[test]
fn largest_blob_wins_over_a_smaller_decoy() {
    let mut frame = HsvImage::filled(200, 120, BACKGROUND);
    disc(&mut frame, 150, 60, 6, BLUE);
    disc(&mut frame, 60, 60, 12, BLUE);

    let mut calibrator = ColorCalibrator::default();
    calibrator.capture(BLUE);
    let reading = MarkerTracker::default().track(
        &frame.view(),
        calibrator.window(0).unwrap(),
        &TrackReading::default(),
    );

    assert_eq!(reading.source, ReadingSource::Found);
    assert_abs_diff_eq!(reading.centroid.x, 60.0, epsilon = 0.5);
    assert_abs_diff_eq!(reading.centroid.y, 60.0, epsilon = 0.5);
}

#[test]
fn specks_alone_leave_the_reading_stale() {
    let mut frame = HsvImage::filled(80, 60, BACKGROUND);
    frame.put(10, 10, RED);
    for (x, y) in [(40, 30), (41, 30), (40, 31), (41, 31)] {
        frame.put(x, y, RED);
    }

    let mut calibrator = ColorCalibrator::default();
    calibrator.capture(RED);
    let previous = TrackReading::found(Point2::new(12.0, 34.0), 7.0);
    let reading =
        MarkerTracker::default().track(&frame.view(), calibrator.window(0).unwrap(), &previous);

    assert_eq!(reading.source, ReadingSource::Stale);
    assert_eq!(reading.stale_ticks, 1);
    assert_eq!(reading.centroid, previous.centroid);
    assert_eq!(reading.radius, previous.radius);
}

#[test]
fn high_hue_sample_opens_the_window_to_the_top() {
    let sample = Hsv::new(145, 200, 200);
    let mut calibrator = ColorCalibrator::default();
    let outcome = calibrator.capture(sample);
    let CaptureOutcome::Assigned { marker, window } = outcome else {
        panic!("first capture should assign marker 0, got {outcome:?}");
    };
    assert_eq!(marker, 0);
    assert_eq!(window.high.h, 255);
    assert!(window.contains(Hsv::new(170, 200, 200)));
    assert!(!window.contains(Hsv::new(136, 200, 200)));
}
