// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use edge_viewer::constants::{edge, formats, timing};

#[test]
fn test_threshold_range_is_ordered() {
    assert!(edge::THRESHOLD_MIN < edge::THRESHOLD_MAX);
    assert!(edge::THRESHOLD_FLOOR > edge::THRESHOLD_MIN);
    assert!(edge::THRESHOLD_FLOOR < edge::THRESHOLD_MAX);
}

#[test]
fn test_default_threshold_is_usable_unclamped() {
    // The default must sit above the floor so first launch shows the
    // slider value actually being applied
    assert!(edge::DEFAULT_THRESHOLD >= edge::THRESHOLD_FLOOR);
    assert!(edge::DEFAULT_THRESHOLD <= edge::THRESHOLD_MAX);
}

#[test]
fn test_threshold_step_fits_slider_range() {
    assert!(edge::THRESHOLD_STEP > 0.0);
    assert!(edge::THRESHOLD_STEP < edge::THRESHOLD_MAX - edge::THRESHOLD_MIN);
}

#[test]
fn test_canny_high_ratio_widens_hysteresis() {
    // The high threshold must be strictly above the low one for the
    // hysteresis stage to do anything
    assert!(edge::CANNY_HIGH_RATIO > 1.0);
}

#[test]
fn test_fallback_resolutions_nonempty() {
    assert!(!formats::FALLBACK_RESOLUTIONS.is_empty());
    assert!(!formats::COMMON_FRAMERATES.is_empty());
}

#[test]
fn test_frame_recv_timeout_bounds_cancel_latency() {
    // A switch request must be noticed within a frame interval
    assert!(timing::FRAME_RECV_TIMEOUT <= std::time::Duration::from_millis(50));
}
