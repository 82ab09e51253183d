// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use edge_viewer::Config;
use edge_viewer::EdgeViewMode;
use edge_viewer::constants::edge;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(
        config.edge_threshold,
        edge::DEFAULT_THRESHOLD,
        "Default threshold should match the edge constants"
    );
    assert_eq!(
        config.view_mode,
        EdgeViewMode::Edges,
        "Viewer should start in edge mode"
    );
    assert_eq!(
        config.mirror_preview, false,
        "Mirror preview should be disabled by default"
    );
    assert!(
        config.last_camera_path.is_none(),
        "No camera should be remembered on first run"
    );
}

#[test]
fn test_config_default_threshold_in_slider_range() {
    let config = Config::default();
    assert!(config.edge_threshold >= edge::THRESHOLD_MIN);
    assert!(config.edge_threshold <= edge::THRESHOLD_MAX);
}

#[test]
fn test_config_bug_report_url() {
    // Test that bug report URL is set
    let config = Config::default();
    assert!(
        !config.bug_report_url.is_empty(),
        "Bug report URL should not be empty"
    );
}
