// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Edge filter constants
pub mod edge {
    /// Default sensitivity threshold (slider value)
    pub const DEFAULT_THRESHOLD: f32 = 80.0;

    /// Slider range
    pub const THRESHOLD_MIN: f32 = 0.0;
    pub const THRESHOLD_MAX: f32 = 100.0;

    /// Effective low-threshold floor; anything below degenerates into an
    /// all-edges frame
    pub const THRESHOLD_FLOOR: f32 = 10.0;

    /// High Canny threshold as a multiple of the low one
    pub const CANNY_HIGH_RATIO: f32 = 3.0;

    /// Gaussian blur sigma before Canny (what a 5x5 kernel implies)
    pub const BLUR_SIGMA: f32 = 1.1;

    /// Threshold step for keyboard/terminal adjustment
    pub const THRESHOLD_STEP: f32 = 5.0;

    /// Preferred capture resolution; Canny runs on the CPU per frame, so
    /// capture targets this rather than the sensor maximum
    pub const TARGET_WIDTH: u32 = 1280;
    pub const TARGET_HEIGHT: u32 = 720;
}

/// Snapshot storage constants
pub mod snapshot {
    /// Subdirectory under the pictures directory for saved frames
    pub const PICTURES_SUBDIR: &str = "edge-viewer";
}

/// Video format constants
pub mod formats {
    /// Common frame rates to try when exact enumeration fails
    pub const COMMON_FRAMERATES: &[u32] = &[30, 60, 15, 24];

    /// Resolutions offered when format enumeration fails
    pub const FALLBACK_RESOLUTIONS: &[(u32, u32)] = &[(1920, 1080), (1280, 720), (640, 480)];
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Maximum buffer queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Frames buffered between the appsink callback and the consumer;
    /// each queued frame pins a mapped capture buffer, so this stays
    /// small and the appsink drops frames when the consumer is behind
    pub const FRAME_CHANNEL_CAPACITY: usize = 2;
}

/// Timing constants
pub mod timing {
    use std::time::Duration;

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Pipeline playing state timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Frame receive timeout in the subscription loop; bounds how long a
    /// cancel request can go unnoticed
    pub const FRAME_RECV_TIMEOUT: Duration = Duration::from_millis(16);

    /// Backoff before retrying a failed camera session
    pub const SESSION_RETRY_DELAY: Duration = Duration::from_secs(5);

    /// Device hotplug poll interval
    pub const HOTPLUG_POLL_INTERVAL: Duration = Duration::from_secs(2);

    /// How long the snapshot flash overlay stays visible
    pub const FLASH_DURATION: Duration = Duration::from_millis(150);

    /// How long a transient status message stays visible
    pub const STATUS_MESSAGE_DURATION: Duration = Duration::from_secs(4);

    /// Window for the measured-FPS readout
    pub const FPS_WINDOW: Duration = Duration::from_secs(1);
}

/// UI constants
pub mod ui {
    /// Snapshot button size (outer)
    pub const CAPTURE_BUTTON_OUTER: f32 = 60.0;

    /// Snapshot button size (inner)
    pub const CAPTURE_BUTTON_INNER: f32 = 50.0;

    /// Snapshot button border radius
    pub const CAPTURE_BUTTON_RADIUS: f32 = 25.0;

    /// Stats readout text size
    pub const STATS_TEXT_SIZE: u16 = 12;

    /// Gallery thumbnail size
    pub const THUMBNAIL_SIZE: f32 = 48.0;
}

/// Application information utilities
pub mod app_info {
    use std::path::Path;

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        Path::new("/.flatpak-info").exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_constants_consistent() {
        assert!(edge::THRESHOLD_FLOOR > edge::THRESHOLD_MIN);
        assert!(edge::THRESHOLD_FLOOR < edge::THRESHOLD_MAX);
        assert!(edge::DEFAULT_THRESHOLD <= edge::THRESHOLD_MAX);
        assert!(edge::DEFAULT_THRESHOLD >= edge::THRESHOLD_FLOOR);
    }
}
