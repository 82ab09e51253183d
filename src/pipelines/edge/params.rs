// SPDX-License-Identifier: GPL-3.0-only

//! Shared filter parameters
//!
//! Written only by the UI thread, read once per frame by the processing
//! task. Stored as atomics so cross-thread reads never tear and the
//! frame path stays lock-free.

use crate::constants::edge;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Display mode for the processed preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EdgeViewMode {
    /// White edge pixels on an opaque black background
    #[default]
    Edges,
    /// The RGBA camera frame passed through unchanged
    Original,
}

impl EdgeViewMode {
    /// The other mode; toggling twice is the identity
    pub fn toggled(self) -> Self {
        match self {
            EdgeViewMode::Edges => EdgeViewMode::Original,
            EdgeViewMode::Original => EdgeViewMode::Edges,
        }
    }
}

impl std::fmt::Display for EdgeViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeViewMode::Edges => write!(f, "Edges"),
            EdgeViewMode::Original => write!(f, "Original"),
        }
    }
}

/// Filter parameters shared between the UI and the processing task
///
/// The threshold is stored as f32 bits in an `AtomicU32`; the slider
/// range is 0-100 and the effective value is floor-clamped so a
/// near-zero setting cannot degenerate into an all-edges frame.
#[derive(Debug)]
pub struct FilterParams {
    threshold_bits: AtomicU32,
    edges_mode: AtomicBool,
    mirror: AtomicBool,
}

impl FilterParams {
    pub fn new(threshold: f32, mode: EdgeViewMode, mirror: bool) -> Self {
        Self {
            threshold_bits: AtomicU32::new(threshold.to_bits()),
            edges_mode: AtomicBool::new(mode == EdgeViewMode::Edges),
            mirror: AtomicBool::new(mirror),
        }
    }

    /// The raw slider value (0-100), as last set by the UI
    pub fn threshold(&self) -> f32 {
        f32::from_bits(self.threshold_bits.load(Ordering::Acquire))
    }

    pub fn set_threshold(&self, threshold: f32) {
        let clamped = threshold.clamp(edge::THRESHOLD_MIN, edge::THRESHOLD_MAX);
        self.threshold_bits
            .store(clamped.to_bits(), Ordering::Release);
    }

    /// The low Canny threshold actually applied: `max(threshold, floor)`
    pub fn effective_threshold(&self) -> f32 {
        effective_threshold(self.threshold())
    }

    pub fn view_mode(&self) -> EdgeViewMode {
        if self.edges_mode.load(Ordering::Acquire) {
            EdgeViewMode::Edges
        } else {
            EdgeViewMode::Original
        }
    }

    pub fn set_view_mode(&self, mode: EdgeViewMode) {
        self.edges_mode
            .store(mode == EdgeViewMode::Edges, Ordering::Release);
    }

    /// Flip to the other display mode and return it
    pub fn toggle_view_mode(&self) -> EdgeViewMode {
        let next = self.view_mode().toggled();
        self.set_view_mode(next);
        next
    }

    pub fn mirror(&self) -> bool {
        self.mirror.load(Ordering::Acquire)
    }

    pub fn set_mirror(&self, mirror: bool) {
        self.mirror.store(mirror, Ordering::Release);
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::new(edge::DEFAULT_THRESHOLD, EdgeViewMode::default(), false)
    }
}

/// Clamp a slider value to the effective low Canny threshold
pub fn effective_threshold(threshold: f32) -> f32 {
    threshold.max(edge::THRESHOLD_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_floor_clamp() {
        for raw in [0.0, 0.5, 5.0, 9.99] {
            assert_eq!(effective_threshold(raw), edge::THRESHOLD_FLOOR);
        }
        assert_eq!(effective_threshold(10.0), 10.0);
        assert_eq!(effective_threshold(80.0), 80.0);
    }

    #[test]
    fn test_set_threshold_clamps_to_slider_range() {
        let params = FilterParams::default();
        params.set_threshold(250.0);
        assert_eq!(params.threshold(), edge::THRESHOLD_MAX);
        params.set_threshold(-10.0);
        assert_eq!(params.threshold(), edge::THRESHOLD_MIN);
    }

    #[test]
    fn test_double_toggle_is_identity() {
        let params = FilterParams::default();
        let initial = params.view_mode();
        params.toggle_view_mode();
        assert_ne!(params.view_mode(), initial);
        params.toggle_view_mode();
        assert_eq!(params.view_mode(), initial);
    }

    #[test]
    fn test_default_threshold() {
        let params = FilterParams::default();
        assert_eq!(params.threshold(), edge::DEFAULT_THRESHOLD);
        assert_eq!(params.view_mode(), EdgeViewMode::Edges);
    }
}
