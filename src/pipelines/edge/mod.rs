// SPDX-License-Identifier: GPL-3.0-only

//! Edge detection pipeline
//!
//! Per-frame path: RGBA conversion, grayscale, Gaussian blur, Canny,
//! then compositing into the selected display mode. Parameters are
//! shared with the UI through [`params::FilterParams`].

pub mod params;
pub mod processor;

pub use params::{EdgeViewMode, FilterParams, effective_threshold};
pub use processor::{EdgeFrame, composite_edges, detect_edges, process_frame};
