// SPDX-License-Identifier: GPL-3.0-only

//! Edge Viewer - a live Canny edge-detection camera viewer for the
//! COSMIC desktop
//!
//! # Architecture
//!
//! - [`app`]: Main application logic and UI
//! - [`backends`]: PipeWire camera enumeration and capture
//! - [`pipelines`]: Edge-detection and snapshot pipelines
//! - [`config`]: User configuration handling
//! - [`storage`]: Snapshot storage and thumbnail loading
//! - [`terminal`]: Terminal-mode viewer

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod pipelines;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use pipelines::edge::{EdgeFrame, EdgeViewMode, FilterParams};
