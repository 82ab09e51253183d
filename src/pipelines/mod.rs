// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! - [`edge`]: per-frame convert → blur → Canny → composite path
//! - [`snapshot`]: on-demand PNG save of the latest processed frame
//!
//! The edge path runs off the UI thread (CPU-bound stage on
//! `spawn_blocking`); snapshot encoding and writing are fully async so
//! the preview never stalls during a save.

pub mod edge;
pub mod snapshot;
