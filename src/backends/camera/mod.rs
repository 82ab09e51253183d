// SPDX-License-Identifier: GPL-3.0-only

//! Camera capture backend
//!
//! PipeWire is the only backend; enumeration, format detection, and the
//! capture pipeline live under `pipewire`, shared types and the CPU
//! pixel-format converters alongside.

pub mod format_converters;
pub mod pipewire;
pub mod types;

pub use types::*;
