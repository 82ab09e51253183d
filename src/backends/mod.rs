// SPDX-License-Identifier: GPL-3.0-only

//! Backend layer for camera capture via PipeWire

pub mod camera;
