// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Low-level FFI layer for the codecprobe probers.
//!
//! Two independent surfaces live here:
//!
//! - [`mpp`]: the Rockchip MPP decode entry points, resolved at runtime from
//!   `librockchip_mpp.so` through `libloading`. Binding is all-or-nothing;
//!   [`MppLibrary::open`] fails naming the first missing symbol.
//! - [`v4l2`]: the fragments of the V4L2 kernel ABI the device prober needs,
//!   hand-declared: `v4l2_capability`, `v4l2_fmtdesc`, the capability flag
//!   and buffer queue constants, and the `VIDIOC_QUERYCAP` /
//!   `VIDIOC_ENUM_FMT` ioctls.
//!
//! Everything here is `unsafe` plumbing; the safe probing logic lives in the
//! `codecprobe` crate.

#![allow(non_camel_case_types)]
#![allow(clippy::missing_safety_doc)]

// Re-export libloading for error handling
pub use libloading;

mod mpp;
mod v4l2;

pub use mpp::*;
pub use v4l2::*;
