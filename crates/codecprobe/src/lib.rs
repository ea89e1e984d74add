// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Hardware video decode capability probing.
//!
//! This crate answers one question: which of H.264, VP8, VP9 and AV1 can the
//! current machine decode in hardware? Because the answer has to be extracted
//! from vendor driver stacks that may crash or hang, the probing logic is
//! designed to run inside short-lived standalone processes (`mpp-probe` and
//! `v4l2-probe` from the `codecprobe-cli` crate) that write a structured
//! result to a pipe and exit. A crash takes down the prober, never the
//! caller.
//!
//! Two independent strategies are provided:
//!
//! - [`mpp`]: load the Rockchip MPP vendor library and, per codec, attempt
//!   context create, decode support check and init.
//! - [`v4l2`]: open a V4L2 device node and inspect its capability flags,
//!   memory-to-memory queue layout and enumerated pixel formats.
//!
//! # Result protocol
//!
//! Each prober writes exactly one record to its output stream:
//!
//! ```text
//! SUPPORTED
//! TRUE
//! HWCODECS
//! 16
//! ```
//!
//! or an error (see [`report::Reporter`]). The `HWCODECS` value is the
//! decimal rendering of a [`codec::CodecFlags`] bitmask.
//!
//! # Diagnostics
//!
//! Free-form diagnostics go to the `log` facade and are only enabled when
//! `CODECPROBE_DEBUG=1` is set in the environment (see [`config`]).

use std::{error, fmt};

use codecprobe_sys as ffi;

/// Fatal probing error: required infrastructure is missing.
///
/// These abort the probe with a failure exit status. A capability that is
/// merely absent (codec unsupported, device unsuitable) is never an `Error`;
/// it is reported as part of a normal result or, for the device prober, as a
/// [`v4l2::DeviceError`] record.
#[derive(Debug)]
pub enum Error {
    /// The vendor codec library could not be loaded at runtime
    LibraryNotLoaded(ffi::libloading::Error),

    /// A required vendor entry point could not be bound
    SymbolNotFound(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::LibraryNotLoaded(err) => {
                write!(f, "cannot load mpp library: {}", err)
            }
            Error::SymbolNotFound(name) => write!(f, "cannot bind {}", name),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::LibraryNotLoaded(err) => Some(err),
            Error::SymbolNotFound(_) => None,
        }
    }
}

impl From<ffi::BindError> for Error {
    fn from(err: ffi::BindError) -> Self {
        match err {
            ffi::BindError::Library(source) => Error::LibraryNotLoaded(source),
            ffi::BindError::Symbol { name, .. } => Error::SymbolNotFound(name),
        }
    }
}

/// The codec module defines the probed codecs and their capability bitmask.
pub mod codec;

/// The config module builds the immutable process configuration from the
/// environment.
pub mod config;

/// The fourcc module provides portable handling of fourcc codes.
pub mod fourcc;

/// The mpp module probes decode support through the Rockchip MPP library.
pub mod mpp;

/// The report module implements the result reporting protocol.
pub mod report;

/// The v4l2 module probes decode support on a V4L2 transform device.
pub mod v4l2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_render_wire_messages() {
        assert_eq!(
            Error::SymbolNotFound("mpp_check_support_format").to_string(),
            "cannot bind mpp_check_support_format"
        );
    }
}
