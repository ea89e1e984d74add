// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Rockchip MPP vendor library bindings.
//!
//! The prober only ever calls four entry points plus the `reset` slot of the
//! operation table returned by `mpp_create`. The rest of the [`MppApi`]
//! layout is carried as opaque slots so the struct matches the vendor ABI.

use std::ffi::{c_int, c_void};
use std::fmt;

use libloading::os::unix::{Library, RTLD_LAZY};

/// Fixed soname of the vendor decode library.
pub const MPP_LIBRARY: &str = "librockchip_mpp.so";

/// Opaque decoder context handle.
pub type MppCtx = *mut c_void;

pub type MppCtxType = u32;
pub const MPP_CTX_DEC: MppCtxType = 0;
pub const MPP_CTX_ENC: MppCtxType = 1;

pub type MppCodingType = u32;
pub const MPP_VIDEO_CODING_AVC: MppCodingType = 0x7;
pub const MPP_VIDEO_CODING_VP8: MppCodingType = 0x9;
pub const MPP_VIDEO_CODING_VP9: MppCodingType = 0xa;
pub const MPP_VIDEO_CODING_AV1: MppCodingType = 0x0100_0008;

/// Operation table filled in by `mpp_create`.
///
/// Layout is fixed by the vendor ABI: two size/version words, twelve
/// operation slots, the `reset` slot, the `control` slot and sixteen
/// reserved words. Only `reset` is called from this crate's users.
#[repr(C)]
pub struct MppApi {
    pub size: u32,
    pub version: u32,
    pub decode: *mut c_void,
    pub decode_put_packet: *mut c_void,
    pub decode_get_frame: *mut c_void,
    pub encode: *mut c_void,
    pub encode_put_frame: *mut c_void,
    pub encode_get_packet: *mut c_void,
    pub isp: *mut c_void,
    pub isp_put_frame: *mut c_void,
    pub isp_get_frame: *mut c_void,
    pub poll: *mut c_void,
    pub dequeue: *mut c_void,
    pub enqueue: *mut c_void,
    pub reset: Option<unsafe extern "C" fn(ctx: MppCtx) -> c_int>,
    pub control: *mut c_void,
    pub reserv: [u32; 16],
}

pub type MppCreateFn = unsafe extern "C" fn(ctx: *mut MppCtx, mpi: *mut *mut MppApi) -> c_int;
pub type MppCheckSupportFormatFn =
    unsafe extern "C" fn(ctx_type: MppCtxType, coding: MppCodingType) -> c_int;
pub type MppInitFn =
    unsafe extern "C" fn(ctx: MppCtx, ctx_type: MppCtxType, coding: MppCodingType) -> c_int;
pub type MppDestroyFn = unsafe extern "C" fn(ctx: MppCtx) -> c_int;

/// Error from [`MppLibrary::open`].
#[derive(Debug)]
pub enum BindError {
    /// The library itself could not be loaded.
    Library(libloading::Error),
    /// The library loaded but a required entry point is missing.
    Symbol {
        name: &'static str,
        source: libloading::Error,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::Library(err) => write!(f, "{} could not be loaded: {}", MPP_LIBRARY, err),
            BindError::Symbol { name, .. } => write!(f, "missing entry point {}", name),
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindError::Library(err) => Some(err),
            BindError::Symbol { source, .. } => Some(source),
        }
    }
}

/// The loaded vendor library with its four required entry points.
///
/// Construction is atomic: either every entry point binds or [`open`]
/// returns the first failure and the handle is released. Dropping the value
/// unloads the library.
///
/// [`open`]: MppLibrary::open
pub struct MppLibrary {
    pub mpp_create: MppCreateFn,
    pub mpp_check_support_format: MppCheckSupportFormatFn,
    pub mpp_init: MppInitFn,
    pub mpp_destroy: MppDestroyFn,
    __library: Library,
}

impl MppLibrary {
    /// Load [`MPP_LIBRARY`] and resolve the entry point table.
    ///
    /// The library is opened `RTLD_LAZY | RTLD_DEEPBIND` so its own symbol
    /// references resolve within itself rather than against anything the
    /// host process exports.
    ///
    /// # Safety
    ///
    /// Loading a shared library runs its initializers; the caller must trust
    /// the vendor library that the soname resolves to.
    pub unsafe fn open() -> Result<Self, BindError> {
        let library = Library::open(Some(MPP_LIBRARY), RTLD_LAZY | libc::RTLD_DEEPBIND)
            .map_err(BindError::Library)?;

        let mpp_create = *library
            .get::<MppCreateFn>(b"mpp_create\0")
            .map_err(|source| BindError::Symbol { name: "mpp_create", source })?;
        let mpp_check_support_format = *library
            .get::<MppCheckSupportFormatFn>(b"mpp_check_support_format\0")
            .map_err(|source| BindError::Symbol { name: "mpp_check_support_format", source })?;
        let mpp_init = *library
            .get::<MppInitFn>(b"mpp_init\0")
            .map_err(|source| BindError::Symbol { name: "mpp_init", source })?;
        let mpp_destroy = *library
            .get::<MppDestroyFn>(b"mpp_destroy\0")
            .map_err(|source| BindError::Symbol { name: "mpp_destroy", source })?;

        Ok(MppLibrary {
            mpp_create,
            mpp_check_support_format,
            mpp_init,
            mpp_destroy,
            __library: library,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coding_ids_match_vendor_headers() {
        assert_eq!(MPP_VIDEO_CODING_AVC, 0x7);
        assert_eq!(MPP_VIDEO_CODING_VP8, 0x9);
        assert_eq!(MPP_VIDEO_CODING_VP9, 0xa);
        assert_eq!(MPP_VIDEO_CODING_AV1, 0x0100_0008);
        assert_eq!(MPP_CTX_DEC, 0);
    }

    #[test]
    fn api_table_layout() {
        // 2 words, 12 operation slots, reset, control, 16 reserved words.
        let words = 2 * 4 + 16 * 4;
        let slots = 14 * std::mem::size_of::<*mut std::ffi::c_void>();
        assert_eq!(std::mem::size_of::<MppApi>(), words + slots);
    }
}
