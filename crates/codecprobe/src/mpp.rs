// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Decode capability probing through the Rockchip MPP vendor library.
//!
//! The library is loaded fresh for a single probe and unloaded before the
//! process exits; nothing is cached. Per codec the prober attempts context
//! create, decode support check and init, and sets the codec's capability
//! bit only when all three succeed. A codec failing any step is logged and
//! skipped; only a missing library or entry point is fatal.

use std::ptr;

use log::debug;

use crate::codec::{Codec, CodecFlags};
use crate::report::ProbeResult;
use crate::Error;
use codecprobe_sys as ffi;

pub use codecprobe_sys::{MppLibrary, MPP_LIBRARY};

/// Load the vendor library and bind its entry point table.
///
/// Fails with [`Error::LibraryNotLoaded`] or [`Error::SymbolNotFound`]; both
/// are fatal to the probe. The returned handle unloads the library when
/// dropped, on every exit path.
pub fn load() -> Result<MppLibrary, Error> {
    let library = unsafe { MppLibrary::open() }?;
    debug!("mpp library loaded");
    Ok(library)
}

/// Run the full library probe: load, test every codec, unload.
pub fn probe() -> Result<ProbeResult, Error> {
    debug!("testing mpp");
    let library = load()?;
    let hwcodecs = probe_decoders(&library);
    Ok(ProbeResult::from_flags(hwcodecs))
}

/// Test every codec in [`Codec::ALL`] against the loaded library.
///
/// Contexts rejected by the support check or by init are not destroyed;
/// they are reclaimed when the probe process exits.
pub fn probe_decoders(library: &MppLibrary) -> CodecFlags {
    let mut supported = CodecFlags::empty();

    for codec in Codec::ALL {
        let mut ctx: ffi::MppCtx = ptr::null_mut();
        let mut api: *mut ffi::MppApi = ptr::null_mut();

        if unsafe { (library.mpp_create)(&mut ctx, &mut api) } != 0 {
            debug!("cannot create mpp context for {}", codec);
            continue;
        }

        if unsafe { (library.mpp_check_support_format)(ffi::MPP_CTX_DEC, codec.mpp_coding()) } != 0
        {
            debug!("mpp does not support decoding {}", codec);
            continue;
        }

        if unsafe { (library.mpp_init)(ctx, ffi::MPP_CTX_DEC, codec.mpp_coding()) } != 0 {
            debug!("mpp cannot init a {} decoder context", codec);
            continue;
        }

        supported |= codec.flag();
        unsafe {
            if !api.is_null() {
                if let Some(reset) = (*api).reset {
                    reset(ctx);
                }
            }
            (library.mpp_destroy)(ctx);
        }
        debug!("mpp decodes {} in hardware", codec);
    }

    supported
}
