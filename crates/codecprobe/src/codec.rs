// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Probed codecs and the hardware capability bitmask.
//!
//! Each [`Codec`] owns one bit of [`CodecFlags`], an MPP coding id and a
//! V4L2 bitstream fourcc. A bit is only ever set after a driver or the
//! vendor library explicitly confirmed the codec; the probers never assume
//! support. The bitmask crosses the process boundary as a decimal integer
//! (see [`crate::report`]); everywhere else it stays a typed flag set.

use std::fmt;

use crate::fourcc::FourCC;
use codecprobe_sys as ffi;

bitflags::bitflags! {
    /// Hardware decode capability bits, one per codec.
    ///
    /// Bit values are part of the wire protocol and must not be renumbered.
    pub struct CodecFlags: u32 {
        const H264 = 1 << 4;
        const VP8 = 1 << 5;
        const VP9 = 1 << 6;
        const AV1 = 1 << 7;
    }
}

/// A video codec the probers know how to test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    H264,
    Vp8,
    Vp9,
    Av1,
}

impl Codec {
    /// Every probed codec, in the fixed probe order.
    pub const ALL: [Codec; 4] = [Codec::H264, Codec::Vp8, Codec::Vp9, Codec::Av1];

    /// The capability bit this codec contributes to a probe result.
    pub fn flag(self) -> CodecFlags {
        match self {
            Codec::H264 => CodecFlags::H264,
            Codec::Vp8 => CodecFlags::VP8,
            Codec::Vp9 => CodecFlags::VP9,
            Codec::Av1 => CodecFlags::AV1,
        }
    }

    /// The MPP coding id passed to the vendor library.
    pub fn mpp_coding(self) -> ffi::MppCodingType {
        match self {
            Codec::H264 => ffi::MPP_VIDEO_CODING_AVC,
            Codec::Vp8 => ffi::MPP_VIDEO_CODING_VP8,
            Codec::Vp9 => ffi::MPP_VIDEO_CODING_VP9,
            Codec::Av1 => ffi::MPP_VIDEO_CODING_AV1,
        }
    }

    /// The V4L2 fourcc of this codec's compressed bitstream format.
    pub fn pixel_format(self) -> FourCC {
        match self {
            Codec::H264 => FourCC(*b"H264"),
            Codec::Vp8 => FourCC(*b"VP80"),
            Codec::Vp9 => FourCC(*b"VP90"),
            Codec::Av1 => FourCC(*b"AV10"),
        }
    }

    /// Get human-readable name for this codec
    pub fn name(&self) -> &'static str {
        match self {
            Codec::H264 => "H.264",
            Codec::Vp8 => "VP8",
            Codec::Vp9 => "VP9",
            Codec::Av1 => "AV1",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bits_are_fixed() {
        assert_eq!(CodecFlags::H264.bits(), 16);
        assert_eq!(CodecFlags::VP8.bits(), 32);
        assert_eq!(CodecFlags::VP9.bits(), 64);
        assert_eq!(CodecFlags::AV1.bits(), 128);
    }

    #[test]
    fn flags_do_not_overlap() {
        for codec in Codec::ALL {
            for other in Codec::ALL {
                if codec != other {
                    assert!((codec.flag() & other.flag()).is_empty());
                }
            }
        }
    }

    #[test]
    fn flags_accumulate_in_any_order() {
        let forward = Codec::ALL
            .iter()
            .fold(CodecFlags::empty(), |acc, c| acc | c.flag());
        let reverse = Codec::ALL
            .iter()
            .rev()
            .fold(CodecFlags::empty(), |acc, c| acc | c.flag());
        assert_eq!(forward, reverse);
        assert_eq!(forward.bits(), 16 + 32 + 64 + 128);
    }

    #[test]
    fn mpp_coding_ids() {
        assert_eq!(Codec::H264.mpp_coding(), 0x7);
        assert_eq!(Codec::Vp8.mpp_coding(), 0x9);
        assert_eq!(Codec::Vp9.mpp_coding(), 0xa);
        assert_eq!(Codec::Av1.mpp_coding(), 0x0100_0008);
    }

    #[test]
    fn bitstream_fourccs_are_distinct() {
        for codec in Codec::ALL {
            for other in Codec::ALL {
                if codec != other {
                    assert_ne!(codec.pixel_format(), other.pixel_format());
                }
            }
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(format!("{}", Codec::H264), "H.264");
        assert_eq!(format!("{}", Codec::Av1), "AV1");
    }
}
