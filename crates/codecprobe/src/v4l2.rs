// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Decode capability probing on a V4L2 memory-to-memory device.
//!
//! [`probe_device`] runs a fixed sequence of checks against one device node:
//! query capabilities, require per-device caps and streaming I/O, determine
//! the transform queue layout, then enumerate pixel formats on the capture
//! and output queues. Every check that fails produces a specific
//! [`DeviceError`]; an unsuitable device is an expected outcome, not a
//! process failure.
//!
//! For a V4L2 M2M decoder, OUTPUT is the bitstream we would feed in and
//! CAPTURE is the decoded frames we would get out.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::codec::{Codec, CodecFlags};
use crate::fourcc::FourCC;
use crate::report::ProbeResult;
use codecprobe_sys as ffi;

/// Decoded-frame formats this system can consume from the capture queue.
const ACCEPTED_CAPTURE_FORMATS: [FourCC; 2] = [FourCC(*b"NV12"), FourCC(*b"YV12")];

/// Bitstream formats reported from the output queue. Only H.264 is listed;
/// the other codecs have no entry in this table.
const REPORTED_OUTPUT_CODECS: [Codec; 1] = [Codec::H264];

/// A device that could not be probed, with one variant per check.
///
/// All of these are recoverable: the prober writes the message as a
/// single-line error record and still exits successfully.
#[derive(Debug)]
pub enum DeviceError {
    /// The device node could not be opened
    Open { path: PathBuf, source: io::Error },
    /// `VIDIOC_QUERYCAP` failed
    QueryCapabilities { path: PathBuf },
    /// The driver does not report per-device capabilities
    NoDeviceCaps { path: PathBuf },
    /// The device cannot stream buffers
    NoStreaming { path: PathBuf },
    /// The device has no memory-to-memory transform queues
    NotTransform { path: PathBuf },
    /// No accepted decoded-frame format on the capture queue
    NoCaptureFormat { path: PathBuf },
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Open { path, source } => {
                write!(f, "failed to open device {}: {}", path.display(), source)
            }
            DeviceError::QueryCapabilities { path } => {
                write!(f, "device {} failed to query capabilities", path.display())
            }
            DeviceError::NoDeviceCaps { path } => write!(
                f,
                "device {} does not report per-device capabilities",
                path.display()
            ),
            DeviceError::NoStreaming { path } => {
                write!(f, "device {} does not support streaming I/O", path.display())
            }
            DeviceError::NotTransform { path } => write!(
                f,
                "device {} does not support memory-to-memory transforms",
                path.display()
            ),
            DeviceError::NoCaptureFormat { path } => write!(
                f,
                "device {} does not support NV12 or YV12 capture formats",
                path.display()
            ),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::Open { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Transform queue layout of an M2M device.
///
/// Multi-plane layouts describe each image plane as a separate memory
/// region; single-plane layouts use one contiguous buffer. A device offering
/// both is treated as multi-plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueLayout {
    SinglePlane,
    MultiPlane,
}

impl QueueLayout {
    /// Derive the layout from the device capability word. `None` means the
    /// device has no transform queues at all (e.g. a plain camera).
    pub fn from_device_caps(device_caps: u32) -> Option<Self> {
        if device_caps & ffi::V4L2_CAP_VIDEO_M2M_MPLANE != 0 {
            Some(QueueLayout::MultiPlane)
        } else if device_caps & ffi::V4L2_CAP_VIDEO_M2M != 0 {
            Some(QueueLayout::SinglePlane)
        } else {
            None
        }
    }

    /// Buffer queue type for decoded frames.
    pub fn capture_queue(self) -> u32 {
        match self {
            QueueLayout::SinglePlane => ffi::V4L2_BUF_TYPE_VIDEO_CAPTURE,
            QueueLayout::MultiPlane => ffi::V4L2_BUF_TYPE_VIDEO_CAPTURE_MPLANE,
        }
    }

    /// Buffer queue type for bitstream input.
    pub fn output_queue(self) -> u32 {
        match self {
            QueueLayout::SinglePlane => ffi::V4L2_BUF_TYPE_VIDEO_OUTPUT,
            QueueLayout::MultiPlane => ffi::V4L2_BUF_TYPE_VIDEO_OUTPUT_MPLANE,
        }
    }
}

/// Capability report of an opened device.
pub struct DeviceCapabilities {
    raw: ffi::v4l2_capability,
}

impl DeviceCapabilities {
    /// Kernel driver name.
    pub fn driver(&self) -> String {
        fixed_str(&self.raw.driver)
    }

    /// Human-readable device name.
    pub fn card(&self) -> String {
        fixed_str(&self.raw.card)
    }

    /// Bus the device hangs off.
    pub fn bus_info(&self) -> String {
        fixed_str(&self.raw.bus_info)
    }

    /// Driver version word.
    pub fn version(&self) -> u32 {
        self.raw.version
    }

    /// Whether the driver fills in the per-device capability word. Drivers
    /// that don't are too old to be trusted here.
    pub fn has_device_caps(&self) -> bool {
        self.raw.capabilities & ffi::V4L2_CAP_DEVICE_CAPS != 0
    }

    /// Whether the device supports streaming buffer I/O.
    pub fn supports_streaming(&self) -> bool {
        self.raw.device_caps & ffi::V4L2_CAP_STREAMING != 0
    }

    /// The device's transform queue layout, if it has one.
    pub fn queue_layout(&self) -> Option<QueueLayout> {
        QueueLayout::from_device_caps(self.raw.device_caps)
    }
}

/// NUL-terminated fixed-size byte field to a lossy string.
fn fixed_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Lazy walk of a driver's format list for one buffer queue.
///
/// `VIDIOC_ENUM_FMT` is issued with an increasing index until the driver
/// errors, which signals the end of the list. The sequence is not
/// restartable; create a fresh iterator per queue.
pub struct FormatIter<'a> {
    device: &'a File,
    queue: u32,
    index: u32,
}

impl Iterator for FormatIter<'_> {
    type Item = FourCC;

    fn next(&mut self) -> Option<FourCC> {
        let mut desc = ffi::v4l2_fmtdesc {
            index: self.index,
            type_: self.queue,
            ..Default::default()
        };
        match unsafe { ffi::vidioc_enum_fmt(self.device.as_raw_fd(), &mut desc) } {
            Ok(_) => {
                self.index += 1;
                let format = FourCC::from(desc.pixelformat);
                debug!("queue {} format [{}] {}", self.queue, desc.index, format);
                Some(format)
            }
            Err(_) => None,
        }
    }
}

/// Enumerate the pixel formats the device offers on one buffer queue.
pub fn formats(device: &File, queue: u32) -> FormatIter<'_> {
    FormatIter {
        device,
        queue,
        index: 0,
    }
}

/// Query the device capability report.
pub fn query_capabilities(device: &File) -> Option<DeviceCapabilities> {
    let mut raw = ffi::v4l2_capability::default();
    match unsafe { ffi::vidioc_querycap(device.as_raw_fd(), &mut raw) } {
        Ok(_) => Some(DeviceCapabilities { raw }),
        Err(_) => None,
    }
}

/// Probe one V4L2 device node for hardware decode capability.
///
/// The device is opened read/write and non-blocking for the duration of the
/// probe; the descriptor is released on every exit path. Reaching the end of
/// the check sequence is a successful probe even when no codec matched the
/// output queue.
pub fn probe_device(path: &Path) -> Result<ProbeResult, DeviceError> {
    debug!("probing device '{}'", path.display());

    let device = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path)
        .map_err(|source| DeviceError::Open {
            path: path.to_owned(),
            source,
        })?;

    let caps = query_capabilities(&device).ok_or_else(|| DeviceError::QueryCapabilities {
        path: path.to_owned(),
    })?;
    debug!(
        "driver {} card {} bus_info {} version {}",
        caps.driver(),
        caps.card(),
        caps.bus_info(),
        caps.version()
    );

    if !caps.has_device_caps() {
        return Err(DeviceError::NoDeviceCaps {
            path: path.to_owned(),
        });
    }

    if !caps.supports_streaming() {
        return Err(DeviceError::NoStreaming {
            path: path.to_owned(),
        });
    }

    // No transform queues at all: it's probably a webcam.
    let layout = caps.queue_layout().ok_or_else(|| DeviceError::NotTransform {
        path: path.to_owned(),
    })?;

    let capture_usable = formats(&device, layout.capture_queue())
        .any(|format| ACCEPTED_CAPTURE_FORMATS.contains(&format));
    if !capture_usable {
        return Err(DeviceError::NoCaptureFormat {
            path: path.to_owned(),
        });
    }

    let hwcodecs = decode_flags(formats(&device, layout.output_queue()));
    Ok(ProbeResult {
        supported: true,
        hwcodecs,
    })
}

/// Fold enumerated output-queue formats into the capability bitmask via the
/// fixed codec table.
fn decode_flags(formats: impl Iterator<Item = FourCC>) -> CodecFlags {
    formats.fold(CodecFlags::empty(), |acc, format| {
        match REPORTED_OUTPUT_CODECS
            .iter()
            .find(|codec| codec.pixel_format() == format)
        {
            Some(codec) => acc | codec.flag(),
            None => acc,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_caps(capabilities: u32, device_caps: u32) -> DeviceCapabilities {
        let mut raw = ffi::v4l2_capability::default();
        raw.driver[..6].copy_from_slice(b"hantro");
        raw.card[..11].copy_from_slice(b"hantro-vpu0");
        raw.bus_info[..8].copy_from_slice(b"platform");
        raw.version = 0x0005_0F00;
        raw.capabilities = capabilities;
        raw.device_caps = device_caps;
        DeviceCapabilities { raw }
    }

    #[test]
    fn fixed_fields_stop_at_nul() {
        let caps = raw_caps(0, 0);
        assert_eq!(caps.driver(), "hantro");
        assert_eq!(caps.card(), "hantro-vpu0");
        assert_eq!(caps.bus_info(), "platform");
    }

    #[test]
    fn device_caps_flag_is_required() {
        let caps = raw_caps(0, ffi::V4L2_CAP_STREAMING);
        assert!(!caps.has_device_caps());

        let caps = raw_caps(ffi::V4L2_CAP_DEVICE_CAPS, ffi::V4L2_CAP_STREAMING);
        assert!(caps.has_device_caps());
        assert!(caps.supports_streaming());
    }

    #[test]
    fn queue_layout_prefers_multi_plane() {
        assert_eq!(QueueLayout::from_device_caps(0), None);
        assert_eq!(
            QueueLayout::from_device_caps(ffi::V4L2_CAP_VIDEO_M2M),
            Some(QueueLayout::SinglePlane)
        );
        assert_eq!(
            QueueLayout::from_device_caps(ffi::V4L2_CAP_VIDEO_M2M_MPLANE),
            Some(QueueLayout::MultiPlane)
        );
        assert_eq!(
            QueueLayout::from_device_caps(
                ffi::V4L2_CAP_VIDEO_M2M | ffi::V4L2_CAP_VIDEO_M2M_MPLANE
            ),
            Some(QueueLayout::MultiPlane)
        );
    }

    #[test]
    fn queue_types_follow_layout() {
        assert_eq!(
            QueueLayout::SinglePlane.capture_queue(),
            ffi::V4L2_BUF_TYPE_VIDEO_CAPTURE
        );
        assert_eq!(
            QueueLayout::SinglePlane.output_queue(),
            ffi::V4L2_BUF_TYPE_VIDEO_OUTPUT
        );
        assert_eq!(
            QueueLayout::MultiPlane.capture_queue(),
            ffi::V4L2_BUF_TYPE_VIDEO_CAPTURE_MPLANE
        );
        assert_eq!(
            QueueLayout::MultiPlane.output_queue(),
            ffi::V4L2_BUF_TYPE_VIDEO_OUTPUT_MPLANE
        );
    }

    #[test]
    fn only_h264_maps_from_the_output_queue() {
        let formats = vec![
            FourCC(*b"NV12"),
            FourCC(*b"VP80"),
            FourCC(*b"VP90"),
            FourCC(*b"AV10"),
            FourCC(*b"H264"),
        ];
        let flags = decode_flags(formats.into_iter());
        assert_eq!(flags, Codec::H264.flag());
    }

    #[test]
    fn no_output_match_yields_empty_flags() {
        let formats = vec![FourCC(*b"MJPG"), FourCC(*b"HEVC")];
        assert!(decode_flags(formats.into_iter()).is_empty());
    }

    #[test]
    fn accepted_capture_formats() {
        assert!(ACCEPTED_CAPTURE_FORMATS.contains(&FourCC(*b"NV12")));
        assert!(ACCEPTED_CAPTURE_FORMATS.contains(&FourCC(*b"YV12")));
        assert!(!ACCEPTED_CAPTURE_FORMATS.contains(&FourCC(*b"YUYV")));
    }

    #[test]
    fn open_error_names_the_os_reason() {
        let err = probe_device(Path::new("/dev/video-does-not-exist")).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("failed to open device /dev/video-does-not-exist"));
        assert!(message.contains("No such file or directory"));
    }
}
