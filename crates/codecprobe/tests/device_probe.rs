// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies
//
// Device prober integration tests.
//
// TESTING LAYERS:
//
// Layer 1 (No hardware required):
//   - Open failures and non-V4L2 nodes exercised end-to-end
//
// Layer 3 (Hardware integration - requires a V4L2 M2M decoder):
//   - Full capability and format walk against a real device
//
// RUN LAYER 1:
//   cargo test --test device_probe
//
// RUN LAYER 3 (on hardware, e.g. /dev/video10 on an i.MX8M Plus):
//   CODECPROBE_DEVICE=/dev/video10 cargo test --test device_probe -- --ignored

use std::path::Path;

use codecprobe::v4l2::{probe_device, DeviceError};

#[test]
fn nonexistent_path_is_an_open_error() {
    let err = probe_device(Path::new("/dev/video-codecprobe-missing")).unwrap_err();
    assert!(matches!(err, DeviceError::Open { .. }));
    assert!(err.to_string().contains("No such file or directory"));
}

#[test]
fn non_v4l2_node_fails_the_capability_query() {
    // /dev/null opens read/write but rejects VIDIOC_QUERYCAP.
    let err = probe_device(Path::new("/dev/null")).unwrap_err();
    assert!(matches!(err, DeviceError::QueryCapabilities { .. }));
    assert_eq!(
        err.to_string(),
        "device /dev/null failed to query capabilities"
    );
}

#[test]
fn probing_is_idempotent() {
    let first = probe_device(Path::new("/dev/null")).unwrap_err().to_string();
    let second = probe_device(Path::new("/dev/null")).unwrap_err().to_string();
    assert_eq!(first, second);
}

#[test]
#[ignore = "requires a V4L2 M2M decoder (set CODECPROBE_DEVICE and run with --ignored)"]
fn decoder_device_probes_successfully() {
    let path = std::env::var("CODECPROBE_DEVICE").unwrap_or_else(|_| "/dev/video10".to_string());
    let result = probe_device(Path::new(&path)).expect("device should probe");
    assert!(result.supported);
}
