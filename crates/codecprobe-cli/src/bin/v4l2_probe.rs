// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Out-of-process V4L2 M2M decode probe.
//!
//! Probes the device named by `--device` and writes one result or error
//! record to stdout. An unsuitable or unopenable device is an expected
//! answer, so the process exits successfully either way; invoking without a
//! device prints usage and exits successfully without probing.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use codecprobe::config::ProbeConfig;
use codecprobe::report::Reporter;
use codecprobe::v4l2;

/// V4L2 M2M decode probe utility
#[derive(Parser, Debug)]
#[command(name = "v4l2-probe")]
#[command(version)]
#[command(about = "Probe a V4L2 device for hardware decode capability")]
struct Cli {
    /// Probe a v4l2 device (e.g. /dev/video10)
    #[arg(short, long, value_name = "DEVICE")]
    device: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(device) = cli.device else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    let config = ProbeConfig::from_env();
    init_logging(&config);
    log::debug!("executing device probe: {:?}", device);

    let stdout = io::stdout().lock();
    let mut reporter = Reporter::new(stdout);

    let written = match v4l2::probe_device(&device) {
        Ok(result) => reporter.result(&result),
        // An unprobeable device is a legitimate answer, reported as an error
        // record with a clean exit.
        Err(err) => reporter.error(&err.to_string()),
    };

    match written.and_then(|()| reporter.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Initialize env_logger; the diagnostic channel is closed unless the debug
/// toggle is set.
fn init_logging(config: &ProbeConfig) {
    let filter = if config.debug { "debug" } else { "off" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None) // Disable timestamps for cleaner pipe output
        .format_target(false) // Disable target (module path) for cleaner output
        .init();
}
