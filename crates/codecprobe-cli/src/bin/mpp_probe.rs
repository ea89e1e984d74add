// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Out-of-process Rockchip MPP decode probe.
//!
//! Takes no arguments. Loads the vendor library, tests every codec, writes
//! one result record to stdout and exits. The exit status is non-zero only
//! when the library cannot be loaded or an entry point cannot be bound;
//! "no codec supported" is still a successful probe.

use std::io;
use std::process::ExitCode;

use codecprobe::config::ProbeConfig;
use codecprobe::report::Reporter;

fn main() -> ExitCode {
    let config = ProbeConfig::from_env();
    init_logging(&config);

    let stdout = io::stdout().lock();
    let mut reporter = Reporter::new(stdout);

    match codecprobe::mpp::probe() {
        Ok(result) => {
            // The library handle is already dropped here; only the flush is
            // left between the result and a clean exit.
            match reporter.result(&result).and_then(|()| reporter.flush()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        Err(err) => {
            let _ = reporter.fatal(&err.to_string());
            let _ = reporter.flush();
            ExitCode::FAILURE
        }
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
