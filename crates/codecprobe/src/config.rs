// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Process configuration for the probers.
//!
//! Built once from the environment at process start and threaded through;
//! there is no global mutable probing state.

use std::env;

/// Environment variable gating the diagnostic channel. Diagnostics are
/// emitted only when it is set to the literal value `1`.
pub const DEBUG_ENV: &str = "CODECPROBE_DEBUG";

/// Immutable prober configuration.
#[derive(Debug, Clone, Copy)]
pub struct ProbeConfig {
    /// Whether the diagnostic channel is enabled.
    pub debug: bool,
}

impl ProbeConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        ProbeConfig {
            debug: env::var(DEBUG_ENV).is_ok_and(|value| value == "1"),
        }
    }
}
