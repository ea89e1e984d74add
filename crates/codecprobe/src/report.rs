// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! The result reporting protocol.
//!
//! A prober writes exactly one record to its output stream during its
//! lifetime, then flushes and exits. Three record shapes exist:
//!
//! ```text
//! SUPPORTED            ERROR                <message>
//! TRUE|FALSE           <message>
//! HWCODECS
//! <decimal-bitmask>
//! ```
//!
//! The first is a completed probe, the second a fatal setup failure, the
//! third the single-line device error record; a caller treats the last two
//! alike. Diagnostics never go through the reporter; they belong on the
//! `log` facade.

use std::io::{self, Write};

use crate::codec::CodecFlags;

/// Outcome of a completed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// Whether the probed path is usable at all.
    pub supported: bool,
    /// The confirmed hardware decode codecs.
    pub hwcodecs: CodecFlags,
}

impl ProbeResult {
    /// Result for a probe whose success is defined by having found at least
    /// one codec.
    pub fn from_flags(hwcodecs: CodecFlags) -> Self {
        ProbeResult {
            supported: !hwcodecs.is_empty(),
            hwcodecs,
        }
    }
}

/// Writer for the result protocol, owning the designated output stream.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Reporter { out }
    }

    /// Write the four-line result record.
    pub fn result(&mut self, result: &ProbeResult) -> io::Result<()> {
        writeln!(self.out, "SUPPORTED")?;
        writeln!(self.out, "{}", if result.supported { "TRUE" } else { "FALSE" })?;
        writeln!(self.out, "HWCODECS")?;
        writeln!(self.out, "{}", result.hwcodecs.bits())
    }

    /// Write the single-line device error record.
    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)
    }

    /// Write the fatal setup failure record.
    pub fn fatal(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "ERROR")?;
        writeln!(self.out, "{}", message)
    }

    /// Flush the output stream. Every prober must flush before exiting.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
