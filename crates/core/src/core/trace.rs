//! Benchmark trace reading and parsing.
//!
//! A trace is a line-oriented ASCII file; each line is one instruction
//! group: `<compute_count> <addr> <type>`, meaning `compute_count` compute
//! instructions followed by one memory operation. It provides:
//! 1. **Reading:** Buffered line iteration over the trace file.
//! 2. **Parsing:** Group extraction with malformed lines skipped and
//!    counted.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};

use crate::common::error::SimError;
use crate::common::msg::ReqKind;

/// One parsed trace line: a compute burst followed by a memory operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Compute instructions to dispatch before the memory operation.
    pub compute_count: u32,
    /// Address of the memory operation.
    pub addr: u64,
    /// `Read` for an `R` line, `Write` for a `W` line.
    pub kind: ReqKind,
}

/// Parses one trace line.
///
/// The address is hexadecimal when `0x`-prefixed, decimal otherwise. Lines
/// that are blank, truncated, or carry an unknown type letter yield `None`.
pub fn parse_line(line: &str) -> Option<TraceRecord> {
    let mut fields = line.split_whitespace();
    let compute_count: u32 = fields.next()?.parse().ok()?;
    let addr_text = fields.next()?;
    let addr = match addr_text.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok()?,
        None => addr_text.parse().ok()?,
    };
    let kind = match fields.next()? {
        "R" => ReqKind::Read,
        "W" => ReqKind::Write,
        _ => return None,
    };
    Some(TraceRecord {
        compute_count,
        addr,
        kind,
    })
}

/// Line reader over a benchmark trace file.
pub struct TraceReader {
    lines: Lines<BufReader<File>>,
    exhausted: bool,
    /// Blank or malformed lines that were skipped.
    pub skipped_lines: u64,
    log: bool,
}

impl TraceReader {
    /// Opens a trace file. Failure to open is fatal to initialization.
    pub fn open(path: &str, log: bool) -> Result<Self, SimError> {
        let file = File::open(path).map_err(|e| SimError::TraceOpen(path.to_string(), e))?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            exhausted: false,
            skipped_lines: 0,
            log,
        })
    }

    /// Returns the next well-formed group, skipping anything malformed.
    /// `None` means the stream is drained (also on a read error, which is
    /// treated as end of stream).
    pub fn next_group(&mut self) -> Option<TraceRecord> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(_)) | None => {
                    self.exhausted = true;
                    return None;
                }
            };
            match parse_line(&line) {
                Some(record) => return Some(record),
                None => {
                    self.skipped_lines += 1;
                    if self.log {
                        eprintln!("[trace] warning: skipping malformed line '{}'", line);
                    }
                }
            }
        }
    }

    /// True once the stream has been fully drained.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
