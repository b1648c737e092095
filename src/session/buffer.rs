//! Output buffer with tail-limited prompt search.
//!
//! Prompt patterns only ever appear at the end of the accumulated output,
//! so only the last `search_depth` bytes are searched. For large outputs
//! (full "show tech" style dumps) this keeps prompt detection cheap.

use regex::bytes::Regex;

/// Accumulates raw channel output and searches its tail for a prompt.
#[derive(Debug)]
pub struct PromptBuffer {
    buffer: Vec<u8>,
    search_depth: usize,
}

impl PromptBuffer {
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            search_depth,
        }
    }

    /// Append new data, stripping ANSI escape sequences first.
    pub fn extend(&mut self, data: &[u8]) {
        let cleaned = strip_ansi_escapes::strip(data);
        self.buffer.extend_from_slice(&cleaned);
    }

    /// Whether the tail of the buffer matches the prompt pattern.
    pub fn tail_matches(&self, pattern: &Regex) -> bool {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        pattern.is_match(&self.buffer[start..])
    }

    /// Take the accumulated contents, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer)
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for PromptBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}
