use std::fmt::Display;
use std::io::Write;

use crate::error::Result;

/// The primary output channel: one `key: value` pair per line, flushed
/// immediately so partial results survive a collaborator that never finishes.
#[derive(Debug)]
pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn pair(&mut self, key: &str, value: impl Display) -> Result<()> {
        writeln!(self.out, "{}: {}", key, value)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
