use crate::error::{Result, TimingTableError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

/// How extracted tokens are grouped into CSV rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowLayout {
    /// One token per row when `maxthread` is nonzero. With `maxthread == 0`
    /// tokens are comma-separated on a single unterminated row.
    #[default]
    PerValue,
    /// One row per matrix size: `maxthread - minthread + 1` tokens per row.
    ThreadSweep,
}

impl fmt::Display for RowLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLayout::PerValue => write!(f, "per-value"),
            RowLayout::ThreadSweep => write!(f, "thread-sweep"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThreadRange {
    pub min: u32,
    pub max: u32,
}

impl ThreadRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Number of thread counts in the sweep, `None` when `min > max`.
    pub fn width(&self) -> Option<u64> {
        if self.min > self.max {
            None
        } else {
            Some(u64::from(self.max) - u64::from(self.min) + 1)
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.width() {
            Some(_) => Ok(()),
            None => Err(TimingTableError::InvalidThreadRange {
                min: self.min,
                max: self.max,
            }),
        }
    }
}

impl fmt::Display for ThreadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

pub struct TableWriter<W: Write> {
    writer: W,
    range: ThreadRange,
    layout: RowLayout,
    // current thread count in the sweep
    count: u64,
    fields_in_row: u64,
    rows_written: usize,
    tokens_written: usize,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W, range: ThreadRange, layout: RowLayout) -> Result<Self> {
        if layout == RowLayout::ThreadSweep {
            range.validate()?;
        }

        Ok(Self {
            writer,
            range,
            layout,
            count: u64::from(range.min),
            fields_in_row: 0,
            rows_written: 0,
            tokens_written: 0,
        })
    }

    /// Writes `threads_<n>` column labels for the sweep. Must precede any token.
    pub fn write_header(&mut self) -> Result<()> {
        if self.layout != RowLayout::ThreadSweep {
            return Err(TimingTableError::Config {
                message: "A header row is only available with the thread-sweep layout".to_string(),
            });
        }

        if self.tokens_written > 0 {
            return Err(TimingTableError::Config {
                message: "The header row must be written before any timing value".to_string(),
            });
        }

        // streamed label by label; the range can span the whole u32 domain
        for threads in self.range.min..=self.range.max {
            if threads != self.range.min {
                self.writer.write_all(b",")?;
            }
            write!(self.writer, "threads_{}", threads)?;
        }

        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn push(&mut self, token: &str) -> io::Result<()> {
        match self.layout {
            RowLayout::PerValue => {
                self.writer.write_all(token.as_bytes())?;
                self.count += 1;

                if self.range.max != 0 {
                    self.count = u64::from(self.range.min);
                    self.writer.write_all(b"\n")?;
                    self.rows_written += 1;
                    self.fields_in_row = 0;
                } else {
                    self.writer.write_all(b",")?;
                    self.fields_in_row += 1;
                }
            }
            RowLayout::ThreadSweep => {
                if self.fields_in_row > 0 {
                    self.writer.write_all(b",")?;
                }
                self.writer.write_all(token.as_bytes())?;
                self.fields_in_row += 1;
                self.count += 1;

                if self.count > u64::from(self.range.max) {
                    self.end_row()?;
                }
            }
        }

        self.tokens_written += 1;
        Ok(())
    }

    /// Closes an incomplete sweep row and flushes. Idempotent.
    pub fn close(&mut self) -> io::Result<()> {
        if self.fields_in_row > 0 {
            match self.layout {
                RowLayout::ThreadSweep => self.end_row()?,
                // the open row keeps its trailing separator
                RowLayout::PerValue => {
                    self.rows_written += 1;
                    self.fields_in_row = 0;
                }
            }
        }

        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn tokens_written(&self) -> usize {
        self.tokens_written
    }

    fn end_row(&mut self) -> io::Result<()> {
        self.writer.write_all(b"\n")?;
        self.count = u64::from(self.range.min);
        self.fields_in_row = 0;
        self.rows_written += 1;
        Ok(())
    }
}
