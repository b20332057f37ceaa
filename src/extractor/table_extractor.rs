use crate::error::{Result, TimingTableError};
use crate::extractor::table_writer::{RowLayout, TableWriter, ThreadRange};
use crate::scanner::{TokenMatch, TokenScanner};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

const BUFFER_SIZE: usize = 64 * 1024;

/// What to do with a line that carries no timing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTokenPolicy {
    #[default]
    Skip,
    Abort,
}

impl fmt::Display for MissingTokenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingTokenPolicy::Skip => write!(f, "skip"),
            MissingTokenPolicy::Abort => write!(f, "abort"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub lines_read: usize,
    pub tokens_written: usize,
    pub rows_written: usize,
    /// 1-based line numbers without a timing value.
    pub skipped_lines: Vec<usize>,
    pub duration: Duration,
}

impl ExtractionStats {
    pub fn skipped(&self) -> usize {
        self.skipped_lines.len()
    }

    pub fn hit_rate(&self) -> f64 {
        if self.lines_read == 0 {
            0.0
        } else {
            (self.tokens_written as f64 / self.lines_read as f64) * 100.0
        }
    }
}

pub struct TableExtractor {
    scanner: TokenScanner,
    range: ThreadRange,
    layout: RowLayout,
    policy: MissingTokenPolicy,
    header: bool,
}

impl TableExtractor {
    pub fn new(scanner: TokenScanner, range: ThreadRange) -> Self {
        Self {
            scanner,
            range,
            layout: RowLayout::default(),
            policy: MissingTokenPolicy::default(),
            header: false,
        }
    }

    pub fn with_layout(mut self, layout: RowLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_policy(mut self, policy: MissingTokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Reads `input` and writes the table to `output`, truncating any previous
    /// contents. Both handles are closed on every return path.
    pub fn extract_file(&self, input: &Path, output: &Path) -> Result<ExtractionStats> {
        if !input.is_file() {
            return Err(TimingTableError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let source = fs::File::open(input).map_err(|e| TimingTableError::InputUnreadable {
            path: input.to_path_buf(),
            source: e,
        })?;

        let dest = fs::File::create(output).map_err(|e| TimingTableError::OutputWrite {
            path: output.to_path_buf(),
            source: e,
        })?;

        let reader = BufReader::with_capacity(BUFFER_SIZE, source);
        let writer = BufWriter::with_capacity(BUFFER_SIZE, dest);

        let (stats, _) = self.extract_stream(reader, writer, input, output)?;
        Ok(stats)
    }

    /// Core scan loop. `input` and `output` only label errors.
    pub fn extract_stream<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        writer: W,
        input: &Path,
        output: &Path,
    ) -> Result<(ExtractionStats, W)> {
        let start_time = Instant::now();
        let write_error = |e: std::io::Error| TimingTableError::OutputWrite {
            path: output.to_path_buf(),
            source: e,
        };

        let mut table = TableWriter::new(writer, self.range, self.layout)?;
        if self.header {
            table.write_header().map_err(|e| match e {
                TimingTableError::Io(io) => write_error(io),
                other => other,
            })?;
        }

        let mut stats = ExtractionStats::default();
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            let bytes_read = reader.read_until(b'\n', &mut buffer).map_err(|e| {
                TimingTableError::InputUnreadable {
                    path: input.to_path_buf(),
                    source: e,
                }
            })?;

            if bytes_read == 0 {
                break;
            }

            for piece in universal_lines(&buffer) {
                stats.lines_read += 1;
                let line = String::from_utf8_lossy(piece);

                match self.scanner.scan(&line) {
                    TokenMatch::Found(token) => {
                        tracing::trace!(line = stats.lines_read, %token, "timing value");
                        table.push(&token).map_err(write_error)?;
                    }
                    TokenMatch::NotFound => match self.policy {
                        MissingTokenPolicy::Skip => {
                            tracing::debug!(line = stats.lines_read, "no timing value, skipping");
                            stats.skipped_lines.push(stats.lines_read);
                        }
                        MissingTokenPolicy::Abort => {
                            return Err(TimingTableError::UnparseableLine {
                                line_number: stats.lines_read,
                                content: line.into_owned(),
                            });
                        }
                    },
                }
            }
        }

        table.close().map_err(write_error)?;
        stats.tokens_written = table.tokens_written();
        stats.rows_written = table.rows_written();
        stats.duration = start_time.elapsed();

        Ok((stats, table.into_inner()))
    }
}

/// Splits one non-empty `\n`-terminated chunk into lines, also breaking on a
/// lone `\r`. `\r\n` counts as a single terminator.
fn universal_lines(chunk: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let body = body.strip_suffix(b"\r").unwrap_or(body);
    body.split(|&b| b == b'\r')
}
