use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::extractor::{MissingTokenPolicy, RowLayout, ThreadRange};
use crate::scanner::PatternMode;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "timing-table")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract benchmark timings from a thread-sweep log into a CSV table")]
#[command(
    long_about = "timing-table scans a matrix-multiplication benchmark log line by line, \
                  takes the first decimal number on each line and writes the values \
                  into a comma-separated table (results.csv by default)."
)]
#[command(after_help = "EXAMPLES:\n  \
    timing-table 1 8 mmult.log\n  \
    timing-table 1 8 mmult.log --layout thread-sweep --header\n  \
    timing-table 1 16 mmult.log --strict --output sweep.csv\n  \
    timing-table 1 8 mmult.log --report run.json --output-format json")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// First thread count of the sweep
    #[arg(required_unless_present = "generate_config")]
    pub minthread: Option<u32>,

    /// Last thread count of the sweep
    #[arg(required_unless_present = "generate_config")]
    pub maxthread: Option<u32>,

    /// Benchmark log to scan
    #[arg(required_unless_present = "generate_config")]
    pub input: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long, help = "Output CSV file (default: results.csv)")]
    pub output: Option<PathBuf>,

    /// Row grouping
    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Write a threads_<n> header row (thread-sweep layout only)
    #[arg(long)]
    pub header: bool,

    /// Accept any character between the digit runs, not only '.'
    #[arg(long)]
    pub loose_pattern: bool,

    /// Abort on the first line without a timing value instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for status messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    /// One value per row
    PerValue,
    /// One row per matrix size across the thread sweep
    ThreadSweep,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl From<LayoutArg> for RowLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::PerValue => RowLayout::PerValue,
            LayoutArg::ThreadSweep => RowLayout::ThreadSweep,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        // flags only override the config file when set
        CliOverrides::new()
            .with_output(self.output.clone())
            .with_layout(self.layout.map(RowLayout::from))
            .with_header(self.header.then_some(true))
            .with_report(self.report.clone())
            .with_pattern(self.loose_pattern.then_some(PatternMode::Loose))
            .with_on_missing(self.strict.then_some(MissingTokenPolicy::Abort))
    }

    /// `None` only when `--generate-config` made the positionals optional.
    pub fn thread_range(&self) -> Option<ThreadRange> {
        match (self.minthread, self.maxthread) {
            (Some(min), Some(max)) => Some(ThreadRange::new(min, max)),
            _ => None,
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("timing-table").chain(args.iter().copied()))
    }

    #[test]
    fn test_positional_arguments() {
        let cli = parse(&["1", "8", "mmult.log"]).unwrap();
        assert_eq!(cli.thread_range(), Some(ThreadRange::new(1, 8)));
        assert_eq!(cli.input, Some(PathBuf::from("mmult.log")));
        assert!(!cli.strict);
    }

    #[test]
    fn test_non_integer_thread_count() {
        assert!(parse(&["one", "8", "mmult.log"]).is_err());
        assert!(parse(&["1", "8.5", "mmult.log"]).is_err());
        assert!(parse(&["-1", "8", "mmult.log"]).is_err());
    }

    #[test]
    fn test_missing_arguments() {
        assert!(parse(&["1", "8"]).is_err());
        assert!(parse(&["1"]).is_err());
    }

    #[test]
    fn test_generate_config_needs_no_positionals() {
        let cli = parse(&["--generate-config"]).unwrap();
        assert!(cli.generate_config);
        assert_eq!(cli.thread_range(), None);
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = parse(&[
            "2", "16", "mmult.log", "--layout", "thread-sweep", "--header", "--strict",
            "--loose-pattern", "-o", "sweep.csv",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.output.layout, RowLayout::ThreadSweep);
        assert!(config.output.header);
        assert_eq!(config.output.path, PathBuf::from("sweep.csv"));
        assert_eq!(config.extraction.pattern, PatternMode::Loose);
        assert_eq!(config.extraction.on_missing, MissingTokenPolicy::Abort);
    }

    #[test]
    fn test_unset_flags_leave_defaults() {
        let cli = parse(&["1", "8", "mmult.log"]).unwrap();
        let overrides = cli.create_cli_overrides();
        assert!(overrides.output.is_none());
        assert!(overrides.layout.is_none());
        assert!(overrides.header.is_none());
        assert!(overrides.pattern.is_none());
        assert!(overrides.on_missing.is_none());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(parse(&["1", "8", "mmult.log", "-q", "-v"]).is_err());

        let cli = parse(&["1", "8", "mmult.log", "-vv"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);

        let cli = parse(&["1", "8", "mmult.log", "-q"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_output_format_selects_mode() {
        let cli = parse(&["1", "8", "mmult.log", "--output-format", "plain"]).unwrap();
        assert_eq!(OutputMode::from(cli.output_format), OutputMode::Plain);

        let cli = parse(&["1", "8", "mmult.log"]).unwrap();
        assert_eq!(OutputMode::from(cli.output_format), OutputMode::Human);
    }
}
