pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, LayoutArg, OutputFormat};
pub use config::{CliOverrides, Config, ExtractionConfig, OutputConfig, DEFAULT_OUTPUT_FILE};
pub use error::{Result, TimingTableError, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    ExtractionReport, ExtractionStats, MissingTokenPolicy, RowLayout, SettingsSnapshot,
    TableExtractor, TableWriter, ThreadRange,
};
pub use scanner::{PatternMode, TokenMatch, TokenScanner};
pub use ui::{OutputFormatter, OutputMode};

use std::path::Path;

/// Main library interface: one extraction run over one benchmark log.
pub struct TimingTable {
    config: Config,
    range: ThreadRange,
    output_formatter: OutputFormatter,
}

impl TimingTable {
    pub fn new(
        config: Config,
        range: ThreadRange,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
    ) -> Self {
        Self {
            config,
            range,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let range = cli_args.thread_range().ok_or_else(|| TimingTableError::Config {
            message: "minthread and maxthread are required".to_string(),
        })?;

        Ok(Self::new(
            config,
            range,
            cli_args.output_format.into(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Scans `input` and writes the CSV table to the configured output path.
    pub fn run(&self, input: &Path) -> Result<ExtractionReport> {
        self.config.validate(&self.range, input)?;

        let output = &self.config.output.path;
        self.output_formatter.start_operation(&format!(
            "Extracting timings from {}",
            input.display()
        ));
        self.output_formatter.debug(&format!(
            "threads {}, layout {}, pattern {}, on missing value: {}",
            self.range,
            self.config.output.layout,
            self.config.extraction.pattern,
            self.config.extraction.on_missing
        ));

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            range = %self.range,
            layout = %self.config.output.layout,
            "starting extraction"
        );

        let scanner = TokenScanner::new(self.config.extraction.pattern)?;
        let pattern = scanner.mode();
        let extractor = TableExtractor::new(scanner, self.range)
            .with_layout(self.config.output.layout)
            .with_policy(self.config.extraction.on_missing)
            .with_header(self.config.output.header);

        let stats = extractor.extract_file(input, output)?;

        tracing::info!(
            lines = stats.lines_read,
            values = stats.tokens_written,
            skipped = stats.skipped(),
            "extraction finished"
        );

        let report = ExtractionReport::new(input, output, self.range, self.settings_snapshot(pattern), stats);

        if let Some(ref report_path) = self.config.output.report {
            report.save_to_file(report_path)?;
            self.output_formatter
                .info(&format!("Wrote run report to {}", report_path.display()));
        }

        if report.has_skipped_lines() {
            self.output_formatter.warning(&format!(
                "Skipped {} line(s) without a timing value",
                report.stats.skipped()
            ));
        }

        if report.stats.tokens_written == 0 {
            self.output_formatter
                .warning("No timing values found; the output table is empty");
        }

        self.output_formatter
            .success(&format!("Wrote {}", output.display()));

        Ok(report)
    }

    fn settings_snapshot(&self, pattern: PatternMode) -> SettingsSnapshot {
        SettingsSnapshot {
            layout: self.config.output.layout,
            pattern,
            on_missing: self.config.extraction.on_missing,
            header: self.config.output.header,
        }
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &TimingTableError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
