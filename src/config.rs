use crate::error::{Result, TimingTableError};
use crate::extractor::{MissingTokenPolicy, RowLayout, ThreadRange};
use crate::scanner::PatternMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_FILE: &str = "results.csv";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub pattern: PatternMode,
    pub on_missing: MissingTokenPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub layout: RowLayout,
    pub header: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            layout: RowLayout::PerValue,
            header: false,
            report: None,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TimingTableError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| TimingTableError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| TimingTableError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    /// Only an explicitly named file is read; there is no search path.
    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref output) = cli_args.output {
            self.output.path = output.clone();
        }

        if let Some(layout) = cli_args.layout {
            self.output.layout = layout;
        }

        if let Some(header) = cli_args.header {
            self.output.header = header;
        }

        if let Some(ref report) = cli_args.report {
            self.output.report = Some(report.clone());
        }

        if let Some(pattern) = cli_args.pattern {
            self.extraction.pattern = pattern;
        }

        if let Some(on_missing) = cli_args.on_missing {
            self.extraction.on_missing = on_missing;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| TimingTableError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| TimingTableError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self, range: &ThreadRange, input: &Path) -> Result<()> {
        if self.output.path.as_os_str().is_empty() {
            return Err(TimingTableError::Config {
                message: "Output path must not be empty".to_string(),
            });
        }

        if self.output.layout == RowLayout::ThreadSweep {
            range.validate()?;
        }

        if self.output.header && self.output.layout != RowLayout::ThreadSweep {
            return Err(TimingTableError::Config {
                message: "A header row requires the thread-sweep layout".to_string(),
            });
        }

        // creating the output would truncate the log before it is read
        if same_file(&self.output.path, input) {
            return Err(TimingTableError::Config {
                message: format!(
                    "Output path {} is the input file",
                    self.output.path.display()
                ),
            });
        }

        if let Some(ref report) = self.output.report {
            if same_file(report, input) || same_file(report, &self.output.path) {
                return Err(TimingTableError::Config {
                    message: format!(
                        "Report path {} collides with the input or output file",
                        report.display()
                    ),
                });
            }
        }

        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub layout: Option<RowLayout>,
    pub header: Option<bool>,
    pub report: Option<PathBuf>,
    pub pattern: Option<PatternMode>,
    pub on_missing: Option<MissingTokenPolicy>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_layout(mut self, layout: Option<RowLayout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_header(mut self, header: Option<bool>) -> Self {
        self.header = header;
        self
    }

    pub fn with_report(mut self, report: Option<PathBuf>) -> Self {
        self.report = report;
        self
    }

    pub fn with_pattern(mut self, pattern: Option<PatternMode>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_on_missing(mut self, on_missing: Option<MissingTokenPolicy>) -> Self {
        self.on_missing = on_missing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn range() -> ThreadRange {
        ThreadRange::new(1, 8)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.path, PathBuf::from("results.csv"));
        assert_eq!(config.output.layout, RowLayout::PerValue);
        assert_eq!(config.extraction.pattern, PatternMode::Strict);
        assert_eq!(config.extraction.on_missing, MissingTokenPolicy::Skip);
        assert!(!config.output.header);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate(&range(), Path::new("bench.log")).is_ok());

        config.output.header = true;
        assert!(config.validate(&range(), Path::new("bench.log")).is_err());

        config.output.layout = RowLayout::ThreadSweep;
        assert!(config.validate(&range(), Path::new("bench.log")).is_ok());

        let inverted = ThreadRange::new(8, 1);
        assert!(matches!(
            config.validate(&inverted, Path::new("bench.log")),
            Err(TimingTableError::InvalidThreadRange { .. })
        ));
    }

    #[test]
    fn test_output_must_not_be_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("bench.log");
        std::fs::write(&input, "1.0\n").unwrap();

        let mut config = Config::default();
        config.output.path = input.clone();
        assert!(config.validate(&range(), &input).is_err());
    }

    #[test]
    fn test_report_must_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("bench.log");
        let output = temp_dir.path().join("results.csv");
        std::fs::write(&input, "1.0\n").unwrap();
        std::fs::write(&output, "").unwrap();

        let mut config = Config::default();
        config.output.path = output.clone();

        config.output.report = Some(input.clone());
        match config.validate(&range(), &input) {
            Err(TimingTableError::Config { message }) => assert!(message.contains("Report path")),
            other => panic!("expected a config error, got {other:?}"),
        }

        config.output.report = Some(output.clone());
        assert!(matches!(
            config.validate(&range(), &input),
            Err(TimingTableError::Config { .. })
        ));

        // not yet created, so compared without canonicalizing
        config.output.report = Some(temp_dir.path().join("report.json"));
        assert!(config.validate(&range(), &input).is_ok());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.output.layout = RowLayout::ThreadSweep;
        config.extraction.on_missing = MissingTokenPolicy::Abort;
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.output.layout, RowLayout::ThreadSweep);
        assert_eq!(loaded_config.extraction.on_missing, MissingTokenPolicy::Abort);
    }

    #[test]
    fn test_partial_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[extraction]\npattern = \"loose\"").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.extraction.pattern, PatternMode::Loose);
        assert_eq!(config.output.path, PathBuf::from("results.csv"));
    }

    #[test]
    fn test_invalid_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[output]\nlayout = \"diagonal\"").unwrap();

        assert!(matches!(
            Config::load_from_file(temp_file.path()),
            Err(TimingTableError::Config { .. })
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_with_defaults(Some("definitely-not-here.toml"));
        assert!(result.is_err());
        assert!(Config::load_with_defaults(None::<&str>).is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_output(Some(PathBuf::from("sweep.csv")))
            .with_layout(Some(RowLayout::ThreadSweep))
            .with_pattern(Some(PatternMode::Loose));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.output.path, PathBuf::from("sweep.csv"));
        assert_eq!(config.output.layout, RowLayout::ThreadSweep);
        assert_eq!(config.extraction.pattern, PatternMode::Loose);
        assert_eq!(config.extraction.on_missing, MissingTokenPolicy::Skip);
    }
}
