use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimingTableError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to read input file {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No timing value on line {line_number}: {content:?}")]
    UnparseableLine { line_number: usize, content: String },

    #[error("Invalid thread range: minthread {min} is greater than maxthread {max}")]
    InvalidThreadRange { min: u32, max: u32 },

    #[error("Invalid token pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for TimingTableError {
    fn user_message(&self) -> String {
        match self {
            TimingTableError::InputNotFound { path } => {
                format!("Input log not found: {}", path.display())
            }
            TimingTableError::InputUnreadable { path, source } => {
                format!("Could not read {}: {}", path.display(), source)
            }
            TimingTableError::OutputWrite { path, source } => {
                format!("Could not write {}: {}", path.display(), source)
            }
            TimingTableError::UnparseableLine {
                line_number,
                content,
            } => {
                format!(
                    "Line {} has no timing value: {}",
                    line_number,
                    truncate(content, 60)
                )
            }
            TimingTableError::InvalidThreadRange { min, max } => {
                format!(
                    "Thread range {}..{} is empty (minthread > maxthread)",
                    min, max
                )
            }
            TimingTableError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            TimingTableError::InputNotFound { .. } => Some(
                "Check the path to the benchmark log; it is the third positional argument.".to_string()
            ),
            TimingTableError::OutputWrite { .. } => Some(
                "Ensure the output directory exists and is writable, or choose another path with --output.".to_string()
            ),
            TimingTableError::UnparseableLine { .. } => Some(
                "Remove --strict to skip lines without a timing value, or try --loose-pattern.".to_string()
            ),
            TimingTableError::InvalidThreadRange { .. } => Some(
                "Pass minthread before maxthread, e.g. `timing-table 1 8 run.log`.".to_string()
            ),
            TimingTableError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for TimingTableError {
    fn from(error: toml::de::Error) -> Self {
        TimingTableError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TimingTableError>;

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
