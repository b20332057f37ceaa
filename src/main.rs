use clap::Parser;
use std::process;
use timing_table::{
    ui::init_logging, Cli, OutputFormatter, TimingTable, TimingTableError, UserFriendlyError,
};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    init_logging(cli.verbosity_level(), cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let table = match TimingTable::from_cli(&cli) {
        Ok(table) => table,
        Err(e) => {
            print_startup_error(&cli, &e);
            return exit_code_for(&e);
        }
    };

    let Some(input) = cli.input.as_deref() else {
        let e = TimingTableError::Config {
            message: "an input file is required".to_string(),
        };
        table.handle_error(&e);
        return exit_code_for(&e);
    };

    match table.run(input) {
        Ok(report) => {
            table.output_formatter().print_run_summary(&report);
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "extraction failed");
            table.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &TimingTableError) -> i32 {
    match error {
        TimingTableError::InputNotFound { .. } | TimingTableError::InputUnreadable { .. } => 3,
        TimingTableError::UnparseableLine { .. } => 4,
        TimingTableError::OutputWrite { .. } => 5,
        TimingTableError::Config { .. } | TimingTableError::InvalidThreadRange { .. } => 6,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "timing-table.toml".to_string());

    match TimingTable::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  timing-table <minthread> <maxthread> <log> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

/// Errors raised before a `TimingTable` exists still honour `--output-format`.
fn print_startup_error(cli: &Cli, error: &TimingTableError) {
    let formatter = OutputFormatter::new(cli.output_format.into(), cli.verbosity_level(), cli.quiet);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "timing-table",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 0);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[output]"));
    }

    #[test]
    fn test_exit_codes() {
        let missing = TimingTableError::InputNotFound {
            path: PathBuf::from("mmult.log"),
        };
        assert_eq!(exit_code_for(&missing), 3);

        let unparseable = TimingTableError::UnparseableLine {
            line_number: 1,
            content: "A =".to_string(),
        };
        assert_eq!(exit_code_for(&unparseable), 4);

        let range = TimingTableError::InvalidThreadRange { min: 2, max: 1 };
        assert_eq!(exit_code_for(&range), 6);

        let io = TimingTableError::Io(std::io::Error::other("boom"));
        assert_eq!(exit_code_for(&io), 1);
    }
}
