use tracing_subscriber::EnvFilter;

/// Maps `-v` count to a tracing level for this crate's target.
pub fn level_for(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }

    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Diagnostics go to stderr so they never interleave with status output.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::new(format!("timing_table={}", level_for(verbosity, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
