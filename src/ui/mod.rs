pub mod logging;
pub mod output;

pub use logging::init_logging;
pub use output::{OutputFormatter, OutputMode};
