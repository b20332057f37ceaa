pub mod report;
pub mod table_extractor;
pub mod table_writer;

pub use report::{ExtractionReport, SettingsSnapshot};
pub use table_extractor::{ExtractionStats, MissingTokenPolicy, TableExtractor};
pub use table_writer::{RowLayout, TableWriter, ThreadRange};
