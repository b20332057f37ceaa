pub mod token_scanner;

pub use token_scanner::{PatternMode, TokenMatch, TokenScanner};
