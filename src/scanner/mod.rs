pub mod charcode;
pub mod lexer;
pub mod reader;
pub mod token;

use crate::error::ScanError;
use lexer::Scanner;
use reader::SourceReader;
use token::Token;

/// Where end-of-input errors (unterminated string or comment) are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPositions {
    /// At the first character of the literal or comment.
    #[default]
    Start,
    /// At the cursor position where end-of-input was hit.
    Legacy,
}

/// Length limits count characters. The CLI rejects 0, though a zero
/// identifier limit still makes progress one letter at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    pub max_ident_len: usize,
    pub max_string_len: usize,
    pub error_positions: ErrorPositions,
}

impl ScannerConfig {
    pub const DEFAULT_MAX_IDENT_LEN: usize = 15;
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_ident_len: Self::DEFAULT_MAX_IDENT_LEN,
            max_string_len: Self::DEFAULT_MAX_IDENT_LEN,
            error_positions: ErrorPositions::Start,
        }
    }
}

/// Scan a whole source text, up to and including the EOF token.
pub fn scan(source: &str, config: ScannerConfig) -> (Vec<Token>, Vec<ScanError>) {
    let mut scanner = Scanner::with_reporter(SourceReader::new(source), Vec::new(), config);
    let tokens: Vec<Token> = scanner.by_ref().collect();
    (tokens, scanner.into_reporter())
}

pub fn to_json(tokens: &[Token]) -> String {
    serde_json::to_string_pretty(tokens).expect("tokens should be serializable")
}
