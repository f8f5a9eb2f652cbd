use std::path::Path;

use crate::error::ReaderError;
use crate::scanner::token::Position;

/// Character cursor the scanner pulls from.
///
/// `current()` is `None` once the input is exhausted; `advance()` at that
/// point is a no-op. Lines are 1-based. The column is bumped on every advance
/// and reset to 0 when a newline is read, so the first character of a line
/// sits at column 1.
pub trait CharReader {
    fn current(&self) -> Option<char>;
    fn advance(&mut self);
    fn line(&self) -> usize;
    fn column(&self) -> usize;

    /// Byte offset of the current character, for diagnostics.
    fn offset(&self) -> usize {
        0
    }

    fn position(&self) -> Position {
        Position::new(self.line(), self.column(), self.offset())
    }
}

/// In-memory reader over a whole source text.
#[derive(Debug, Clone)]
pub struct SourceReader {
    source: String,
    offset: usize,
    current: Option<char>,
    line: usize,
    column: usize,
}

impl SourceReader {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let current = source.chars().next();
        let mut reader = Self {
            source,
            offset: 0,
            current,
            line: 1,
            column: 1,
        };
        if reader.current == Some('\n') {
            reader.line += 1;
            reader.column = 0;
        }
        reader
    }

    /// Read a whole source file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ReaderError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(source))
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl CharReader for SourceReader {
    fn current(&self) -> Option<char> {
        self.current
    }

    fn advance(&mut self) {
        let Some(c) = self.current else {
            return;
        };
        self.offset += c.len_utf8();
        self.current = self.source[self.offset..].chars().next();
        self.column += 1;
        if self.current == Some('\n') {
            self.line += 1;
            self.column = 0;
        }
    }

    fn line(&self) -> usize {
        self.line
    }

    fn column(&self) -> usize {
        self.column
    }

    fn offset(&self) -> usize {
        self.offset
    }
}
