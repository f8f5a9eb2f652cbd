use std::iter::FusedIterator;

use crate::error::{ErrorReporter, Flow, ScanError, ScanErrorKind};
use crate::scanner::charcode::CharCode;
use crate::scanner::reader::CharReader;
use crate::scanner::token::{Position, Token, TokenKind, keyword_kind};
use crate::scanner::{ErrorPositions, ScannerConfig};

/// Pull scanner over a character reader.
///
/// Every token is positioned at its first character. Lexical errors go to the
/// reporter and come back in-band as `TokenKind::Invalid`, so the caller can
/// keep asking for tokens. Once the reader is exhausted `next_token` keeps
/// returning EOF.
pub struct Scanner<R, E = Vec<ScanError>> {
    reader: R,
    reporter: E,
    config: ScannerConfig,
    aborted: bool,
    finished: bool,
}

impl<R: CharReader> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self::with_reporter(reader, Vec::new(), ScannerConfig::default())
    }

    pub fn errors(&self) -> &[ScanError] {
        &self.reporter
    }
}

impl<R: CharReader, E: ErrorReporter> Scanner<R, E> {
    pub fn with_reporter(reader: R, reporter: E, config: ScannerConfig) -> Self {
        Self {
            reader,
            reporter,
            config,
            aborted: false,
            finished: false,
        }
    }

    pub fn reporter(&self) -> &E {
        &self.reporter
    }

    pub fn into_reporter(self) -> E {
        self.reporter
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// True once the reporter asked to stop; every later call yields EOF.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    pub fn next_token(&mut self) -> Token {
        if self.aborted {
            return Token::new(TokenKind::Eof, self.reader.position());
        }

        let token = loop {
            let start = self.reader.position();
            let Some(c) = self.reader.current() else {
                break Token::new(TokenKind::Eof, start);
            };

            match CharCode::of(c) {
                CharCode::Space => self.skip_blank(),
                CharCode::Letter => break self.read_ident_keyword(start),
                CharCode::Digit => break self.read_number(start),
                CharCode::SingleQuote => break self.read_const_char(start),
                CharCode::DoubleQuote => break self.read_const_string(start),
                CharCode::Plus => break self.single(TokenKind::Plus, start),
                CharCode::Minus => break self.single(TokenKind::Minus, start),
                CharCode::Times => break self.single(TokenKind::Times, start),
                CharCode::Slash => break self.single(TokenKind::Slash, start),
                CharCode::Equal => break self.single(TokenKind::Equal, start),
                CharCode::Comma => break self.single(TokenKind::Comma, start),
                CharCode::Semicolon => break self.single(TokenKind::Semicolon, start),
                CharCode::RightParen => break self.single(TokenKind::RightParen, start),
                CharCode::Less => {
                    break self.pair(
                        CharCode::Equal,
                        TokenKind::LessEqual,
                        TokenKind::Less,
                        start,
                    );
                }
                CharCode::Greater => {
                    break self.pair(
                        CharCode::Equal,
                        TokenKind::GreaterEqual,
                        TokenKind::Greater,
                        start,
                    );
                }
                CharCode::Colon => {
                    break self.pair(CharCode::Equal, TokenKind::Assign, TokenKind::Colon, start);
                }
                CharCode::Period => {
                    break self.pair(
                        CharCode::RightParen,
                        TokenKind::RightSelector,
                        TokenKind::Period,
                        start,
                    );
                }
                CharCode::Exclaim => {
                    self.reader.advance();
                    if self.code() == Some(CharCode::Equal) {
                        self.reader.advance();
                        break Token::new(TokenKind::NotEqual, start);
                    }
                    self.error(ScanErrorKind::InvalidSymbol, start);
                    break Token::invalid(start);
                }
                CharCode::LeftParen => {
                    self.reader.advance();
                    match self.code() {
                        Some(CharCode::Period) => {
                            self.reader.advance();
                            break Token::new(TokenKind::LeftSelector, start);
                        }
                        Some(CharCode::Times) => {
                            if let Some(invalid) = self.skip_comment(start) {
                                break invalid;
                            }
                        }
                        _ => break Token::new(TokenKind::LeftParen, start),
                    }
                }
                CharCode::Invalid => {
                    self.error(ScanErrorKind::InvalidSymbol, start);
                    self.reader.advance();
                    break Token::invalid(start);
                }
            }
        };

        log::trace!("{token}");
        token
    }

    fn code(&self) -> Option<CharCode> {
        self.reader.current().map(CharCode::of)
    }

    fn error(&mut self, kind: ScanErrorKind, position: Position) {
        let error = ScanError::new(kind, position);
        log::warn!("{error}");
        if self.reporter.report(error) == Flow::Abort {
            self.aborted = true;
        }
    }

    /// Position for end-of-input errors, per the configured policy.
    fn eof_position(&self, start: Position) -> Position {
        match self.config.error_positions {
            ErrorPositions::Start => start,
            ErrorPositions::Legacy => self.reader.position(),
        }
    }

    fn skip_blank(&mut self) {
        while self.code() == Some(CharCode::Space) {
            self.reader.advance();
        }
    }

    /// Consume a comment whose `(` has been read and whose `*` is current.
    /// Returns the invalid token to emit when the input ends first.
    fn skip_comment(&mut self, start: Position) -> Option<Token> {
        self.reader.advance();
        loop {
            match self.code() {
                None => {
                    let position = self.eof_position(start);
                    self.error(ScanErrorKind::UnterminatedComment, position);
                    return Some(Token::invalid(position));
                }
                Some(CharCode::Times) => {
                    self.reader.advance();
                    if self.code() == Some(CharCode::RightParen) {
                        self.reader.advance();
                        return None;
                    }
                }
                Some(_) => self.reader.advance(),
            }
        }
    }

    fn single(&mut self, kind: TokenKind, start: Position) -> Token {
        self.reader.advance();
        Token::new(kind, start)
    }

    /// One-character lookahead: `long` when the next character is `next`.
    fn pair(
        &mut self,
        next: CharCode,
        long: TokenKind,
        short: TokenKind,
        start: Position,
    ) -> Token {
        self.reader.advance();
        if self.code() == Some(next) {
            self.reader.advance();
            Token::new(long, start)
        } else {
            Token::new(short, start)
        }
    }

    fn read_ident_keyword(&mut self, start: Position) -> Token {
        let mut text = String::new();
        while let Some(c) = self.reader.current() {
            if !CharCode::of(c).is_ident_part() {
                break;
            }
            if text.len() == self.config.max_ident_len {
                self.error(ScanErrorKind::IdentifierTooLong, start);
                // a zero limit must still consume the first letter
                if text.is_empty() {
                    self.reader.advance();
                }
                return Token::invalid(start);
            }
            text.push(c);
            self.reader.advance();
        }

        match keyword_kind(&text) {
            Some(kind) => Token::new(kind, start),
            None => Token::with_text(TokenKind::Identifier, start, text),
        }
    }

    fn read_number(&mut self, start: Position) -> Token {
        let mut text = String::new();
        self.take_digits(&mut text);

        if self.code() != Some(CharCode::Period) {
            return Token::with_text(TokenKind::IntegerLiteral, start, text);
        }

        text.push('.');
        self.reader.advance();
        if !self.take_digits(&mut text) {
            text.push('0');
        }
        Token::with_text(TokenKind::FloatLiteral, start, text)
    }

    /// Append a run of digits; false if there was none.
    fn take_digits(&mut self, text: &mut String) -> bool {
        let before = text.len();
        while let Some(c) = self.reader.current().filter(|c| c.is_ascii_digit()) {
            text.push(c);
            self.reader.advance();
        }
        text.len() > before
    }

    fn read_const_char(&mut self, start: Position) -> Token {
        self.reader.advance();
        let Some(c) = self.reader.current() else {
            self.error(ScanErrorKind::InvalidCharConstant, start);
            return Token::invalid(start);
        };

        self.reader.advance();
        if self.code() == Some(CharCode::SingleQuote) {
            self.reader.advance();
            Token::with_text(TokenKind::CharLiteral, start, c)
        } else {
            self.error(ScanErrorKind::InvalidCharConstant, start);
            Token::invalid(start)
        }
    }

    fn read_const_string(&mut self, start: Position) -> Token {
        self.reader.advance();
        let mut text = String::new();
        let mut len = 0;

        while let Some(mut c) = self.reader.current() {
            match CharCode::of(c) {
                CharCode::DoubleQuote => break,
                // `/` escapes the next character
                CharCode::Slash => {
                    self.reader.advance();
                    match self.reader.current() {
                        Some(escaped) => c = escaped,
                        None => break,
                    }
                }
                _ => {}
            }

            if len == self.config.max_string_len {
                self.error(ScanErrorKind::StringTooLong, start);
                return Token::invalid(start);
            }
            text.push(c);
            len += 1;
            self.reader.advance();
        }

        if self.code() == Some(CharCode::DoubleQuote) {
            self.reader.advance();
            Token::with_text(TokenKind::StringLiteral, start, text)
        } else {
            let position = self.eof_position(start);
            self.error(ScanErrorKind::UnterminatedString, position);
            Token::invalid(position)
        }
    }
}

impl<R: CharReader, E: ErrorReporter> Iterator for Scanner<R, E> {
    type Item = Token;

    /// Yields every token up to and including EOF, then `None`.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.is_eof();
        Some(token)
    }
}

impl<R: CharReader, E: ErrorReporter> FusedIterator for Scanner<R, E> {}
