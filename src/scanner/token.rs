use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum TokenKind {
    #[strum(serialize = "TK_NONE")]
    Invalid,
    #[strum(serialize = "TK_IDENT")]
    Identifier,
    #[strum(serialize = "TK_NUMBER")]
    IntegerLiteral,
    #[strum(serialize = "TK_FLOAT")]
    FloatLiteral,
    #[strum(serialize = "TK_CHAR")]
    CharLiteral,
    #[strum(serialize = "TK_STRING")]
    StringLiteral,
    #[strum(serialize = "TK_EOF")]
    Eof,

    // Keywords
    #[strum(serialize = "KW_PROGRAM")]
    Program,
    #[strum(serialize = "KW_CONST")]
    Const,
    #[strum(serialize = "KW_TYPE")]
    Type,
    #[strum(serialize = "KW_VAR")]
    Var,
    #[strum(serialize = "KW_INTEGER")]
    Integer,
    #[strum(serialize = "KW_FLOAT")]
    Float,
    #[strum(serialize = "KW_CHAR")]
    Char,
    #[strum(serialize = "KW_ARRAY")]
    Array,
    #[strum(serialize = "KW_OF")]
    Of,
    #[strum(serialize = "KW_FUNCTION")]
    Function,
    #[strum(serialize = "KW_PROCEDURE")]
    Procedure,
    #[strum(serialize = "KW_BEGIN")]
    Begin,
    #[strum(serialize = "KW_END")]
    End,
    #[strum(serialize = "KW_CALL")]
    Call,
    #[strum(serialize = "KW_IF")]
    If,
    #[strum(serialize = "KW_THEN")]
    Then,
    #[strum(serialize = "KW_ELSE")]
    Else,
    #[strum(serialize = "KW_WHILE")]
    While,
    #[strum(serialize = "KW_DO")]
    Do,
    #[strum(serialize = "KW_FOR")]
    For,
    #[strum(serialize = "KW_TO")]
    To,

    // Symbols
    #[strum(serialize = "SB_SEMICOLON")]
    Semicolon,
    #[strum(serialize = "SB_COLON")]
    Colon,
    #[strum(serialize = "SB_PERIOD")]
    Period,
    #[strum(serialize = "SB_COMMA")]
    Comma,
    #[strum(serialize = "SB_ASSIGN")]
    Assign,
    #[strum(serialize = "SB_EQ")]
    Equal,
    #[strum(serialize = "SB_NEQ")]
    NotEqual,
    #[strum(serialize = "SB_LT")]
    Less,
    #[strum(serialize = "SB_LE")]
    LessEqual,
    #[strum(serialize = "SB_GT")]
    Greater,
    #[strum(serialize = "SB_GE")]
    GreaterEqual,
    #[strum(serialize = "SB_PLUS")]
    Plus,
    #[strum(serialize = "SB_MINUS")]
    Minus,
    #[strum(serialize = "SB_TIMES")]
    Times,
    #[strum(serialize = "SB_SLASH")]
    Slash,
    #[strum(serialize = "SB_LPAR")]
    LeftParen,
    #[strum(serialize = "SB_RPAR")]
    RightParen,
    #[strum(serialize = "SB_LSEL")]
    LeftSelector,
    #[strum(serialize = "SB_RSEL")]
    RightSelector,
}

impl TokenKind {
    /// True for the kinds whose token carries its source text.
    pub fn has_text(self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::IntegerLiteral
                | Self::FloatLiteral
                | Self::CharLiteral
                | Self::StringLiteral
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::Program
                | Self::Const
                | Self::Type
                | Self::Var
                | Self::Integer
                | Self::Float
                | Self::Char
                | Self::Array
                | Self::Of
                | Self::Function
                | Self::Procedure
                | Self::Begin
                | Self::End
                | Self::Call
                | Self::If
                | Self::Then
                | Self::Else
                | Self::While
                | Self::Do
                | Self::For
                | Self::To
        )
    }
}

/// Location of a character in the source: 1-based line, column as counted by
/// the reader, and the byte offset used for rendered diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.line, self.column)
    }
}

impl From<Position> for miette::SourceSpan {
    fn from(position: Position) -> Self {
        miette::SourceSpan::new(position.offset.into(), 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self {
            kind,
            position,
            text: None,
        }
    }

    pub fn with_text(kind: TokenKind, position: Position, text: impl Into<String>) -> Self {
        debug_assert!(kind.has_text(), "{kind} tokens carry no text");
        Self {
            kind,
            position,
            text: Some(text.into()),
        }
    }

    pub fn invalid(position: Position) -> Self {
        Self::new(TokenKind::Invalid, position)
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Token text, empty for kinds that carry none.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.position, self.kind)?;
        match (self.kind, &self.text) {
            (TokenKind::CharLiteral, Some(text)) => write!(f, "('{text}')"),
            (TokenKind::StringLiteral, Some(text)) => write!(f, "(\"{text}\")"),
            (_, Some(text)) => write!(f, "({text})"),
            (_, None) => Ok(()),
        }
    }
}

pub fn keyword_kind(ident: &str) -> Option<TokenKind> {
    match ident {
        "PROGRAM" => Some(TokenKind::Program),
        "CONST" => Some(TokenKind::Const),
        "TYPE" => Some(TokenKind::Type),
        "VAR" => Some(TokenKind::Var),
        "INTEGER" => Some(TokenKind::Integer),
        "FLOAT" => Some(TokenKind::Float),
        "CHAR" => Some(TokenKind::Char),
        "ARRAY" => Some(TokenKind::Array),
        "OF" => Some(TokenKind::Of),
        "FUNCTION" => Some(TokenKind::Function),
        "PROCEDURE" => Some(TokenKind::Procedure),
        "BEGIN" => Some(TokenKind::Begin),
        "END" => Some(TokenKind::End),
        "CALL" => Some(TokenKind::Call),
        "IF" => Some(TokenKind::If),
        "THEN" => Some(TokenKind::Then),
        "ELSE" => Some(TokenKind::Else),
        "WHILE" => Some(TokenKind::While),
        "DO" => Some(TokenKind::Do),
        "FOR" => Some(TokenKind::For),
        "TO" => Some(TokenKind::To),
        _ => None,
    }
}
