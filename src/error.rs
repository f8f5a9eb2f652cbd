use std::path::PathBuf;

use miette::{Diagnostic, SourceSpan};
use serde::Serialize;
use thiserror::Error;

use crate::scanner::token::Position;
use crate::symtab::{ObjectId, ScopeId};

// ============= Lexical errors =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum ScanErrorKind {
    #[strum(serialize = "identifier too long")]
    IdentifierTooLong,
    #[strum(serialize = "string constant too long")]
    StringTooLong,
    #[strum(serialize = "invalid const char")]
    InvalidCharConstant,
    #[strum(serialize = "end of string not found")]
    UnterminatedString,
    #[strum(serialize = "end of comment not found")]
    UnterminatedComment,
    #[strum(serialize = "invalid symbol")]
    InvalidSymbol,
}

/// A lexical error as handed to the error reporter.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{position}: {kind}")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub position: Position,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// Attach source code for fancy miette diagnostics
    pub fn into_report(self, name: impl Into<String>, source: impl Into<String>) -> CompileError {
        CompileError::scan(self).with_source_code(name, source)
    }
}

/// Whether the reporter wants scanning to go on after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

/// Receives every lexical error the scanner detects.
pub trait ErrorReporter {
    fn report(&mut self, error: ScanError) -> Flow;
}

impl ErrorReporter for Vec<ScanError> {
    fn report(&mut self, error: ScanError) -> Flow {
        self.push(error);
        Flow::Continue
    }
}

/// Records the first error and asks the scanner to stop.
#[derive(Debug, Default)]
pub struct FailFast {
    pub error: Option<ScanError>,
}

impl ErrorReporter for FailFast {
    fn report(&mut self, error: ScanError) -> Flow {
        self.error.get_or_insert(error);
        Flow::Abort
    }
}

// ============= Symbol table errors =============

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("no active scope")]
    NoActiveScope,

    #[error("parameter '{name}' declared outside a function or procedure")]
    ParameterOutsideRoutine { name: String },

    #[error("parameter '{name}' belongs to '{routine}', not to the scope's owner")]
    ParameterOwnerMismatch { name: String, routine: String },

    #[error("'{name}' is already declared")]
    AlreadyDeclared { name: String },

    #[error("program object already set to '{existing}'")]
    ProgramAlreadySet { existing: String },

    #[error("object {0} does not exist or was already freed")]
    UnknownObject(ObjectId),

    #[error("scope {0} does not exist or was already freed")]
    UnknownScope(ScopeId),

    #[error("'{name}' is not a function")]
    NotAFunction { name: String },
}

// ============= Reader errors =============

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("can't read input file '{path}'")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============= Rendered diagnostics =============

#[derive(Error, Debug, Diagnostic)]
pub enum CompileError {
    #[error("scan error: {message}")]
    #[diagnostic(code(kpl::scan))]
    Scan {
        message: String,
        #[label("here")]
        span: SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("symbol table error: {0}")]
    #[diagnostic(code(kpl::symtab))]
    Symbol(#[from] SymbolError),
}

impl CompileError {
    pub fn scan(error: ScanError) -> Self {
        Self::Scan {
            message: error.to_string(),
            span: error.position.into(),
            src: miette::NamedSource::new("input", String::new()),
        }
    }

    /// Attach source code for fancy miette diagnostics
    pub fn with_source_code(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        match self {
            Self::Scan { message, span, .. } => Self::Scan {
                message,
                span,
                src: miette::NamedSource::new(name.into(), source.into()),
            },
            other => other,
        }
    }
}

// ============= Tests =============
