pub mod error;
pub mod scanner;
pub mod symtab;

// Re-export error types for convenience
pub use error::{CompileError, ScanError, SymbolError};
