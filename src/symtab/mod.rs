//! Scope-structured registry of declared program entities.
//!
//! Objects and scopes live in arenas owned by [`SymbolTable`] and are
//! addressed by copyable handles. A scope's object list is the single owner
//! of each declared object; a routine's parameter list only repeats the
//! handles, so disposal visits every object exactly once.

pub mod object;
pub mod printer;
pub mod table;
pub mod types;

use std::fmt;

pub use object::{Object, ObjectKind, ParamKind, Scope};
pub use table::{SymbolTable, TeardownReport};
pub use types::{ConstantValue, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}
