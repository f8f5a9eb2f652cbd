use std::fmt;

use serde::Serialize;

/// Recursive type value. Equality is structural: arrays match when their
/// sizes match and their element types match recursively. `Clone` is a deep
/// copy. Values are acyclic by construction, so dropping one always ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Int,
    Char,
    Array { size: usize, element: Box<Type> },
}

impl Type {
    pub fn int() -> Self {
        Self::Int
    }

    pub fn char() -> Self {
        Self::Char
    }

    /// `size` must be positive; the element type moves into the array.
    pub fn array(size: usize, element: Type) -> Self {
        debug_assert!(size > 0, "array size must be positive");
        Self::Array {
            size,
            element: Box::new(element),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    pub fn array_size(&self) -> Option<usize> {
        match self {
            Self::Array { size, .. } => Some(*size),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<&Type> {
        match self {
            Self::Array { element, .. } => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "Int"),
            Self::Char => write!(f, "Char"),
            Self::Array { size, element } => write!(f, "Arr({size},{element})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstantValue {
    Int(i32),
    Char(char),
}

impl ConstantValue {
    pub fn ty(&self) -> Type {
        match self {
            Self::Int(_) => Type::Int,
            Self::Char(_) => Type::Char,
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "Int:{i}"),
            Self::Char(c) => write!(f, "Char:'{c}'"),
        }
    }
}
