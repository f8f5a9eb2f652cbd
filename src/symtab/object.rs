use std::fmt;

use crate::symtab::types::{ConstantValue, Type};
use crate::symtab::{ObjectId, ScopeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ParamKind {
    #[strum(serialize = "value")]
    Value,
    #[strum(serialize = "reference")]
    Reference,
}

/// A declared program entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub kind: ObjectKind,
    /// Scope whose object list owns this object, once declared.
    pub(crate) declared_in: Option<ScopeId>,
}

/// Kind-specific attributes. `params` lists hold handles of parameters owned
/// by the routine's scope; they never own them.
#[derive(Debug, Clone, PartialEq, strum::IntoStaticStr)]
pub enum ObjectKind {
    Program {
        scope: ScopeId,
    },
    Constant {
        value: ConstantValue,
    },
    Type {
        actual_type: Type,
    },
    Variable {
        ty: Type,
        scope: Option<ScopeId>,
    },
    Function {
        params: Vec<ObjectId>,
        return_type: Option<Type>,
        scope: ScopeId,
    },
    Procedure {
        params: Vec<ObjectId>,
        scope: ScopeId,
    },
    Parameter {
        kind: ParamKind,
        function: ObjectId,
        ty: Type,
    },
}

impl Object {
    pub(crate) fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            declared_in: None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        (&self.kind).into()
    }

    pub fn declared_in(&self) -> Option<ScopeId> {
        self.declared_in
    }

    /// The nested scope of a program, function or procedure.
    pub fn scope(&self) -> Option<ScopeId> {
        match &self.kind {
            ObjectKind::Program { scope }
            | ObjectKind::Function { scope, .. }
            | ObjectKind::Procedure { scope, .. } => Some(*scope),
            _ => None,
        }
    }

    /// Parameter handles of a function or procedure.
    pub fn params(&self) -> Option<&[ObjectId]> {
        match &self.kind {
            ObjectKind::Function { params, .. } | ObjectKind::Procedure { params, .. } => {
                Some(params)
            }
            _ => None,
        }
    }

    pub(crate) fn params_mut(&mut self) -> Option<&mut Vec<ObjectId>> {
        match &mut self.kind {
            ObjectKind::Function { params, .. } | ObjectKind::Procedure { params, .. } => {
                Some(params)
            }
            _ => None,
        }
    }

    /// The declared type of a variable, parameter, type declaration or
    /// function result.
    pub fn ty(&self) -> Option<&Type> {
        match &self.kind {
            ObjectKind::Type { actual_type } => Some(actual_type),
            ObjectKind::Variable { ty, .. } | ObjectKind::Parameter { ty, .. } => Some(ty),
            ObjectKind::Function { return_type, .. } => return_type.as_ref(),
            _ => None,
        }
    }

    pub fn is_routine(&self) -> bool {
        matches!(
            self.kind,
            ObjectKind::Function { .. } | ObjectKind::Procedure { .. }
        )
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ObjectKind::Program { .. } => write!(f, "Program {}", self.name),
            ObjectKind::Constant { value } => write!(f, "Const {} = {value}", self.name),
            ObjectKind::Type { actual_type } => write!(f, "Type {} = {actual_type}", self.name),
            ObjectKind::Variable { ty, .. } => write!(f, "Var {} : {ty}", self.name),
            ObjectKind::Function { return_type, .. } => match return_type {
                Some(ty) => write!(f, "Function {} : {ty}", self.name),
                None => write!(f, "Function {}", self.name),
            },
            ObjectKind::Procedure { .. } => write!(f, "Procedure {}", self.name),
            ObjectKind::Parameter { kind, ty, .. } => match kind {
                ParamKind::Value => write!(f, "Param {} : {ty}", self.name),
                ParamKind::Reference => write!(f, "Param VAR {} : {ty}", self.name),
            },
        }
    }
}

/// One nesting level of declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    /// Object that introduced the scope.
    pub owner: ObjectId,
    /// Enclosing scope; `None` at the outermost level.
    pub outer: Option<ScopeId>,
    /// Owned objects, in declaration order.
    pub objects: Vec<ObjectId>,
}

impl Scope {
    pub(crate) fn new(owner: ObjectId, outer: Option<ScopeId>) -> Self {
        Self {
            owner,
            outer,
            objects: Vec::new(),
        }
    }
}
