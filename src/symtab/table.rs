use crate::error::SymbolError;
use crate::symtab::object::{Object, ObjectKind, ParamKind, Scope};
use crate::symtab::types::{ConstantValue, Type};
use crate::symtab::{ObjectId, ScopeId};

/// What `SymbolTable::teardown` released, and what was never reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeardownReport {
    pub freed_objects: usize,
    pub freed_scopes: usize,
    /// Objects created but never declared anywhere.
    pub leaked_objects: usize,
    pub leaked_scopes: usize,
}

/// The symbol table of one compilation unit.
///
/// Holds the program object, the global list of built-in routines, and the
/// cursor to the scope currently receiving declarations. Scope changes must
/// nest: every `enter_scope` is paired with one `exit_scope`.
#[derive(Debug)]
pub struct SymbolTable {
    objects: Vec<Option<Object>>,
    scopes: Vec<Option<Scope>>,
    program: Option<ObjectId>,
    globals: Vec<ObjectId>,
    current_scope: Option<ScopeId>,
    int_type: Type,
    char_type: Type,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A fresh table with the built-in routines installed.
    pub fn new() -> Self {
        let mut table = Self {
            objects: Vec::new(),
            scopes: Vec::new(),
            program: None,
            globals: Vec::new(),
            current_scope: None,
            int_type: Type::Int,
            char_type: Type::Char,
        };
        table.install_builtins();
        table
    }

    fn install_builtins(&mut self) {
        let readc = self.alloc_function("READC", Some(Type::Char));
        let readi = self.alloc_function("READI", Some(Type::Int));

        let writei = self.create_procedure("WRITEI");
        self.builtin_param(writei, "i", Type::Int);

        let writec = self.create_procedure("WRITEC");
        self.builtin_param(writec, "ch", Type::Char);

        let writeln = self.create_procedure("WRITELN");

        self.globals.extend([readc, readi, writei, writec, writeln]);
    }

    fn builtin_param(&mut self, routine: ObjectId, name: &str, ty: Type) {
        let param = self.create_parameter(name, ParamKind::Value, routine, ty);
        if let Some(scope) = self.object(routine).and_then(Object::scope) {
            if let Err(err) = self.declare_in(scope, param) {
                log::error!("built-in parameter '{name}': {err}");
            }
        }
    }

    // ============= Arena access =============

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0).and_then(Option::as_ref)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0).and_then(Option::as_ref)
    }

    fn scope_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn alloc_object(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(Some(object));
        id
    }

    fn alloc_scope(&mut self, owner: ObjectId, outer: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Some(Scope::new(owner, outer)));
        id
    }

    /// Handle the next allocated object will get.
    fn next_object_id(&self) -> ObjectId {
        ObjectId(self.objects.len())
    }

    pub fn live_objects(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }

    pub fn live_scopes(&self) -> usize {
        self.scopes.iter().filter(|s| s.is_some()).count()
    }

    // ============= Accessors =============

    pub fn program(&self) -> Option<ObjectId> {
        self.program
    }

    pub fn globals(&self) -> &[ObjectId] {
        &self.globals
    }

    pub fn current_scope(&self) -> Option<ScopeId> {
        self.current_scope
    }

    pub fn int_type(&self) -> &Type {
        &self.int_type
    }

    pub fn char_type(&self) -> &Type {
        &self.char_type
    }

    /// Parameter handles of a function or procedure; empty for anything else.
    pub fn params(&self, routine: ObjectId) -> &[ObjectId] {
        self.object(routine)
            .and_then(Object::params)
            .unwrap_or_default()
    }

    // ============= Object construction =============

    pub fn create_program(&mut self, name: &str) -> Result<ObjectId, SymbolError> {
        if let Some(existing) = self.program.and_then(|id| self.object(id)) {
            return Err(SymbolError::ProgramAlreadySet {
                existing: existing.name.clone(),
            });
        }
        let id = self.next_object_id();
        let scope = self.alloc_scope(id, None);
        let id = self.alloc_object(Object::new(name, ObjectKind::Program { scope }));
        self.program = Some(id);
        Ok(id)
    }

    pub fn create_constant(&mut self, name: &str, value: ConstantValue) -> ObjectId {
        self.alloc_object(Object::new(name, ObjectKind::Constant { value }))
    }

    pub fn create_type(&mut self, name: &str, actual_type: Type) -> ObjectId {
        self.alloc_object(Object::new(name, ObjectKind::Type { actual_type }))
    }

    /// The variable remembers the scope active when it is created.
    pub fn create_variable(&mut self, name: &str, ty: Type) -> ObjectId {
        let scope = self.current_scope;
        self.alloc_object(Object::new(name, ObjectKind::Variable { ty, scope }))
    }

    /// The function's scope nests inside the scope active when it is created.
    /// Its return type is set once known, with `set_return_type`.
    pub fn create_function(&mut self, name: &str) -> ObjectId {
        self.alloc_function(name, None)
    }

    fn alloc_function(&mut self, name: &str, return_type: Option<Type>) -> ObjectId {
        let id = self.next_object_id();
        let scope = self.alloc_scope(id, self.current_scope);
        self.alloc_object(Object::new(
            name,
            ObjectKind::Function {
                params: Vec::new(),
                return_type,
                scope,
            },
        ))
    }

    pub fn create_procedure(&mut self, name: &str) -> ObjectId {
        let id = self.next_object_id();
        let scope = self.alloc_scope(id, self.current_scope);
        self.alloc_object(Object::new(
            name,
            ObjectKind::Procedure {
                params: Vec::new(),
                scope,
            },
        ))
    }

    pub fn create_parameter(
        &mut self,
        name: &str,
        kind: ParamKind,
        function: ObjectId,
        ty: Type,
    ) -> ObjectId {
        self.alloc_object(Object::new(
            name,
            ObjectKind::Parameter { kind, function, ty },
        ))
    }

    pub fn set_return_type(&mut self, function: ObjectId, ty: Type) -> Result<(), SymbolError> {
        let object = self
            .object_mut(function)
            .ok_or(SymbolError::UnknownObject(function))?;
        match &mut object.kind {
            ObjectKind::Function { return_type, .. } => {
                *return_type = Some(ty);
                Ok(())
            }
            _ => Err(SymbolError::NotAFunction {
                name: object.name.clone(),
            }),
        }
    }

    // ============= Scopes and declarations =============

    pub fn enter_scope(&mut self, scope: ScopeId) {
        log::debug!("enter {scope}");
        self.current_scope = Some(scope);
    }

    /// Move the cursor to the enclosing scope.
    pub fn exit_scope(&mut self) -> Result<(), SymbolError> {
        let current = self.current_scope.ok_or(SymbolError::NoActiveScope)?;
        let scope = self
            .scope(current)
            .ok_or(SymbolError::UnknownScope(current))?;
        self.current_scope = scope.outer;
        log::debug!("exit {current}");
        Ok(())
    }

    /// Add an object to the current scope, which becomes its owner. A
    /// parameter is also referenced from the parameter list of the scope's
    /// owning function or procedure, which must be the routine it was created
    /// for. Names are not checked for uniqueness.
    pub fn declare(&mut self, id: ObjectId) -> Result<(), SymbolError> {
        let scope = self.current_scope.ok_or(SymbolError::NoActiveScope)?;
        self.declare_in(scope, id)
    }

    fn declare_in(&mut self, scope_id: ScopeId, id: ObjectId) -> Result<(), SymbolError> {
        let owner = self
            .scope(scope_id)
            .ok_or(SymbolError::UnknownScope(scope_id))?
            .owner;
        let object = self.object(id).ok_or(SymbolError::UnknownObject(id))?;
        let name = object.name.clone();
        if object.declared_in.is_some() {
            return Err(SymbolError::AlreadyDeclared { name });
        }

        if let ObjectKind::Parameter { function, .. } = object.kind {
            if self.object(owner).and_then(Object::params).is_none() {
                return Err(SymbolError::ParameterOutsideRoutine { name });
            }
            // the params list unlinked on free is the one of `function`
            if function != owner {
                let routine = self
                    .object(function)
                    .map_or_else(|| function.to_string(), |o| o.name.clone());
                return Err(SymbolError::ParameterOwnerMismatch { name, routine });
            }
            if let Some(params) = self.object_mut(owner).and_then(Object::params_mut) {
                params.push(id);
            }
        }

        if let Some(object) = self.object_mut(id) {
            object.declared_in = Some(scope_id);
        }
        if let Some(scope) = self.scope_mut(scope_id) {
            scope.objects.push(id);
        }
        log::trace!("declare '{name}' {id} in {scope_id}");
        Ok(())
    }

    // ============= Lookup =============

    /// First object in `list` named exactly `name`.
    pub fn lookup(&self, list: &[ObjectId], name: &str) -> Option<ObjectId> {
        list.iter()
            .copied()
            .find(|&id| self.object(id).is_some_and(|o| o.name == name))
    }

    pub fn lookup_in_scope(&self, scope: ScopeId, name: &str) -> Option<ObjectId> {
        self.scope(scope)
            .and_then(|scope| self.lookup(&scope.objects, name))
    }

    /// Resolve a name from the current scope outward, then among the
    /// built-in routines.
    pub fn resolve(&self, name: &str) -> Option<ObjectId> {
        let mut cursor = self.current_scope;
        while let Some(scope) = cursor.and_then(|id| self.scope(id)) {
            if let Some(found) = self.lookup(&scope.objects, name) {
                return Some(found);
            }
            cursor = scope.outer;
        }
        self.lookup(&self.globals, name)
    }

    // ============= Disposal =============

    /// Free an object and everything it owns. A routine's parameter list is
    /// only a set of handles, so its parameters are freed through the
    /// routine's scope, once. Freeing a stale handle is an error.
    pub fn free_object(&mut self, id: ObjectId) -> Result<(), SymbolError> {
        let object = self
            .objects
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(SymbolError::UnknownObject(id))?;
        log::trace!("free {} '{}' {id}", object.kind_name(), object.name);

        if let Some(scope) = object.declared_in.and_then(|s| self.scope_mut(s)) {
            scope.objects.retain(|&o| o != id);
        }
        self.globals.retain(|&o| o != id);
        if self.program == Some(id) {
            self.program = None;
        }

        match object.kind {
            ObjectKind::Program { scope }
            | ObjectKind::Function { scope, .. }
            | ObjectKind::Procedure { scope, .. } => self.free_scope(scope),
            ObjectKind::Parameter { function, .. } => {
                if let Some(params) = self.object_mut(function).and_then(Object::params_mut) {
                    params.retain(|&p| p != id);
                }
                Ok(())
            }
            ObjectKind::Constant { .. } | ObjectKind::Type { .. } | ObjectKind::Variable { .. } => {
                Ok(())
            }
        }
    }

    fn free_scope(&mut self, id: ScopeId) -> Result<(), SymbolError> {
        let scope = self
            .scopes
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(SymbolError::UnknownScope(id))?;
        if self.current_scope == Some(id) {
            self.current_scope = None;
        }
        for object in scope.objects {
            self.free_object(object)?;
        }
        Ok(())
    }

    /// Free the program and the built-in routines, ending the table's life.
    pub fn teardown(mut self) -> Result<TeardownReport, SymbolError> {
        let objects_before = self.live_objects();
        let scopes_before = self.live_scopes();

        if let Some(program) = self.program {
            self.free_object(program)?;
        }
        for id in std::mem::take(&mut self.globals) {
            self.free_object(id)?;
        }

        let report = TeardownReport {
            freed_objects: objects_before - self.live_objects(),
            freed_scopes: scopes_before - self.live_scopes(),
            leaked_objects: self.live_objects(),
            leaked_scopes: self.live_scopes(),
        };
        if report.leaked_objects > 0 {
            log::warn!(
                "{} object(s) were created but never declared",
                report.leaked_objects
            );
        }
        log::debug!("symbol table torn down: {report:?}");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(table: &SymbolTable, id: ObjectId) -> &str {
        &table.object(id).expect("live object").name
    }

    /// Program P with function F(n: Int) : Int, cursor left in F's scope.
    fn program_with_function() -> (SymbolTable, ObjectId, ObjectId, ObjectId) {
        let mut table = SymbolTable::new();
        let program = table.create_program("P").unwrap();
        let program_scope = table.object(program).unwrap().scope().unwrap();
        table.enter_scope(program_scope);

        let function = table.create_function("F");
        table.declare(function).unwrap();
        let function_scope = table.object(function).unwrap().scope().unwrap();
        table.enter_scope(function_scope);

        let param = table.create_parameter("n", ParamKind::Value, function, Type::Int);
        table.declare(param).unwrap();
        table.set_return_type(function, Type::Int).unwrap();
        (table, program, function, param)
    }

    #[test]
    fn builtins_are_installed() {
        let table = SymbolTable::new();
        let names: Vec<&str> = table
            .globals()
            .iter()
            .map(|&id| name_of(&table, id))
            .collect();
        assert_eq!(names, ["READC", "READI", "WRITEI", "WRITEC", "WRITELN"]);

        let readc = table.lookup(table.globals(), "READC").unwrap();
        assert_eq!(table.object(readc).unwrap().ty(), Some(&Type::Char));
        let readi = table.lookup(table.globals(), "READI").unwrap();
        assert_eq!(table.object(readi).unwrap().ty(), Some(&Type::Int));
        assert_eq!(table.int_type(), &Type::Int);
        assert_eq!(table.char_type(), &Type::Char);
    }

    #[test]
    fn builtin_parameters_are_owned_by_their_routine() {
        let table = SymbolTable::new();
        let writei = table.lookup(table.globals(), "WRITEI").unwrap();
        let params = table.params(writei);
        assert_eq!(params.len(), 1);
        let param = table.object(params[0]).unwrap();
        assert_eq!(param.to_string(), "Param i : Int");

        let scope = table.object(writei).unwrap().scope().unwrap();
        assert_eq!(table.scope(scope).unwrap().objects, params);
        assert!(table.params(table.lookup(table.globals(), "WRITELN").unwrap()).is_empty());
    }

    #[test]
    fn program_is_set_once() {
        let mut table = SymbolTable::new();
        let program = table.create_program("P").unwrap();
        assert_eq!(table.program(), Some(program));
        assert_eq!(
            table.create_program("Q"),
            Err(SymbolError::ProgramAlreadySet {
                existing: "P".to_string()
            })
        );
        let scope = table.object(program).unwrap().scope().unwrap();
        assert_eq!(table.scope(scope).unwrap().outer, None);
        assert_eq!(table.scope(scope).unwrap().owner, program);
    }

    #[test]
    fn declare_without_scope_fails() {
        let mut table = SymbolTable::new();
        let var = table.create_variable("x", Type::Int);
        assert_eq!(table.declare(var), Err(SymbolError::NoActiveScope));
    }

    #[test]
    fn exit_without_scope_fails() {
        let mut table = SymbolTable::new();
        assert_eq!(table.exit_scope(), Err(SymbolError::NoActiveScope));
    }

    #[test]
    fn exit_restores_enclosing_scope() {
        let (mut table, program, function, _) = program_with_function();
        let program_scope = table.object(program).unwrap().scope();
        let function_scope = table.object(function).unwrap().scope();
        assert_eq!(table.current_scope(), function_scope);
        table.exit_scope().unwrap();
        assert_eq!(table.current_scope(), program_scope);
        table.exit_scope().unwrap();
        assert_eq!(table.current_scope(), None);
    }

    #[test]
    fn parameter_lands_in_scope_and_param_list() {
        let (table, _, function, param) = program_with_function();
        let scope = table.object(function).unwrap().scope().unwrap();
        assert_eq!(table.scope(scope).unwrap().objects, vec![param]);
        assert_eq!(table.params(function), &[param]);
        assert_eq!(table.object(param).unwrap().declared_in(), Some(scope));
    }

    #[test]
    fn freeing_a_function_frees_its_parameter_once() {
        let (mut table, program, function, param) = program_with_function();
        let before = table.live_objects();
        table.free_object(function).unwrap();
        assert_eq!(table.live_objects(), before - 2);
        assert!(table.object(param).is_none());
        assert_eq!(table.free_object(param), Err(SymbolError::UnknownObject(param)));
        assert_eq!(
            table.free_object(function),
            Err(SymbolError::UnknownObject(function))
        );
        let program_scope = table.object(program).unwrap().scope().unwrap();
        assert!(table.scope(program_scope).unwrap().objects.is_empty());
    }

    #[test]
    fn freeing_a_parameter_drops_its_reference() {
        let (mut table, _, function, param) = program_with_function();
        table.free_object(param).unwrap();
        assert!(table.params(function).is_empty());
        let scope = table.object(function).unwrap().scope().unwrap();
        assert!(table.scope(scope).unwrap().objects.is_empty());
    }

    #[test]
    fn parameter_outside_routine_is_rejected() {
        let mut table = SymbolTable::new();
        let program = table.create_program("P").unwrap();
        let scope = table.object(program).unwrap().scope().unwrap();
        table.enter_scope(scope);
        let param = table.create_parameter("p", ParamKind::Reference, program, Type::Int);
        assert_eq!(
            table.declare(param),
            Err(SymbolError::ParameterOutsideRoutine {
                name: "p".to_string()
            })
        );
        assert!(table.scope(scope).unwrap().objects.is_empty());
    }

    #[test]
    fn parameter_of_another_routine_is_rejected() {
        let (mut table, _, function, param) = program_with_function();
        let other = table.create_procedure("G");
        let stray = table.create_parameter("x", ParamKind::Value, other, Type::Int);
        assert_eq!(
            table.declare(stray),
            Err(SymbolError::ParameterOwnerMismatch {
                name: "x".to_string(),
                routine: "G".to_string()
            })
        );
        assert_eq!(table.params(function), &[param]);
        assert!(table.params(other).is_empty());
        assert_eq!(table.object(stray).unwrap().declared_in(), None);

        table.free_object(stray).unwrap();
        assert_eq!(table.params(function), &[param]);
        assert!(table.params(function).iter().all(|&p| table.object(p).is_some()));
    }

    #[test]
    fn declaring_twice_is_rejected() {
        let (mut table, _, _, param) = program_with_function();
        assert_eq!(
            table.declare(param),
            Err(SymbolError::AlreadyDeclared {
                name: "n".to_string()
            })
        );
    }

    #[test]
    fn lookup_is_case_sensitive_and_returns_first_match() {
        let (mut table, _, function, param) = program_with_function();
        let duplicate = table.create_variable("n", Type::Char);
        table.declare(duplicate).unwrap();
        let scope = table.object(function).unwrap().scope().unwrap();
        assert_eq!(table.lookup_in_scope(scope, "n"), Some(param));
        assert_eq!(table.lookup_in_scope(scope, "N"), None);
    }

    #[test]
    fn resolve_walks_outward_then_globals() {
        let (mut table, _, function, param) = program_with_function();
        assert_eq!(table.resolve("n"), Some(param));
        assert_eq!(table.resolve("F"), Some(function));
        assert!(table.resolve("WRITELN").is_some());
        assert_eq!(table.resolve("missing"), None);

        table.exit_scope().unwrap();
        assert_eq!(table.resolve("n"), None);
    }

    #[test]
    fn variables_remember_their_scope() {
        let (mut table, _, function, _) = program_with_function();
        let var = table.create_variable("v", Type::array(3, Type::Int));
        let scope = table.object(function).unwrap().scope();
        match &table.object(var).unwrap().kind {
            ObjectKind::Variable { scope: recorded, .. } => assert_eq!(*recorded, scope),
            other => panic!("expected a variable, got {other:?}"),
        }
    }

    #[test]
    fn return_type_only_on_functions() {
        let mut table = SymbolTable::new();
        let procedure = table.create_procedure("P");
        assert_eq!(
            table.set_return_type(procedure, Type::Int),
            Err(SymbolError::NotAFunction {
                name: "P".to_string()
            })
        );
    }

    #[test]
    fn teardown_frees_everything_declared() {
        let (table, _, _, _) = program_with_function();
        let live = table.live_objects();
        let scopes = table.live_scopes();
        let report = table.teardown().unwrap();
        assert_eq!(report.freed_objects, live);
        assert_eq!(report.freed_scopes, scopes);
        assert_eq!(report.leaked_objects, 0);
        assert_eq!(report.leaked_scopes, 0);
    }

    #[test]
    fn teardown_reports_undeclared_objects() {
        let mut table = SymbolTable::new();
        table.create_constant("c", ConstantValue::Int(1));
        table.create_function("orphan");
        let report = table.teardown().unwrap();
        assert_eq!(report.leaked_objects, 2);
        assert_eq!(report.leaked_scopes, 1);
    }
}
