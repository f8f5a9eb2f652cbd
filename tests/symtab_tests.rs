use kpl_front::SymbolError;
use kpl_front::symtab::{ConstantValue, ObjectId, ObjectKind, ParamKind, SymbolTable, Type};

/// Declarations of fixtures/example.kpl, made the way a parser would.
struct Example {
    table: SymbolTable,
    var_n: ObjectId,
    function: ObjectId,
    param_n: ObjectId,
}

fn declare_example() -> Result<Example, SymbolError> {
    let mut table = SymbolTable::new();
    let program = table.create_program("EXAMPLE")?;
    let program_scope = table.object(program).and_then(|o| o.scope()).unwrap();
    table.enter_scope(program_scope);

    let max = table.create_constant("MAX", ConstantValue::Int(10));
    table.declare(max)?;
    let nl = table.create_constant("NL", ConstantValue::Char('n'));
    table.declare(nl)?;

    let vector = Type::array(10, Type::int());
    let vector_decl = table.create_type("VECTOR", vector.clone());
    table.declare(vector_decl)?;

    let var_n = table.create_variable("N", Type::int());
    table.declare(var_n)?;
    let var_v = table.create_variable("V", vector);
    table.declare(var_v)?;

    let function = table.create_function("F");
    table.declare(function)?;
    let function_scope = table.object(function).and_then(|o| o.scope()).unwrap();
    table.enter_scope(function_scope);
    let param_n = table.create_parameter("N", ParamKind::Value, function, Type::int());
    table.declare(param_n)?;
    table.set_return_type(function, Type::int())?;

    Ok(Example {
        table,
        var_n,
        function,
        param_n,
    })
}

#[test]
fn parameter_shadows_outer_variable() {
    let mut example = declare_example().expect("declarations should succeed");
    let table = &mut example.table;
    assert_eq!(table.resolve("N"), Some(example.param_n));
    assert_eq!(table.resolve("F"), Some(example.function));
    assert_eq!(
        table.resolve("MAX").map(|id| table.object(id).unwrap().name.as_str()),
        Some("MAX")
    );

    table.exit_scope().unwrap();
    assert_eq!(table.resolve("N"), Some(example.var_n));
    assert_eq!(table.resolve("n"), None);
    assert!(table.resolve("WRITEI").is_some());
}

#[test]
fn function_signature_references_its_parameter() {
    let example = declare_example().unwrap();
    let table = &example.table;
    assert_eq!(table.params(example.function), &[example.param_n]);

    let param = table.object(example.param_n).unwrap();
    match &param.kind {
        ObjectKind::Parameter { kind, function, ty } => {
            assert_eq!(*kind, ParamKind::Value);
            assert_eq!(*function, example.function);
            assert_eq!(ty, table.int_type());
        }
        other => panic!("expected a parameter, got {other:?}"),
    }
}

#[test]
fn declared_types_compare_structurally() {
    let example = declare_example().unwrap();
    let table = &example.table;
    let program_scope = table.object(table.program().unwrap()).unwrap().scope().unwrap();
    let vector = table.lookup_in_scope(program_scope, "VECTOR").unwrap();
    let v = table.lookup_in_scope(program_scope, "V").unwrap();
    let vector_ty = table.object(vector).unwrap().ty().unwrap();
    let v_ty = table.object(v).unwrap().ty().unwrap();
    assert_eq!(vector_ty, v_ty);
    assert_ne!(vector_ty, &Type::array(11, Type::int()));
}

#[test]
fn teardown_frees_every_object_exactly_once() {
    let example = declare_example().unwrap();
    let live = example.table.live_objects();
    let scopes = example.table.live_scopes();
    let report = example.table.teardown().expect("teardown should succeed");
    assert_eq!(report.freed_objects, live);
    assert_eq!(report.freed_scopes, scopes);
    assert_eq!(report.leaked_objects, 0);
    assert_eq!(report.leaked_scopes, 0);
}

#[test]
fn parameter_in_program_scope_is_a_structural_error() {
    let mut example = declare_example().unwrap();
    let table = &mut example.table;
    table.exit_scope().unwrap();
    let stray = table.create_parameter("X", ParamKind::Reference, example.function, Type::char());
    assert!(matches!(
        table.declare(stray),
        Err(SymbolError::ParameterOutsideRoutine { .. })
    ));
    assert_eq!(table.params(example.function).len(), 1);
}

#[test]
fn nested_procedure_scope_chain() {
    let mut example = declare_example().unwrap();
    let table = &mut example.table;
    let function_scope = table.current_scope();

    let inner = table.create_procedure("INNER");
    table.declare(inner).unwrap();
    let inner_scope = table.object(inner).unwrap().scope().unwrap();
    assert_eq!(table.scope(inner_scope).unwrap().outer, function_scope);

    table.enter_scope(inner_scope);
    assert_eq!(table.resolve("N"), Some(example.param_n));
    table.exit_scope().unwrap();
    assert_eq!(table.current_scope(), function_scope);
}
