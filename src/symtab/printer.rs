use crate::symtab::{ObjectId, ScopeId, SymbolTable};

const INDENT: &str = "  ";

/// Render the program tree followed by the built-in routines, one object per
/// line, nested declarations indented under their owner.
pub fn dump_table(table: &SymbolTable) -> String {
    let mut buf = String::new();
    if let Some(program) = table.program() {
        dump_object(&mut buf, table, program, 0);
    }
    buf.push_str("Built-ins\n");
    for &id in table.globals() {
        dump_object(&mut buf, table, id, 1);
    }
    buf
}

/// Render the objects of one scope, without its owner.
pub fn dump_scope(table: &SymbolTable, scope: ScopeId) -> String {
    let mut buf = String::new();
    dump_scope_into(&mut buf, table, scope, 0);
    buf
}

fn dump_object(buf: &mut String, table: &SymbolTable, id: ObjectId, depth: usize) {
    let Some(object) = table.object(id) else {
        return;
    };
    push_line(buf, depth, &object.to_string());
    if let Some(scope) = object.scope() {
        dump_scope_into(buf, table, scope, depth + 1);
    }
}

fn dump_scope_into(buf: &mut String, table: &SymbolTable, scope: ScopeId, depth: usize) {
    let Some(scope) = table.scope(scope) else {
        return;
    };
    for &id in &scope.objects {
        dump_object(buf, table, id, depth);
    }
}

fn push_line(buf: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        buf.push_str(INDENT);
    }
    buf.push_str(line);
    buf.push('\n');
}
