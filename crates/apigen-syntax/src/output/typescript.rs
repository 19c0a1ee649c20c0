//! TypeScript writer for the program IR.
//!
//! Emits a [`Program`] as TypeScript source. Output is a pure function of the
//! IR: two-space indentation, double-quoted strings, one blank line between
//! top-level declarations.

use crate::ir::*;
use crate::traits::Writer;

/// Static instance of the TypeScript writer.
pub static TYPESCRIPT_WRITER: TypeScriptWriterImpl = TypeScriptWriterImpl;

/// TypeScript writer implementing the Writer trait.
pub struct TypeScriptWriterImpl;

impl Writer for TypeScriptWriterImpl {
    fn language(&self) -> &'static str {
        "typescript"
    }

    fn extension(&self) -> &'static str {
        "ts"
    }

    fn write(&self, program: &Program) -> String {
        TypeScriptWriter::emit(program)
    }
}

/// Emits IR as TypeScript source code.
pub struct TypeScriptWriter {
    output: String,
    indent: usize,
}

impl TypeScriptWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Emit a program to TypeScript source.
    pub fn emit(program: &Program) -> String {
        let mut writer = Self::new();
        writer.write_program(program);
        writer.output
    }

    /// Emit a single type annotation.
    pub fn emit_type(ty: &TsType) -> String {
        let mut writer = Self::new();
        writer.write_type(ty);
        writer.output
    }

    /// Emit a single expression.
    pub fn emit_expr(expr: &Expr) -> String {
        let mut writer = Self::new();
        writer.write_expr(expr);
        writer.output
    }

    fn write_program(&mut self, program: &Program) {
        for import in &program.imports {
            self.write_import(import);
        }
        if !program.imports.is_empty() && !program.body.is_empty() {
            self.output.push('\n');
        }
        for (i, stmt) in program.body.iter().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            self.write_stmt(stmt);
            self.output.push('\n');
        }
    }

    fn write_import(&mut self, import: &Import) {
        let source = escape_string(&import.source);
        let mut named = Vec::new();
        for specifier in &import.specifiers {
            match specifier {
                ImportSpecifier::Namespace { name } => {
                    self.output
                        .push_str(&format!("import * as {} from \"{}\";\n", name, source));
                }
                ImportSpecifier::Named { name, type_only } => {
                    if *type_only {
                        named.push(format!("type {}", name));
                    } else {
                        named.push(name.clone());
                    }
                }
            }
        }
        if !named.is_empty() {
            self.output.push_str(&format!(
                "import {{ {} }} from \"{}\";\n",
                named.join(", "),
                source
            ));
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    fn write_stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::Expr(expr) => {
                self.write_expr(expr);
                self.output.push(';');
            }

            Stmt::Let {
                name,
                ty,
                init,
                mutable,
                export,
            } => {
                if *export {
                    self.output.push_str("export ");
                }
                self.output.push_str(if *mutable { "let " } else { "const " });
                self.output.push_str(name);
                if let Some(ty) = ty {
                    self.output.push_str(": ");
                    self.write_type(ty);
                }
                if let Some(init) = init {
                    self.output.push_str(" = ");
                    self.write_expr(init);
                }
                self.output.push(';');
            }

            Stmt::TypeAlias { name, ty, export } => {
                if *export {
                    self.output.push_str("export ");
                }
                self.output.push_str("type ");
                self.output.push_str(name);
                self.output.push_str(" = ");
                self.write_type(ty);
                self.output.push(';');
            }

            Stmt::Block(stmts) => self.write_block(stmts),

            Stmt::If { test, consequent } => {
                self.output.push_str("if (");
                match test {
                    Expr::Binary { left, op, right } => {
                        self.write_operand(left);
                        self.output.push(' ');
                        self.write_binary_op(*op);
                        self.output.push(' ');
                        self.write_operand(right);
                    }
                    other => self.write_expr(other),
                }
                self.output.push_str(") ");
                self.write_block_stmt(consequent);
            }

            Stmt::ForIn {
                variable,
                iterable,
                body,
            } => {
                self.output.push_str("for (const ");
                self.output.push_str(variable);
                self.output.push_str(" of ");
                self.write_expr(iterable);
                self.output.push_str(") ");
                self.write_block_stmt(body);
            }

            Stmt::Return(expr) => {
                self.output.push_str("return");
                if let Some(e) = expr {
                    self.output.push(' ');
                    self.write_expr(e);
                }
                self.output.push(';');
            }

            Stmt::Throw(expr) => {
                self.output.push_str("throw ");
                self.write_expr(expr);
                self.output.push(';');
            }

            Stmt::TryCatch {
                body,
                catch_param,
                catch_ty,
                catch_body,
            } => {
                self.output.push_str("try ");
                self.write_block_stmt(body);
                self.output.push_str(" catch");
                if let Some(param) = catch_param {
                    self.output.push_str(" (");
                    self.output.push_str(param);
                    if let Some(ty) = catch_ty {
                        self.output.push_str(": ");
                        self.write_type(ty);
                    }
                    self.output.push(')');
                }
                self.output.push(' ');
                self.write_block_stmt(catch_body);
            }

            Stmt::Class(class) => self.write_class(class),
        }
    }

    fn write_block(&mut self, stmts: &[Stmt]) {
        if stmts.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{\n");
        self.indent += 1;
        for s in stmts {
            self.write_stmt(s);
            self.output.push('\n');
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
    }

    fn write_block_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(stmts) => self.write_block(stmts),
            other => self.write_block(std::slice::from_ref(other)),
        }
    }

    fn write_class(&mut self, class: &ClassDecl) {
        if class.export {
            self.output.push_str("export ");
        }
        self.output.push_str("class ");
        self.output.push_str(&class.name);
        if class.members.is_empty() {
            self.output.push_str(" {}");
            return;
        }
        self.output.push_str(" {\n");
        self.indent += 1;
        for (i, member) in class.members.iter().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            self.write_class_member(member);
            self.output.push('\n');
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
    }

    fn write_class_member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Field { name, ty } => {
                self.write_indent();
                self.output.push_str(name);
                if let Some(ty) = ty {
                    self.output.push_str(": ");
                    self.write_type(ty);
                }
                self.output.push(';');
            }
            ClassMember::Constructor { params, body } => {
                self.write_indent();
                self.output.push_str("constructor");
                self.write_params(params);
                self.output.push(' ');
                self.write_block(body);
            }
            ClassMember::Method {
                name,
                params,
                body,
                is_async,
                comment,
            } => {
                if let Some(comment) = comment {
                    self.write_doc_comment(comment);
                }
                self.write_indent();
                if *is_async {
                    self.output.push_str("async ");
                }
                self.output.push_str(name);
                self.write_params(params);
                self.output.push(' ');
                self.write_block(body);
            }
        }
    }

    /// Writes `/** ... */` at the current indent, followed by a newline.
    fn write_doc_comment(&mut self, text: &str) {
        let text = text.replace("*/", "*\\/");
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() <= 1 {
            self.write_indent();
            self.output.push_str("/** ");
            self.output.push_str(lines.first().copied().unwrap_or_default().trim());
            self.output.push_str(" */\n");
            return;
        }
        self.write_indent();
        self.output.push_str("/**\n");
        for line in lines {
            self.write_indent();
            let line = line.trim_end();
            if line.is_empty() {
                self.output.push_str(" *\n");
            } else {
                self.output.push_str(" * ");
                self.output.push_str(line);
                self.output.push('\n');
            }
        }
        self.write_indent();
        self.output.push_str(" */\n");
    }

    fn write_params(&mut self, params: &[Param]) {
        self.output.push('(');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.output.push_str(&param.name);
            if let Some(ty) = &param.ty {
                self.output.push_str(": ");
                self.write_type(ty);
            }
        }
        self.output.push(')');
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => self.write_literal(lit),

            Expr::Regex(pattern) => {
                self.output.push('/');
                self.output.push_str(&escape_regex(pattern));
                self.output.push('/');
            }

            Expr::Ident(name) => {
                self.output.push_str(name);
            }

            Expr::This => self.output.push_str("this"),

            Expr::Binary { left, op, right } => {
                self.output.push('(');
                self.write_operand(left);
                self.output.push(' ');
                self.write_binary_op(*op);
                self.output.push(' ');
                self.write_operand(right);
                self.output.push(')');
            }

            Expr::Call {
                callee,
                args,
                type_args,
            } => {
                self.write_operand(callee);
                if !type_args.is_empty() {
                    self.output.push('<');
                    self.write_type_list(type_args, ", ");
                    self.output.push('>');
                }
                self.write_args(args);
            }

            Expr::New { callee, args } => {
                self.output.push_str("new ");
                self.write_operand(callee);
                self.write_args(args);
            }

            Expr::Member {
                object,
                property,
                computed,
                optional,
            } => {
                self.write_operand(object);
                match property.as_ref() {
                    // `#name` is a private class member
                    Expr::Literal(Literal::String(s))
                        if !*computed && is_valid_identifier(s.strip_prefix('#').unwrap_or(s)) =>
                    {
                        self.output.push_str(if *optional { "?." } else { "." });
                        self.output.push_str(s);
                    }
                    _ => {
                        if *optional {
                            self.output.push_str("?.");
                        }
                        self.output.push('[');
                        self.write_expr(property);
                        self.output.push(']');
                    }
                }
            }

            Expr::Array(items) => {
                self.output.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_expr(item);
                }
                self.output.push(']');
            }

            Expr::Object(properties) => self.write_object(properties),

            Expr::Spread(inner) => {
                self.output.push_str("...");
                self.write_operand(inner);
            }

            Expr::Arrow(arrow) => self.write_arrow(arrow),

            Expr::Await(inner) => {
                self.output.push_str("await ");
                self.write_operand(inner);
            }

            Expr::As { expr, ty } => {
                self.write_operand(expr);
                self.output.push_str(" as ");
                self.write_type(ty);
            }

            Expr::Template { quasis, exprs } => {
                self.output.push('`');
                for (i, quasi) in quasis.iter().enumerate() {
                    self.output.push_str(&escape_template(quasi));
                    if let Some(e) = exprs.get(i) {
                        self.output.push_str("${");
                        self.write_expr(e);
                        self.output.push('}');
                    }
                }
                self.output.push('`');
            }

            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.write_operand(test);
                self.output.push_str(" ? ");
                self.write_expr(consequent);
                self.output.push_str(" : ");
                self.write_expr(alternate);
            }

            Expr::Assign { target, value } => {
                self.write_expr(target);
                self.output.push_str(" = ");
                self.write_expr(value);
            }
        }
    }

    /// Writes an expression in operand position, parenthesizing the forms
    /// that would otherwise bind looser than their context.
    fn write_operand(&mut self, expr: &Expr) {
        let needs_parens = matches!(
            expr,
            Expr::Arrow(_)
                | Expr::Conditional { .. }
                | Expr::Assign { .. }
                | Expr::As { .. }
                | Expr::Await(_)
                | Expr::Object(_)
        );
        if needs_parens {
            self.output.push('(');
            self.write_expr(expr);
            self.output.push(')');
        } else {
            self.write_expr(expr);
        }
    }

    fn write_args(&mut self, args: &[Expr]) {
        self.output.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_expr(arg);
        }
        self.output.push(')');
    }

    fn write_object(&mut self, properties: &[Property]) {
        if properties.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{\n");
        self.indent += 1;
        for property in properties {
            if let Some(comment) = &property.comment {
                self.write_doc_comment(comment);
            }
            self.write_indent();
            self.write_key(&property.key);
            self.output.push_str(": ");
            self.write_expr(&property.value);
            self.output.push_str(",\n");
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
    }

    fn write_key(&mut self, key: &str) {
        if is_valid_identifier(key) {
            self.output.push_str(key);
        } else {
            self.output.push('"');
            self.output.push_str(&escape_string(key));
            self.output.push('"');
        }
    }

    fn write_arrow(&mut self, arrow: &Arrow) {
        if arrow.is_async {
            self.output.push_str("async ");
        }
        self.write_params(&arrow.params);
        if let Some(ret) = &arrow.return_type {
            self.output.push_str(": ");
            self.write_type(ret);
        }
        self.output.push_str(" => ");
        match &arrow.body {
            // An object literal body must be parenthesized to not read as a block
            ArrowBody::Expr(Expr::Object(properties)) => {
                self.output.push('(');
                self.write_object(properties);
                self.output.push(')');
            }
            ArrowBody::Expr(expr) => self.write_expr(expr),
            ArrowBody::Block(stmts) => self.write_block(stmts),
        }
    }

    fn write_literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Null => self.output.push_str("null"),
            Literal::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Literal::Number(n) => {
                // Format number cleanly (no trailing .0 for integers)
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    self.output.push_str(&(*n as i64).to_string());
                } else {
                    self.output.push_str(&n.to_string());
                }
            }
            Literal::String(s) => {
                self.output.push('"');
                self.output.push_str(&escape_string(s));
                self.output.push('"');
            }
        }
    }

    fn write_binary_op(&mut self, op: BinaryOp) {
        let s = match op {
            BinaryOp::Eq => "===",
            BinaryOp::Ne => "!==",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Nullish => "??",
        };
        self.output.push_str(s);
    }

    fn write_type(&mut self, ty: &TsType) {
        match ty {
            TsType::String => self.output.push_str("string"),
            TsType::Number => self.output.push_str("number"),
            TsType::Boolean => self.output.push_str("boolean"),
            TsType::Null => self.output.push_str("null"),
            TsType::Undefined => self.output.push_str("undefined"),
            TsType::Unknown => self.output.push_str("unknown"),
            TsType::Any => self.output.push_str("any"),

            TsType::Ref { name, args } => {
                self.output.push_str(name);
                if !args.is_empty() {
                    self.output.push('<');
                    self.write_type_list(args, ", ");
                    self.output.push('>');
                }
            }

            TsType::Query(name) => {
                self.output.push_str("typeof ");
                self.output.push_str(name);
            }

            TsType::Literal(lit) => self.write_literal(lit),

            TsType::Union(members) => {
                if members.is_empty() {
                    self.output.push_str("never");
                }
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(" | ");
                    }
                    self.write_type_grouped(member, matches!(member, TsType::Function { .. }));
                }
            }

            TsType::Intersection(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(" & ");
                    }
                    let group = matches!(member, TsType::Union(_) | TsType::Function { .. });
                    self.write_type_grouped(member, group);
                }
            }

            TsType::Array(item) => {
                let group = matches!(
                    item.as_ref(),
                    TsType::Union(_)
                        | TsType::Intersection(_)
                        | TsType::Function { .. }
                        | TsType::Readonly(_)
                );
                self.write_type_grouped(item, group);
                self.output.push_str("[]");
            }

            TsType::Readonly(inner) => {
                self.output.push_str("readonly ");
                self.write_type(inner);
            }

            TsType::Tuple(items) => {
                self.output.push('[');
                self.write_type_list(items, ", ");
                self.output.push(']');
            }

            TsType::Object(members) => {
                if members.is_empty() {
                    self.output.push_str("{}");
                    return;
                }
                self.output.push_str("{ ");
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str("; ");
                    }
                    if member.readonly {
                        self.output.push_str("readonly ");
                    }
                    self.write_key(&member.name);
                    if member.optional {
                        self.output.push('?');
                    }
                    self.output.push_str(": ");
                    self.write_type(&member.ty);
                }
                self.output.push_str(" }");
            }

            TsType::Function { params, ret } => {
                self.write_params(params);
                self.output.push_str(" => ");
                self.write_type(ret);
            }
        }
    }

    fn write_type_grouped(&mut self, ty: &TsType, group: bool) {
        if group {
            self.output.push('(');
            self.write_type(ty);
            self.output.push(')');
        } else {
            self.write_type(ty);
        }
    }

    fn write_type_list(&mut self, types: &[TsType], separator: &str) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.output.push_str(separator);
            }
            self.write_type(ty);
        }
    }
}

impl Default for TypeScriptWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn escape_template(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Escapes `/` and line breaks so the pattern fits in a regex literal.
/// Existing escape sequences are kept as written.
fn escape_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '/' => out.push_str("\\/"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_const() {
        let program = Program::new(vec![Stmt::const_decl("x", Expr::number(42))]);
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(ts.trim(), "const x = 42;");
    }

    #[test]
    fn test_simple_let() {
        let program = Program::new(vec![Stmt::let_decl("x", Some(Expr::number(42)))]);
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(ts.trim(), "let x = 42;");
    }

    #[test]
    fn test_export_const_with_type() {
        let program = Program::new(vec![Stmt::export_const(
            "Id",
            Some(TsType::generic(
                "z.Schema",
                vec![TsType::Number, TsType::Number],
            )),
            Expr::method(Expr::ident("z"), "int", vec![]),
        )]);
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(ts.trim(), "export const Id: z.Schema<number, number> = z.int();");
    }

    #[test]
    fn test_function_call() {
        let program = Program::new(vec![Stmt::expr(Expr::call(
            Expr::member(Expr::ident("console"), "log"),
            vec![Expr::string("hello")],
        ))]);
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(ts.trim(), "console.log(\"hello\");");
    }

    #[test]
    fn test_binary_expr() {
        let program = Program::new(vec![Stmt::const_decl(
            "fallback",
            Expr::binary(Expr::ident("a"), BinaryOp::Nullish, Expr::array(vec![])),
        )]);
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(ts.trim(), "const fallback = (a ?? []);");
    }

    #[test]
    fn test_arrow_function() {
        let program = Program::new(vec![Stmt::const_decl(
            "same",
            Expr::arrow(
                vec![Param::new("a"), Param::new("b")],
                Expr::binary(Expr::ident("a"), BinaryOp::Eq, Expr::ident("b")),
            ),
        )]);
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(ts.trim(), "const same = (a, b) => (a === b);");
    }

    #[test]
    fn test_arrow_returning_object_is_parenthesized() {
        let arrow = Expr::arrow(
            vec![],
            Expr::object(vec![Property::new("path", Expr::string("/"))]),
        );
        assert_eq!(TypeScriptWriter::emit_expr(&arrow), "() => ({\n  path: \"/\",\n})");
    }

    #[test]
    fn test_object_literal() {
        let program = Program::new(vec![Stmt::const_decl(
            "obj",
            Expr::object(vec![
                Property::new("a", Expr::number(1)),
                Property::new("content-type", Expr::number(2)),
            ]),
        )]);
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(ts.trim(), "const obj = {\n  a: 1,\n  \"content-type\": 2,\n};");
    }

    #[test]
    fn test_property_comment() {
        let expr = Expr::object(vec![
            Property::new("id", Expr::ident("x")).with_comment(Some("The id".into())),
        ]);
        assert_eq!(
            TypeScriptWriter::emit_expr(&expr),
            "{\n  /** The id */\n  id: x,\n}"
        );
    }

    #[test]
    fn test_template_literal() {
        let expr = Expr::template(
            vec!["/pets/".into(), "".into()],
            vec![Expr::member(Expr::ident("from"), "id")],
        );
        assert_eq!(TypeScriptWriter::emit_expr(&expr), "`/pets/${from.id}`");
    }

    #[test]
    fn test_template_escapes() {
        let expr = Expr::template(vec!["a`b${c}".into()], vec![]);
        assert_eq!(TypeScriptWriter::emit_expr(&expr), "`a\\`b\\${c}`");
    }

    #[test]
    fn test_regex_escapes_slash() {
        let expr = Expr::regex("^a/b\\/c$");
        assert_eq!(TypeScriptWriter::emit_expr(&expr), "/^a\\/b\\/c$/");
    }

    #[test]
    fn test_optional_member_and_type_args() {
        let expr = Expr::call_generic(
            Expr::optional_member(Expr::ident("tags"), "map"),
            vec![TsType::Tuple(vec![TsType::String, TsType::String])],
            vec![Expr::ident("f")],
        );
        assert_eq!(
            TypeScriptWriter::emit_expr(&expr),
            "tags?.map<[string, string]>(f)"
        );
    }

    #[test]
    fn test_as_inside_member_is_parenthesized() {
        let expr = Expr::member(
            Expr::as_(Expr::ident("error"), TsType::reference("Error")),
            "message",
        );
        assert_eq!(TypeScriptWriter::emit_expr(&expr), "(error as Error).message");
    }

    #[test]
    fn test_await_inside_as_is_parenthesized() {
        let expr = Expr::as_(
            Expr::await_(Expr::method(Expr::ident("from"), "json", vec![])),
            TsType::Any,
        );
        assert_eq!(TypeScriptWriter::emit_expr(&expr), "(await from.json()) as any");
    }

    #[test]
    fn test_try_catch() {
        let program = Program::new(vec![Stmt::try_catch(
            vec![Stmt::return_stmt(Some(Expr::number(1)))],
            "error",
            Some(TsType::Unknown),
            vec![Stmt::throw(Expr::ident("error"))],
        )]);
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(
            ts.trim(),
            "try {\n  return 1;\n} catch (error: unknown) {\n  throw error;\n}"
        );
    }

    #[test]
    fn test_if_then() {
        let program = Program::new(vec![Stmt::if_then(
            Expr::binary(Expr::ident("value"), BinaryOp::Ne, Expr::ident("undefined")),
            Stmt::expr(Expr::ident("value")),
        )]);
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(ts.trim(), "if (value !== undefined) {\n  value;\n}");
    }

    #[test]
    fn test_for_of() {
        let program = Program::new(vec![Stmt::for_of(
            "value",
            Expr::ident("values"),
            Stmt::block(vec![Stmt::expr(Expr::ident("value"))]),
        )]);
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(ts.trim(), "for (const value of values) {\n  value;\n}");
    }

    #[test]
    fn test_types() {
        let ty = TsType::union(vec![
            TsType::array(TsType::union(vec![TsType::String, TsType::Null])),
            TsType::Readonly(Box::new(TsType::array(TsType::Number))),
            TsType::Object(vec![
                TypeMember {
                    name: "id".into(),
                    ty: TsType::Number,
                    optional: true,
                    readonly: false,
                },
                TypeMember {
                    name: "name".into(),
                    ty: TsType::generic("z.output", vec![TsType::query("Name")]),
                    optional: false,
                    readonly: true,
                },
            ]),
        ]);
        assert_eq!(
            TypeScriptWriter::emit_type(&ty),
            "(string | null)[] | readonly number[] | { id?: number; readonly name: z.output<typeof Name> }"
        );
    }

    #[test]
    fn test_imports() {
        let program = Program::with_imports(
            vec![
                Import {
                    source: "effect/Schema".into(),
                    specifiers: vec![ImportSpecifier::Namespace {
                        name: "Schema".into(),
                    }],
                },
                Import {
                    source: "@tanstack/react-query".into(),
                    specifiers: vec![
                        ImportSpecifier::Named {
                            name: "queryOptions".into(),
                            type_only: false,
                        },
                        ImportSpecifier::Named {
                            name: "QueryKey".into(),
                            type_only: true,
                        },
                    ],
                },
            ],
            vec![Stmt::const_decl("x", Expr::number(1))],
        );
        let ts = TypeScriptWriter::emit(&program);
        assert_eq!(
            ts,
            "import * as Schema from \"effect/Schema\";\nimport { queryOptions, type QueryKey } from \"@tanstack/react-query\";\n\nconst x = 1;\n"
        );
    }

    #[test]
    fn test_class_with_documented_method() {
        let class = ClassDecl {
            name: "Api".into(),
            export: true,
            members: vec![
                ClassMember::Field {
                    name: "#transport".into(),
                    ty: None,
                },
                ClassMember::Method {
                    name: "ping".into(),
                    params: vec![],
                    body: vec![Stmt::return_stmt(None)],
                    is_async: true,
                    comment: Some("### Ping\nChecks liveness".into()),
                },
            ],
        };
        let ts = TypeScriptWriter::emit(&Program::new(vec![Stmt::Class(class)]));
        assert_eq!(
            ts,
            "export class Api {\n  #transport;\n\n  /**\n   * ### Ping\n   * Checks liveness\n   */\n  async ping() {\n    return;\n  }\n}\n"
        );
    }

    #[test]
    fn test_top_level_statements_are_separated() {
        let program = Program::new(vec![
            Stmt::const_decl("a", Expr::number(1)),
            Stmt::export_type("A", TsType::Number),
        ]);
        assert_eq!(
            TypeScriptWriter::emit(&program),
            "const a = 1;\n\nexport type A = number;\n"
        );
    }

    #[test]
    fn test_valid_identifier() {
        assert!(is_valid_identifier("petId"));
        assert!(is_valid_identifier("_x$"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1a"));
        assert!(!is_valid_identifier("content-type"));
    }

    #[test]
    fn test_member_with_invalid_name_is_indexed() {
        let expr = Expr::member(Expr::ident("from"), "x-request-id");
        assert_eq!(TypeScriptWriter::emit_expr(&expr), r#"from["x-request-id"]"#);
        let expr = Expr::optional_member(Expr::ident("from"), "page size");
        assert_eq!(TypeScriptWriter::emit_expr(&expr), r#"from?.["page size"]"#);
        let expr = Expr::member(Expr::This, "#transport");
        assert_eq!(TypeScriptWriter::emit_expr(&expr), "this.#transport");
    }
}
