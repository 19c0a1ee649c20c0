//! Snapshot tests for the TypeScript writer.
//!
//! These tests pin emitted fragments of the shapes generated clients use.
//! Run `cargo insta review` to update snapshots after intentional changes.

use apigen_syntax::{
    Arrow, Expr, Param, Program, Property, Stmt, TsType, TypeScriptWriter, Writer,
    TYPESCRIPT_WRITER,
};

fn emit(stmt: Stmt) -> String {
    TypeScriptWriter::emit(&Program::new(vec![stmt]))
        .trim()
        .to_string()
}

#[test]
fn writer_metadata() {
    assert_eq!(TYPESCRIPT_WRITER.language(), "typescript");
    assert_eq!(TYPESCRIPT_WRITER.extension(), "ts");
}

#[test]
fn chained_modifier() {
    let expr = Expr::method(
        Expr::method(Expr::ident("z"), "string", vec![]),
        "regex",
        vec![Expr::regex("^[a-z]+$")],
    );
    insta::assert_snapshot!(emit(Stmt::export_const("Slug", None, expr)), @"export const Slug = z.string().regex(/^[a-z]+$/);");
}

#[test]
fn type_alias_over_typeof() {
    let ty = TsType::generic("z.output", vec![TsType::query("Pet")]);
    insta::assert_snapshot!(emit(Stmt::export_type("Pet", ty)), @"export type Pet = z.output<typeof Pet>;");
}

#[test]
fn lazy_with_return_type() {
    let arrow = Expr::Arrow(Box::new(Arrow {
        params: vec![],
        body: apigen_syntax::ArrowBody::Expr(Expr::ident("Node")),
        is_async: false,
        return_type: Some(TsType::generic(
            "z.Schema",
            vec![TsType::Unknown, TsType::Unknown],
        )),
    }));
    let expr = Expr::method(Expr::ident("z"), "lazy", vec![arrow]);
    insta::assert_snapshot!(TypeScriptWriter::emit_expr(&expr), @"z.lazy((): z.Schema<unknown, unknown> => Node)");
}

#[test]
fn spread_fallback_pairs() {
    let map = Expr::call_generic(
        Expr::optional_member(Expr::member(Expr::ident("from"), "tags"), "map"),
        vec![TsType::Tuple(vec![TsType::String, TsType::String])],
        vec![Expr::arrow(
            vec![Param::new("value")],
            Expr::array(vec![
                Expr::string("tags"),
                Expr::call(Expr::ident("String"), vec![Expr::ident("value")]),
            ]),
        )],
    );
    let expr = Expr::spread(Expr::binary(
        map,
        apigen_syntax::BinaryOp::Nullish,
        Expr::array(vec![]),
    ));
    insta::assert_snapshot!(TypeScriptWriter::emit_expr(&expr), @r#"...(from.tags?.map<[string, string]>((value) => ["tags", String(value)]) ?? [])"#);
}

#[test]
fn async_arrow_block() {
    let arrow = Arrow {
        params: vec![Param::new("from"), Param::new("ctx")],
        body: apigen_syntax::ArrowBody::Block(vec![Stmt::return_stmt(Some(Expr::ident("from")))]),
        is_async: false,
        return_type: None,
    }
    .into_async();
    let expr = Expr::Arrow(Box::new(arrow));
    assert_eq!(
        TypeScriptWriter::emit_expr(&expr),
        "async (from, ctx) => {\n  return from;\n}"
    );
}

#[test]
fn nested_objects_indent() {
    let expr = Expr::call(
        Expr::member(Expr::ident("z"), "object"),
        vec![Expr::object(vec![Property::new(
            "inner",
            Expr::call(
                Expr::member(Expr::ident("z"), "object"),
                vec![Expr::object(vec![Property::new(
                    "id",
                    Expr::method(Expr::ident("z"), "int", vec![]),
                )])],
            ),
        )])],
    );
    assert_eq!(
        TypeScriptWriter::emit_expr(&expr),
        "z.object({\n  inner: z.object({\n    id: z.int(),\n  }),\n})"
    );
}
