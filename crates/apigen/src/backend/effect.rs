//! Effect Schema backend.

use super::{Backend, Combinators, Methods, Modifiers, Primitives, Transformer, TypeNames, fold_pairs};
use crate::session::ImportTable;
use apigen_syntax::{Arrow, ArrowBody, Expr, Param, Property, Stmt};

fn schema() -> Expr {
    Expr::ident("Schema")
}

fn schema_member(name: &str) -> Expr {
    Expr::member(schema(), name)
}

fn schema_call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::method(schema(), name, args)
}

fn pipe(expr: Expr, through: Expr) -> Expr {
    Expr::method(expr, "pipe", vec![through])
}

fn optional(expr: Expr) -> Expr {
    pipe(expr, schema_member("optional"))
}

fn nullable(expr: Expr) -> Expr {
    pipe(expr, schema_member("NullOr"))
}

fn mutable(expr: Expr) -> Expr {
    pipe(expr, schema_member("mutable"))
}

fn immutable(expr: Expr) -> Expr {
    expr
}

fn lazy(thunk: Expr) -> Expr {
    schema_call("suspend", vec![thunk])
}

fn regex(expr: Expr, pattern: &str) -> Expr {
    pipe(expr, schema_call("pattern", vec![Expr::regex(pattern)]))
}

fn union(members: Vec<Expr>) -> Expr {
    schema_call("Union", members)
}

fn record(key: Expr, value: Expr) -> Expr {
    schema_call(
        "Record",
        vec![Expr::object(vec![
            Property::new("key", key),
            Property::new("value", value),
        ])],
    )
}

fn enumeration(values: Vec<Expr>) -> Expr {
    schema_call("Literal", values)
}

fn extend(members: Vec<Expr>) -> Expr {
    fold_pairs(members, |left, right| schema_call("extend", vec![left, right]))
}

fn catchall(object: Expr, value: Expr) -> Expr {
    schema_call(
        "extend",
        vec![object, record(schema_member("String"), value)],
    )
}

/// `(from, ctx) => body`, or `(from, ctx) => Effect.promise(async () => body)`
/// when the body awaits.
fn transform_fn(body: ArrowBody, is_async: bool) -> Expr {
    let body = if is_async {
        let inner = Expr::Arrow(Box::new(Arrow {
            params: vec![],
            body,
            is_async: true,
            return_type: None,
        }));
        ArrowBody::Expr(Expr::method(Expr::ident("Effect"), "promise", vec![inner]))
    } else {
        body
    };
    Expr::Arrow(Box::new(Arrow {
        params: vec![Param::new("from"), Param::new("ctx")],
        body,
        is_async: false,
        return_type: None,
    }))
}

/// `Schema.transform` for synchronous bodies, `Schema.transformOrFail`
/// when either direction awaits.
fn transformer(t: Transformer) -> Expr {
    let is_async = t.decode_async || t.encode_async;
    let mut options = Vec::new();
    if !is_async {
        options.push(Property::new("strict", Expr::bool(true)));
    }
    options.push(Property::new("decode", transform_fn(t.decode, t.decode_async)));
    options.push(Property::new("encode", transform_fn(t.encode, t.encode_async)));
    let name = if is_async { "transformOrFail" } else { "transform" };
    schema_call(name, vec![t.encoded, t.decoded, Expr::object(options)])
}

fn transformer_catch(error: Expr) -> Vec<Stmt> {
    vec![Stmt::throw(error)]
}

/// `Schema.name(schema)(value)`
fn curried(name: &str, schema: Expr, value: Expr) -> Expr {
    Expr::call(schema_call(name, vec![schema]), vec![value])
}

fn encode(schema: Expr, value: Expr) -> Expr {
    curried("encodePromise", schema, value)
}

fn decode(schema: Expr, value: Expr) -> Expr {
    curried("decodePromise", schema, value)
}

fn parse(schema: Expr, value: Expr) -> Expr {
    curried("decodeUnknownPromise", schema, value)
}

fn imports(table: &mut ImportTable) {
    table.ensure_namespace_import("Schema", "effect/Schema");
    table.ensure_import("Effect", "effect", false);
}

pub fn effect() -> Backend {
    Backend {
        name: "effect",
        primitives: Primitives {
            boolean: schema_member("Boolean"),
            string: schema_member("String"),
            number: schema_member("Number"),
            integer: pipe(schema_member("Number"), schema_call("int", vec![])),
            null: schema_member("Null"),
            unknown: schema_member("Unknown"),
            array: schema_member("Array"),
            object: schema_member("Struct"),
            instance_of: schema_member("instanceOf"),
        },
        combinators: Combinators {
            union,
            record,
            enumeration,
            intersection: Some(extend),
            object_extend: Some(extend),
            catchall,
        },
        modifiers: Modifiers {
            optional,
            nullable,
            mutable,
            immutable,
            lazy,
            regex,
        },
        types: TypeNames {
            schema: "Schema.Schema",
            decoded: "Schema.Schema.Type",
            encoded: "Schema.Schema.Encoded",
        },
        transformer,
        transformer_catch,
        methods: Methods {
            encode,
            decode,
            parse,
        },
        supports_immutability: true,
        imports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_syntax::TypeScriptWriter;

    fn emit(expr: &Expr) -> String {
        TypeScriptWriter::emit_expr(expr)
    }

    #[test]
    fn test_pipe_modifiers() {
        let backend = effect();
        let expr = (backend.modifiers.optional)((backend.modifiers.regex)(
            backend.primitives.string.clone(),
            "^[0-9]+$",
        ));
        assert_eq!(
            emit(&expr),
            "Schema.String.pipe(Schema.pattern(/^[0-9]+$/)).pipe(Schema.optional)"
        );
    }

    #[test]
    fn test_integer() {
        assert_eq!(
            emit(&effect().primitives.integer),
            "Schema.Number.pipe(Schema.int())"
        );
    }

    #[test]
    fn test_union_spreads_members() {
        let expr = union(vec![Expr::ident("A"), Expr::ident("B")]);
        assert_eq!(emit(&expr), "Schema.Union(A, B)");
    }

    #[test]
    fn test_async_transform_wraps_promise() {
        let t = Transformer::new(
            Expr::ident("Enc"),
            Expr::ident("Dec"),
            ArrowBody::Expr(Expr::ident("from")),
            super::super::not_implemented(),
        )
        .async_decode();
        let out = emit(&transformer(t));
        assert!(out.starts_with("Schema.transformOrFail(Enc, Dec, {"));
        assert!(out.contains("decode: (from, ctx) => Effect.promise(async () => from),"));
        assert!(!out.contains("strict"));
    }

    #[test]
    fn test_sync_transform_is_strict() {
        let t = Transformer::new(
            Expr::ident("Enc"),
            Expr::ident("Dec"),
            ArrowBody::Expr(Expr::ident("from")),
            ArrowBody::Expr(Expr::ident("from")),
        );
        let out = emit(&transformer(t));
        assert!(out.starts_with("Schema.transform(Enc, Dec, {\n  strict: true,"));
    }

    #[test]
    fn test_curried_methods() {
        let expr = (effect().methods.encode)(Expr::ident("P"), Expr::ident("parameters"));
        assert_eq!(emit(&expr), "Schema.encodePromise(P)(parameters)");
        let expr = (effect().methods.parse)(Expr::ident("P"), Expr::ident("value"));
        assert_eq!(emit(&expr), "Schema.decodeUnknownPromise(P)(value)");
    }
}
