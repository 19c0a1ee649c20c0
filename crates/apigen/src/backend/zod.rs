//! Zod 4 backend, in method-chain (`zod`) and functional (`zod/mini`) styles.

use super::{Backend, Combinators, Methods, Modifiers, Primitives, Transformer, TypeNames, fold_pairs};
use crate::session::ImportTable;
use apigen_syntax::{Arrow, ArrowBody, Expr, Literal, Param, Property, Stmt, TsType};

fn z() -> Expr {
    Expr::ident("z")
}

fn z_call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::method(z(), name, args)
}

/// `expr.name(args)` in chain style, `z.name(expr, args)` in mini style.
fn extension(mini: bool, expr: Expr, name: &str, args: Vec<Expr>) -> Expr {
    if mini {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(expr);
        all.extend(args);
        z_call(name, all)
    } else {
        Expr::method(expr, name, args)
    }
}

fn optional(expr: Expr) -> Expr {
    extension(false, expr, "optional", vec![])
}

fn mini_optional(expr: Expr) -> Expr {
    extension(true, expr, "optional", vec![])
}

fn nullable(expr: Expr) -> Expr {
    extension(false, expr, "nullable", vec![])
}

fn mini_nullable(expr: Expr) -> Expr {
    extension(true, expr, "nullable", vec![])
}

fn regex(expr: Expr, pattern: &str) -> Expr {
    extension(false, expr, "regex", vec![Expr::regex(pattern)])
}

fn mini_regex(expr: Expr, pattern: &str) -> Expr {
    Expr::method(expr, "check", vec![z_call("regex", vec![Expr::regex(pattern)])])
}

fn catchall(object: Expr, value: Expr) -> Expr {
    extension(false, object, "catchall", vec![value])
}

fn mini_catchall(object: Expr, value: Expr) -> Expr {
    extension(true, object, "catchall", vec![value])
}

fn identity(expr: Expr) -> Expr {
    expr
}

fn lazy(thunk: Expr) -> Expr {
    z_call("lazy", vec![thunk])
}

fn union(members: Vec<Expr>) -> Expr {
    z_call("union", vec![Expr::array(members)])
}

fn record(key: Expr, value: Expr) -> Expr {
    z_call("record", vec![key, value])
}

/// `z.enum` for string values, `z.literal` for anything else.
fn enumeration(values: Vec<Expr>) -> Expr {
    let all_strings = values
        .iter()
        .all(|v| matches!(v, Expr::Literal(Literal::String(_))));
    let name = if all_strings { "enum" } else { "literal" };
    z_call(name, vec![Expr::array(values)])
}

fn intersection(members: Vec<Expr>) -> Expr {
    fold_pairs(members, |left, right| z_call("intersection", vec![left, right]))
}

fn transform_fn(body: ArrowBody, is_async: bool) -> Expr {
    Expr::Arrow(Box::new(Arrow {
        params: vec![Param::new("from"), Param::new("ctx")],
        body,
        is_async,
        return_type: None,
    }))
}

/// `z.codec(encoded, decoded, { decode, encode })`
fn transformer(t: Transformer) -> Expr {
    z_call(
        "codec",
        vec![
            t.encoded,
            t.decoded,
            Expr::object(vec![
                Property::new("decode", transform_fn(t.decode, t.decode_async)),
                Property::new("encode", transform_fn(t.encode, t.encode_async)),
            ]),
        ],
    )
}

fn transformer_catch(error: Expr) -> Vec<Stmt> {
    let issue = Expr::object(vec![
        Property::new("code", Expr::string("custom")),
        Property::new("input", Expr::ident("from")),
        Property::new(
            "message",
            Expr::member(Expr::as_(error, TsType::reference("Error")), "message"),
        ),
    ]);
    vec![
        Stmt::expr(Expr::method(
            Expr::member(Expr::ident("ctx"), "issues"),
            "push",
            vec![issue],
        )),
        Stmt::return_stmt(Some(Expr::member(z(), "NEVER"))),
    ]
}

fn encode(schema: Expr, value: Expr) -> Expr {
    z_call("encodeAsync", vec![schema, value])
}

fn decode(schema: Expr, value: Expr) -> Expr {
    z_call("decodeAsync", vec![schema, value])
}

fn parse(schema: Expr, value: Expr) -> Expr {
    z_call("parseAsync", vec![schema, value])
}

fn imports(table: &mut ImportTable) {
    table.ensure_import("z", "zod", false);
}

fn mini_imports(table: &mut ImportTable) {
    table.ensure_import("z", "zod/mini", false);
}

fn primitives() -> Primitives {
    Primitives {
        boolean: z_call("boolean", vec![]),
        string: z_call("string", vec![]),
        number: z_call("number", vec![]),
        integer: z_call("int", vec![]),
        null: z_call("null", vec![]),
        unknown: z_call("unknown", vec![]),
        array: Expr::member(z(), "array"),
        object: Expr::member(z(), "object"),
        instance_of: Expr::member(z(), "instanceof"),
    }
}

/// Zod with method chaining: `z.string().optional()`.
pub fn zod() -> Backend {
    Backend {
        name: "zod",
        primitives: primitives(),
        combinators: Combinators {
            union,
            record,
            enumeration,
            intersection: Some(intersection),
            object_extend: None,
            catchall,
        },
        modifiers: Modifiers {
            optional,
            nullable,
            mutable: identity,
            immutable: identity,
            lazy,
            regex,
        },
        types: TypeNames {
            schema: "z.Schema",
            decoded: "z.output",
            encoded: "z.input",
        },
        transformer,
        transformer_catch,
        methods: Methods {
            encode,
            decode,
            parse,
        },
        supports_immutability: false,
        imports,
    }
}

/// Zod mini with free functions: `z.optional(z.string())`.
pub fn zod_mini() -> Backend {
    Backend {
        name: "zod-mini",
        combinators: Combinators {
            catchall: mini_catchall,
            ..zod().combinators
        },
        modifiers: Modifiers {
            optional: mini_optional,
            nullable: mini_nullable,
            mutable: identity,
            immutable: identity,
            lazy,
            regex: mini_regex,
        },
        types: TypeNames {
            schema: "z.ZodMiniType",
            decoded: "z.output",
            encoded: "z.input",
        },
        imports: mini_imports,
        ..zod()
    }
}
