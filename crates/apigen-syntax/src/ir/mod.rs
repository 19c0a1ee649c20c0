//! Program IR for generated TypeScript modules.
//!
//! The IR covers the subset of TypeScript that generated API clients use:
//! module imports, `const`/`type` declarations, one class, arrow functions,
//! template literals and type annotations. It carries no source positions;
//! formatting is entirely the writer's concern.

mod structure_eq;

pub use structure_eq::StructureEq;

use serde::{Deserialize, Serialize};

/// A complete module: imports followed by top-level statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub imports: Vec<Import>,
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self {
            imports: Vec::new(),
            body,
        }
    }

    pub fn with_imports(imports: Vec<Import>, body: Vec<Stmt>) -> Self {
        Self { imports, body }
    }
}

/// `import ... from "source"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    pub source: String,
    pub specifiers: Vec<ImportSpecifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportSpecifier {
    /// `{ name }` or `{ type name }`.
    Named { name: String, type_only: bool },
    /// `* as name`.
    Namespace { name: String },
}

impl ImportSpecifier {
    pub fn name(&self) -> &str {
        match self {
            ImportSpecifier::Named { name, .. } | ImportSpecifier::Namespace { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `===`
    Eq,
    /// `!==`
    Ne,
    And,
    Or,
    /// `??`
    Nullish,
}

/// Statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    /// `const`/`let` binding, optionally exported and annotated.
    Let {
        name: String,
        ty: Option<TsType>,
        init: Option<Expr>,
        mutable: bool,
        export: bool,
    },
    TypeAlias {
        name: String,
        ty: TsType,
        export: bool,
    },
    Block(Vec<Stmt>),
    /// `if (test) consequent`
    If {
        test: Expr,
        consequent: Box<Stmt>,
    },
    /// `for (const variable of iterable) body`
    ForIn {
        variable: String,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Throw(Expr),
    TryCatch {
        body: Box<Stmt>,
        catch_param: Option<String>,
        catch_ty: Option<TsType>,
        catch_body: Box<Stmt>,
    },
    Class(ClassDecl),
}

/// Expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    /// `/pattern/`
    Regex(String),
    Ident(String),
    This,
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        type_args: Vec<TsType>,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
        optional: bool,
    },
    Array(Vec<Expr>),
    Object(Vec<Property>),
    Spread(Box<Expr>),
    Arrow(Box<Arrow>),
    Await(Box<Expr>),
    As {
        expr: Box<Expr>,
        ty: TsType,
    },
    /// Template literal; `quasis.len() == exprs.len() + 1`.
    Template {
        quasis: Vec<String>,
        exprs: Vec<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

/// Object literal member with an optional leading doc comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: Expr,
    pub comment: Option<String>,
}

impl Property {
    pub fn new(key: impl Into<String>, value: Expr) -> Self {
        Self {
            key: key.into(),
            value,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub params: Vec<Param>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub return_type: Option<TsType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrowBody {
    Expr(Expr),
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Option<TsType>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }

    pub fn typed(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
        }
    }
}

/// Type annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TsType {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Unknown,
    Any,
    /// Named reference, possibly qualified (`z.output`) with type arguments.
    Ref { name: String, args: Vec<TsType> },
    /// `typeof name`
    Query(String),
    Literal(Literal),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
    Array(Box<TsType>),
    /// `readonly T`
    Readonly(Box<TsType>),
    Tuple(Vec<TsType>),
    Object(Vec<TypeMember>),
    Function { params: Vec<Param>, ret: Box<TsType> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMember {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub export: bool,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassMember {
    /// Field declaration; `#`-prefixed names are private.
    Field { name: String, ty: Option<TsType> },
    Constructor { params: Vec<Param>, body: Vec<Stmt> },
    Method {
        name: String,
        params: Vec<Param>,
        body: Vec<Stmt>,
        is_async: bool,
        comment: Option<String>,
    },
}

// Builders

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(s.into()))
    }

    pub fn number(n: impl Into<f64>) -> Self {
        Expr::Literal(Literal::Number(n.into()))
    }

    pub fn bool(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Expr::Regex(pattern.into())
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
            type_args: Vec::new(),
        }
    }

    pub fn call_generic(callee: Expr, type_args: Vec<TsType>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
            type_args,
        }
    }

    /// `object.method(args)`
    pub fn method(object: Expr, method: &str, args: Vec<Expr>) -> Self {
        Expr::call(Expr::member(object, method), args)
    }

    pub fn new_(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::New {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn member(object: Expr, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: Box::new(Expr::string(property)),
            computed: false,
            optional: false,
        }
    }

    /// `object?.property`
    pub fn optional_member(object: Expr, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: Box::new(Expr::string(property)),
            computed: false,
            optional: true,
        }
    }

    /// `object[index]`
    pub fn index(object: Expr, index: Expr) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: Box::new(index),
            computed: true,
            optional: false,
        }
    }

    pub fn array(items: Vec<Expr>) -> Self {
        Expr::Array(items)
    }

    pub fn object(properties: Vec<Property>) -> Self {
        Expr::Object(properties)
    }

    pub fn spread(expr: Expr) -> Self {
        Expr::Spread(Box::new(expr))
    }

    pub fn arrow(params: Vec<Param>, body: Expr) -> Self {
        Expr::Arrow(Box::new(Arrow {
            params,
            body: ArrowBody::Expr(body),
            is_async: false,
            return_type: None,
        }))
    }

    pub fn arrow_block(params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Expr::Arrow(Box::new(Arrow {
            params,
            body: ArrowBody::Block(body),
            is_async: false,
            return_type: None,
        }))
    }

    pub fn await_(expr: Expr) -> Self {
        Expr::Await(Box::new(expr))
    }

    pub fn as_(expr: Expr, ty: TsType) -> Self {
        Expr::As {
            expr: Box::new(expr),
            ty,
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn conditional(test: Expr, consequent: Expr, alternate: Expr) -> Self {
        Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn template(quasis: Vec<String>, exprs: Vec<Expr>) -> Self {
        Expr::Template { quasis, exprs }
    }
}

impl Arrow {
    pub fn into_async(mut self) -> Self {
        self.is_async = true;
        self
    }
}

impl Stmt {
    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    pub fn const_decl(name: impl Into<String>, init: Expr) -> Self {
        Stmt::Let {
            name: name.into(),
            ty: None,
            init: Some(init),
            mutable: false,
            export: false,
        }
    }

    pub fn let_decl(name: impl Into<String>, init: Option<Expr>) -> Self {
        Stmt::Let {
            name: name.into(),
            ty: None,
            init,
            mutable: true,
            export: false,
        }
    }

    /// `export const name: ty = init;`
    pub fn export_const(name: impl Into<String>, ty: Option<TsType>, init: Expr) -> Self {
        Stmt::Let {
            name: name.into(),
            ty,
            init: Some(init),
            mutable: false,
            export: true,
        }
    }

    pub fn export_type(name: impl Into<String>, ty: TsType) -> Self {
        Stmt::TypeAlias {
            name: name.into(),
            ty,
            export: true,
        }
    }

    pub fn block(stmts: Vec<Stmt>) -> Self {
        Stmt::Block(stmts)
    }

    pub fn if_then(test: Expr, consequent: Stmt) -> Self {
        Stmt::If {
            test,
            consequent: Box::new(consequent),
        }
    }

    pub fn for_of(variable: impl Into<String>, iterable: Expr, body: Stmt) -> Self {
        Stmt::ForIn {
            variable: variable.into(),
            iterable,
            body: Box::new(body),
        }
    }

    pub fn return_stmt(expr: Option<Expr>) -> Self {
        Stmt::Return(expr)
    }

    pub fn throw(expr: Expr) -> Self {
        Stmt::Throw(expr)
    }

    pub fn try_catch(
        body: Vec<Stmt>,
        catch_param: impl Into<String>,
        catch_ty: Option<TsType>,
        catch_body: Vec<Stmt>,
    ) -> Self {
        Stmt::TryCatch {
            body: Box::new(Stmt::Block(body)),
            catch_param: Some(catch_param.into()),
            catch_ty,
            catch_body: Box::new(Stmt::Block(catch_body)),
        }
    }
}

impl TsType {
    pub fn reference(name: impl Into<String>) -> Self {
        TsType::Ref {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TsType>) -> Self {
        TsType::Ref {
            name: name.into(),
            args,
        }
    }

    pub fn query(name: impl Into<String>) -> Self {
        TsType::Query(name.into())
    }

    pub fn union(members: Vec<TsType>) -> Self {
        TsType::Union(members)
    }

    pub fn array(item: TsType) -> Self {
        TsType::Array(Box::new(item))
    }
}
