//! Structural equality for IR types.
//!
//! `structure_eq` compares IR trees ignoring "surface hints" - fields that
//! affect how the module reads but not what it does.
//!
//! # Hint Fields (normalized during comparison)
//!
//! - `Property::comment`, `ClassMember::Method { comment }` - documentation only
//! - `Stmt::Let { mutable }` - `let` vs `const`
//! - `Expr::Member { computed }` - normalized when the property is a string literal
//! - `TypeMember::readonly` - only some backends distinguish it
//!
//! # Core Fields (must match exactly)
//!
//! - All names, literal values, operators
//! - Expression and type trees

use super::{
    Arrow, ArrowBody, ClassDecl, ClassMember, Expr, Param, Program, Property, Stmt, TsType,
    TypeMember,
};

/// Trait for structural equality comparison.
///
/// Unlike `PartialEq`, this ignores surface hint fields that may differ
/// between otherwise equivalent modules.
pub trait StructureEq {
    /// Compare two values for structural equality.
    fn structure_eq(&self, other: &Self) -> bool;
}

impl StructureEq for Program {
    fn structure_eq(&self, other: &Self) -> bool {
        self.imports == other.imports && vec_structure_eq(&self.body, &other.body)
    }
}

impl StructureEq for Stmt {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Stmt::Expr(a), Stmt::Expr(b)) => a.structure_eq(b),

            // Ignore `mutable` - it's a surface hint
            (
                Stmt::Let {
                    name: n1,
                    ty: t1,
                    init: i1,
                    mutable: _,
                    export: e1,
                },
                Stmt::Let {
                    name: n2,
                    ty: t2,
                    init: i2,
                    mutable: _,
                    export: e2,
                },
            ) => {
                n1 == n2
                    && e1 == e2
                    && option_structure_eq(t1.as_ref(), t2.as_ref())
                    && option_structure_eq(i1.as_ref(), i2.as_ref())
            }

            (
                Stmt::TypeAlias {
                    name: n1,
                    ty: t1,
                    export: e1,
                },
                Stmt::TypeAlias {
                    name: n2,
                    ty: t2,
                    export: e2,
                },
            ) => n1 == n2 && e1 == e2 && t1.structure_eq(t2),

            (Stmt::Block(a), Stmt::Block(b)) => vec_structure_eq(a, b),

            (
                Stmt::If {
                    test: t1,
                    consequent: c1,
                },
                Stmt::If {
                    test: t2,
                    consequent: c2,
                },
            ) => t1.structure_eq(t2) && c1.structure_eq(c2.as_ref()),

            (
                Stmt::ForIn {
                    variable: v1,
                    iterable: i1,
                    body: b1,
                },
                Stmt::ForIn {
                    variable: v2,
                    iterable: i2,
                    body: b2,
                },
            ) => v1 == v2 && i1.structure_eq(i2) && b1.structure_eq(b2.as_ref()),

            (Stmt::Return(a), Stmt::Return(b)) => option_structure_eq(a.as_ref(), b.as_ref()),

            (Stmt::Throw(a), Stmt::Throw(b)) => a.structure_eq(b),

            (
                Stmt::TryCatch {
                    body: b1,
                    catch_param: cp1,
                    catch_ty: ct1,
                    catch_body: cb1,
                },
                Stmt::TryCatch {
                    body: b2,
                    catch_param: cp2,
                    catch_ty: ct2,
                    catch_body: cb2,
                },
            ) => {
                b1.structure_eq(b2.as_ref())
                    && cp1 == cp2
                    && option_structure_eq(ct1.as_ref(), ct2.as_ref())
                    && cb1.structure_eq(cb2.as_ref())
            }

            (Stmt::Class(a), Stmt::Class(b)) => a.structure_eq(b),

            _ => false,
        }
    }
}

impl StructureEq for Expr {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Literal(a), Expr::Literal(b)) => a == b,
            (Expr::Regex(a), Expr::Regex(b)) => a == b,
            (Expr::Ident(a), Expr::Ident(b)) => a == b,
            (Expr::This, Expr::This) => true,

            (
                Expr::Binary {
                    left: l1,
                    op: o1,
                    right: r1,
                },
                Expr::Binary {
                    left: l2,
                    op: o2,
                    right: r2,
                },
            ) => o1 == o2 && l1.structure_eq(l2) && r1.structure_eq(r2),

            (
                Expr::Call {
                    callee: c1,
                    args: a1,
                    type_args: t1,
                },
                Expr::Call {
                    callee: c2,
                    args: a2,
                    type_args: t2,
                },
            ) => c1.structure_eq(c2) && vec_structure_eq(a1, a2) && vec_structure_eq(t1, t2),

            (Expr::New { callee: c1, args: a1 }, Expr::New { callee: c2, args: a2 }) => {
                c1.structure_eq(c2) && vec_structure_eq(a1, a2)
            }

            // Normalize `computed` when property is a string literal
            (
                Expr::Member {
                    object: o1,
                    property: p1,
                    computed: _,
                    optional: q1,
                },
                Expr::Member {
                    object: o2,
                    property: p2,
                    computed: _,
                    optional: q2,
                },
            ) => q1 == q2 && o1.structure_eq(o2) && p1.structure_eq(p2),

            (Expr::Array(a), Expr::Array(b)) => vec_structure_eq(a, b),
            (Expr::Object(a), Expr::Object(b)) => vec_structure_eq(a, b),
            (Expr::Spread(a), Expr::Spread(b)) => a.structure_eq(b),
            (Expr::Arrow(a), Expr::Arrow(b)) => a.structure_eq(b),
            (Expr::Await(a), Expr::Await(b)) => a.structure_eq(b),

            (Expr::As { expr: e1, ty: t1 }, Expr::As { expr: e2, ty: t2 }) => {
                e1.structure_eq(e2) && t1.structure_eq(t2)
            }

            (
                Expr::Template {
                    quasis: q1,
                    exprs: e1,
                },
                Expr::Template {
                    quasis: q2,
                    exprs: e2,
                },
            ) => q1 == q2 && vec_structure_eq(e1, e2),

            (
                Expr::Conditional {
                    test: t1,
                    consequent: c1,
                    alternate: a1,
                },
                Expr::Conditional {
                    test: t2,
                    consequent: c2,
                    alternate: a2,
                },
            ) => t1.structure_eq(t2) && c1.structure_eq(c2) && a1.structure_eq(a2),

            (
                Expr::Assign {
                    target: t1,
                    value: v1,
                },
                Expr::Assign {
                    target: t2,
                    value: v2,
                },
            ) => t1.structure_eq(t2) && v1.structure_eq(v2),

            _ => false,
        }
    }
}

// Ignore `comment`
impl StructureEq for Property {
    fn structure_eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value.structure_eq(&other.value)
    }
}

impl StructureEq for Arrow {
    fn structure_eq(&self, other: &Self) -> bool {
        self.is_async == other.is_async
            && vec_structure_eq(&self.params, &other.params)
            && option_structure_eq(self.return_type.as_ref(), other.return_type.as_ref())
            && match (&self.body, &other.body) {
                (ArrowBody::Expr(a), ArrowBody::Expr(b)) => a.structure_eq(b),
                (ArrowBody::Block(a), ArrowBody::Block(b)) => vec_structure_eq(a, b),
                _ => false,
            }
    }
}

impl StructureEq for Param {
    fn structure_eq(&self, other: &Self) -> bool {
        self.name == other.name && option_structure_eq(self.ty.as_ref(), other.ty.as_ref())
    }
}

impl StructureEq for TsType {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TsType::Ref { name: n1, args: a1 }, TsType::Ref { name: n2, args: a2 }) => {
                n1 == n2 && vec_structure_eq(a1, a2)
            }
            (TsType::Union(a), TsType::Union(b))
            | (TsType::Intersection(a), TsType::Intersection(b))
            | (TsType::Tuple(a), TsType::Tuple(b)) => vec_structure_eq(a, b),
            (TsType::Array(a), TsType::Array(b)) | (TsType::Readonly(a), TsType::Readonly(b)) => {
                a.structure_eq(b)
            }
            (TsType::Object(a), TsType::Object(b)) => vec_structure_eq(a, b),
            (
                TsType::Function {
                    params: p1,
                    ret: r1,
                },
                TsType::Function {
                    params: p2,
                    ret: r2,
                },
            ) => vec_structure_eq(p1, p2) && r1.structure_eq(r2),
            _ => self == other,
        }
    }
}

// Ignore `readonly`
impl StructureEq for TypeMember {
    fn structure_eq(&self, other: &Self) -> bool {
        self.name == other.name && self.optional == other.optional && self.ty.structure_eq(&other.ty)
    }
}

impl StructureEq for ClassDecl {
    fn structure_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.export == other.export
            && vec_structure_eq(&self.members, &other.members)
    }
}

impl StructureEq for ClassMember {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ClassMember::Field { name: n1, ty: t1 }, ClassMember::Field { name: n2, ty: t2 }) => {
                n1 == n2 && option_structure_eq(t1.as_ref(), t2.as_ref())
            }
            (
                ClassMember::Constructor { params: p1, body: b1 },
                ClassMember::Constructor { params: p2, body: b2 },
            ) => vec_structure_eq(p1, p2) && vec_structure_eq(b1, b2),
            // Ignore `comment`
            (
                ClassMember::Method {
                    name: n1,
                    params: p1,
                    body: b1,
                    is_async: a1,
                    comment: _,
                },
                ClassMember::Method {
                    name: n2,
                    params: p2,
                    body: b2,
                    is_async: a2,
                    comment: _,
                },
            ) => n1 == n2 && a1 == a2 && vec_structure_eq(p1, p2) && vec_structure_eq(b1, b2),
            _ => false,
        }
    }
}

// Helper functions

fn vec_structure_eq<T: StructureEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structure_eq(y))
}

fn option_structure_eq<T: StructureEq>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x.structure_eq(y),
        _ => false,
    }
}
