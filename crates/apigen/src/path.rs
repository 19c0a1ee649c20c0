//! Path template to template-literal expression.

use crate::error::{Error, Result};
use apigen_syntax::Expr;
use indexmap::IndexMap;
use regex::Regex;

/// Build `` `/pets/${from.id}?${query}` `` from a path template.
///
/// Every `{name}` placeholder is replaced by its expression in `params`; a
/// placeholder with no declared parameter fails for `operation`. When
/// `query` is given it is appended after a `?`.
pub fn build_path_expression(
    path: &str,
    params: &IndexMap<String, Expr>,
    query: Option<Expr>,
    operation: &str,
) -> Result<Expr> {
    let placeholder = Regex::new(r"\{([^{}]*)\}")
        .map_err(|e| Error::unsupported(format!("path template {path}: {e}")))?;
    let mut quasis = Vec::new();
    let mut exprs = Vec::new();

    let mut last = 0;
    for captures in placeholder.captures_iter(path) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let expr = params.get(name.as_str()).ok_or_else(|| {
            Error::unsupported(format!(
                "path placeholder `{}` in {path} has no declared parameter in {operation}",
                name.as_str()
            ))
        })?;
        quasis.push(path[last..whole.start()].to_string());
        exprs.push(expr.clone());
        last = whole.end();
    }
    quasis.push(path[last..].to_string());

    if let Some(query) = query {
        if let Some(tail) = quasis.last_mut() {
            tail.push('?');
        }
        exprs.push(query);
        quasis.push(String::new());
    }

    Ok(Expr::template(quasis, exprs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_syntax::TypeScriptWriter;

    fn emit(expr: &Expr) -> String {
        TypeScriptWriter::emit_expr(expr)
    }

    #[test]
    fn test_literal_path() {
        let expr = build_path_expression("/pets", &IndexMap::new(), None, "ListPets").unwrap();
        assert_eq!(emit(&expr), "`/pets`");
    }

    #[test]
    fn test_undeclared_placeholder_fails() {
        let mut params = IndexMap::new();
        params.insert("year".to_string(), Expr::string("year"));
        let err = build_path_expression("/depts/{year}/{week}", &params, None, "GetDept")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported construct: path placeholder `week` in /depts/{year}/{week} has no declared parameter in GetDept"
        );

        let err = build_path_expression("/depts/{year}", &IndexMap::new(), None, "GetDept")
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedConstruct(_)));
    }

    #[test]
    fn test_params_and_query() {
        let mut params = IndexMap::new();
        params.insert(
            "year".to_string(),
            Expr::member(Expr::ident("from"), "year"),
        );
        params.insert(
            "week".to_string(),
            Expr::member(Expr::ident("from"), "week"),
        );
        let query = Expr::new_(
            Expr::ident("URLSearchParams"),
            vec![Expr::string("search=text")],
        );
        let expr = build_path_expression("/depts/y{year}/{week}", &params, Some(query), "GetDept").unwrap();
        assert_eq!(
            emit(&expr),
            r#"`/depts/y${from.year}/${from.week}?${new URLSearchParams("search=text")}`"#
        );
    }

    #[test]
    fn test_placeholder_at_end_with_query() {
        let mut params = IndexMap::new();
        params.insert("id".to_string(), Expr::ident("id"));
        let expr = build_path_expression("/pets/{id}", &params, Some(Expr::ident("q")), "GetPet").unwrap();
        assert_eq!(emit(&expr), "`/pets/${id}?${q}`");
    }

    #[test]
    fn test_regex_metacharacters_in_names() {
        let mut params = IndexMap::new();
        params.insert("a.b".to_string(), Expr::ident("x"));
        let expr = build_path_expression("/{a.b}/aXb", &params, None, "Get").unwrap();
        assert_eq!(emit(&expr), "`/${x}/aXb`");
    }
}
