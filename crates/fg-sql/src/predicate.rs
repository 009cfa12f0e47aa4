//! Filter predicates applied to the root table of a gather query
//!
//! Structured predicates name bare columns of the root table; they are
//! qualified with the root alias when rendered. [`Predicate::Raw`] carries
//! caller-written SQL, which must be a single expression and should qualify
//! root columns with the root alias (the root table's own name).

use crate::dialect::SqlDialect;
use crate::error::SqlResult;
use std::fmt;

/// A literal value compared against a column
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Literal {
    fn to_sql(&self) -> String {
        match self {
            Literal::Int(n) => n.to_string(),
            Literal::Float(f) if f.is_finite() => f.to_string(),
            Literal::Float(_) => "NULL".to_string(),
            Literal::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Literal::Bool(true) => "TRUE".to_string(),
            Literal::Bool(false) => "FALSE".to_string(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Int(i64::from(n))
    }
}

impl From<f64> for Literal {
    fn from(f: f64) -> Self {
        Literal::Float(f)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Text(s)
    }
}

/// Filter over the root table
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column = value`
    Eq { column: String, value: Literal },
    /// `column IN (values...)`; an empty list matches nothing
    In { column: String, values: Vec<Literal> },
    /// `column IS NULL`
    IsNull { column: String },
    /// Conjunction; empty matches everything
    And(Vec<Predicate>),
    /// Disjunction; empty matches nothing
    Or(Vec<Predicate>),
    /// Negation
    Not(Box<Predicate>),
    /// Caller-written SQL expression
    Raw(String),
}

impl Predicate {
    pub fn eq(column: &str, value: impl Into<Literal>) -> Self {
        Predicate::Eq {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn is_in<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Literal>,
    {
        Predicate::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_null(column: &str) -> Self {
        Predicate::IsNull {
            column: column.to_string(),
        }
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Predicate::Raw(sql.into())
    }

    /// Combine with another predicate under AND, flattening nested ANDs.
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut parts) => {
                parts.push(other);
                Predicate::And(parts)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    /// Bare column names referenced by structured nodes (raw SQL excluded).
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Eq { column, .. }
            | Predicate::In { column, .. }
            | Predicate::IsNull { column } => out.push(column),
            Predicate::And(parts) | Predicate::Or(parts) => {
                parts.iter().for_each(|p| p.collect_columns(out));
            }
            Predicate::Not(inner) => inner.collect_columns(out),
            Predicate::Raw(_) => {}
        }
    }

    /// Render against `root_alias`, validating raw fragments with the dialect.
    pub fn to_sql(&self, root_alias: &str, dialect: &dyn SqlDialect) -> SqlResult<String> {
        let col = |column: &str| {
            format!(
                "{}.{}",
                dialect.quote_ident(root_alias),
                dialect.quote_ident(column)
            )
        };
        Ok(match self {
            Predicate::Eq { column, value } => format!("{} = {}", col(column.as_str()), value),
            Predicate::In { values, .. } if values.is_empty() => "FALSE".to_string(),
            Predicate::In { column, values } => {
                let list: Vec<String> = values.iter().map(Literal::to_sql).collect();
                format!("{} IN ({})", col(column.as_str()), list.join(", "))
            }
            Predicate::IsNull { column } => format!("{} IS NULL", col(column.as_str())),
            Predicate::And(parts) => join_parts(parts, " AND ", "TRUE", root_alias, dialect)?,
            Predicate::Or(parts) => join_parts(parts, " OR ", "FALSE", root_alias, dialect)?,
            Predicate::Not(inner) => format!("NOT ({})", inner.to_sql(root_alias, dialect)?),
            Predicate::Raw(sql) => {
                dialect.parse_expr(sql)?;
                format!("({})", sql.trim())
            }
        })
    }
}

fn join_parts(
    parts: &[Predicate],
    separator: &str,
    empty: &str,
    root_alias: &str,
    dialect: &dyn SqlDialect,
) -> SqlResult<String> {
    if parts.is_empty() {
        return Ok(empty.to_string());
    }
    let rendered = parts
        .iter()
        .map(|p| p.to_sql(root_alias, dialect).map(|s| format!("({s})")))
        .collect::<SqlResult<Vec<_>>>()?;
    Ok(rendered.join(separator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DuckDbDialect;
    use crate::error::SqlError;

    fn render(p: &Predicate) -> String {
        p.to_sql("user", &DuckDbDialect::new()).unwrap()
    }

    #[test]
    fn test_eq_qualifies_with_root_alias() {
        assert_eq!(render(&Predicate::eq("id", 5)), r#""user"."id" = 5"#);
    }

    #[test]
    fn test_text_literal_is_escaped() {
        assert_eq!(
            render(&Predicate::eq("name", "O'Brien")),
            r#""user"."name" = 'O''Brien'"#
        );
    }

    #[test]
    fn test_in_list() {
        assert_eq!(
            render(&Predicate::is_in("id", [1, 2, 3])),
            r#""user"."id" IN (1, 2, 3)"#
        );
        assert_eq!(render(&Predicate::is_in("id", Vec::<i64>::new())), "FALSE");
    }

    #[test]
    fn test_and_flattens_and_parenthesises() {
        let p = Predicate::eq("id", 5)
            .and(Predicate::is_null("avatar_img_id"))
            .and(Predicate::eq("name", "Alice"));
        assert!(matches!(&p, Predicate::And(parts) if parts.len() == 3));
        assert_eq!(
            render(&p),
            r#"("user"."id" = 5) AND ("user"."avatar_img_id" IS NULL) AND ("user"."name" = 'Alice')"#
        );
    }

    #[test]
    fn test_empty_connectives() {
        assert_eq!(render(&Predicate::And(vec![])), "TRUE");
        assert_eq!(render(&Predicate::Or(vec![])), "FALSE");
    }

    #[test]
    fn test_not() {
        let p = Predicate::Not(Box::new(Predicate::eq("active", true)));
        assert_eq!(render(&p), r#"NOT ("user"."active" = TRUE)"#);
    }

    #[test]
    fn test_raw_is_validated() {
        assert_eq!(
            render(&Predicate::raw(r#" "user"."id" > 10 "#)),
            r#"("user"."id" > 10)"#
        );
        let err = Predicate::raw("id = 1; DELETE FROM user")
            .to_sql("user", &DuckDbDialect::new())
            .unwrap_err();
        assert!(matches!(err, SqlError::ParseError { .. }));
    }

    #[test]
    fn test_columns_skip_raw() {
        let p = Predicate::eq("id", 1)
            .and(Predicate::raw("1 = 1"))
            .and(Predicate::Or(vec![Predicate::is_null("name")]));
        assert_eq!(p.columns(), vec!["id", "name"]);
    }
}
