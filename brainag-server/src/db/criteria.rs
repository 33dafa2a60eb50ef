//! Render [`Criteria`] into SQL

use sqlx::{Postgres, QueryBuilder};

use crate::models::{Criteria, Predicate, Value};

/// Escape LIKE wildcards so the needle matches literally.
fn like_escape(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &Value) {
    match value {
        Value::Uuid(v) => builder.push_bind(*v),
        Value::Text(v) => builder.push_bind(v.clone()),
        Value::Int(v) => builder.push_bind(*v),
        Value::Timestamp(v) => builder.push_bind(*v),
    };
}

/// Append ` WHERE ...` for every predicate, all values bound.
///
/// Column names come from the model filters, never from user input.
pub fn push_where(builder: &mut QueryBuilder<'_, Postgres>, criteria: &Criteria) {
    builder.push(" WHERE 1=1");
    for predicate in criteria.predicates() {
        builder.push(" AND ");
        builder.push(predicate.column());
        match predicate {
            Predicate::Equals { value, .. } => {
                builder.push(" = ");
                push_value(builder, value);
            }
            Predicate::Contains {
                needle,
                ignore_case,
                ..
            } => {
                builder.push(if *ignore_case { " ILIKE " } else { " LIKE " });
                builder.push("'%' || ");
                builder.push_bind(like_escape(needle));
                builder.push(" || '%'");
            }
            Predicate::AtLeast { value, .. } => {
                builder.push(" >= ");
                push_value(builder, value);
            }
            Predicate::AtMost { value, .. } => {
                builder.push(" <= ");
                push_value(builder, value);
            }
            Predicate::OneOf { ids, .. } => {
                builder.push(" = ANY(");
                builder.push_bind(ids.clone());
                builder.push(")");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn render(criteria: &Criteria) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM t");
        push_where(&mut builder, criteria);
        builder.sql().to_owned()
    }

    #[test]
    fn empty_criteria_is_tautology() {
        assert_eq!(render(&Criteria::new()), "SELECT * FROM t WHERE 1=1");
    }

    #[test]
    fn renders_bound_predicates() {
        let criteria = Criteria::new()
            .contains_ignore_case_opt("name", Some("soja"))
            .equals("year", 2024)
            .one_of("farm_id", vec![Uuid::new_v4()]);
        assert_eq!(
            render(&criteria),
            "SELECT * FROM t WHERE 1=1 AND name ILIKE '%' || $1 || '%' AND year = $2 AND farm_id = ANY($3)"
        );
    }

    #[test]
    fn ranges_render_inclusive() {
        let now = chrono::Utc::now();
        let criteria = Criteria::new()
            .at_least_opt("created_at", Some(now))
            .at_most_opt("created_at", Some(now));
        assert_eq!(
            render(&criteria),
            "SELECT * FROM t WHERE 1=1 AND created_at >= $1 AND created_at <= $2"
        );
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_escape("50%_a\\b"), "50\\%\\_a\\\\b");
        assert_eq!(like_escape("Milho"), "Milho");
    }
}
