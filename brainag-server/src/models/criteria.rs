//! Typed filter criteria
//!
//! Filters build a [`Criteria`]: an AND-combined list of predicates on named
//! columns. The PostgreSQL repositories render it into a `WHERE` clause with
//! bound parameters; the in-memory store evaluates it against [`Columns`].

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A comparable column value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Uuid(Uuid),
    Text(String),
    Int(i32),
    Timestamp(DateTime<Utc>),
}

impl Value {
    fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

/// Single condition on one column
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column = value`
    Equals { column: &'static str, value: Value },
    /// `column` contains `needle` as a substring
    Contains {
        column: &'static str,
        needle: String,
        ignore_case: bool,
    },
    /// `column >= value`
    AtLeast { column: &'static str, value: Value },
    /// `column <= value`
    AtMost { column: &'static str, value: Value },
    /// `column` is one of `ids`; an empty set matches nothing
    OneOf { column: &'static str, ids: Vec<Uuid> },
}

impl Predicate {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Equals { column, .. }
            | Self::Contains { column, .. }
            | Self::AtLeast { column, .. }
            | Self::AtMost { column, .. }
            | Self::OneOf { column, .. } => column,
        }
    }

    fn matches(&self, row: &impl Columns) -> bool {
        let Some(actual) = row.column(self.column()) else {
            return false;
        };

        match self {
            Self::Equals { value, .. } => actual == *value,
            Self::Contains {
                needle,
                ignore_case,
                ..
            } => match actual {
                Value::Text(text) if *ignore_case => {
                    text.to_lowercase().contains(&needle.to_lowercase())
                }
                Value::Text(text) => text.contains(needle.as_str()),
                _ => false,
            },
            Self::AtLeast { value, .. } => matches!(
                actual.compare(value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::AtMost { value, .. } => matches!(
                actual.compare(value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::OneOf { ids, .. } => match actual {
                Value::Uuid(id) => ids.contains(&id),
                _ => false,
            },
        }
    }
}

/// Named column access for in-memory evaluation
pub trait Columns {
    fn column(&self, name: &str) -> Option<Value>;
}

/// AND-combined predicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    predicates: Vec<Predicate>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn equals(self, column: &'static str, value: impl Into<Value>) -> Self {
        self.push(Predicate::Equals {
            column,
            value: value.into(),
        })
    }

    pub fn equals_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.equals(column, v),
            None => self,
        }
    }

    pub fn contains_opt(self, column: &'static str, needle: Option<&str>) -> Self {
        match needle {
            Some(n) => self.push(Predicate::Contains {
                column,
                needle: n.to_owned(),
                ignore_case: false,
            }),
            None => self,
        }
    }

    pub fn contains_ignore_case_opt(self, column: &'static str, needle: Option<&str>) -> Self {
        match needle {
            Some(n) => self.push(Predicate::Contains {
                column,
                needle: n.to_owned(),
                ignore_case: true,
            }),
            None => self,
        }
    }

    pub fn at_least_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(Predicate::AtLeast {
                column,
                value: v.into(),
            }),
            None => self,
        }
    }

    pub fn at_most_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(Predicate::AtMost {
                column,
                value: v.into(),
            }),
            None => self,
        }
    }

    pub fn one_of(self, column: &'static str, ids: Vec<Uuid>) -> Self {
        self.push(Predicate::OneOf { column, ids })
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Evaluate every predicate against `row`.
    pub fn matches(&self, row: &impl Columns) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: Uuid,
        name: &'static str,
        year: i32,
    }

    impl Columns for Row {
        fn column(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(self.id.into()),
                "name" => Some(self.name.into()),
                "year" => Some(self.year.into()),
                _ => None,
            }
        }
    }

    fn row() -> Row {
        Row {
            id: Uuid::new_v4(),
            name: "Milho Safrinha",
            year: 2024,
        }
    }

    #[test]
    fn empty_criteria_matches_everything() {
        assert!(Criteria::new().matches(&row()));
        assert!(Criteria::new().is_empty());
    }

    #[test]
    fn optional_builders_skip_none() {
        let criteria = Criteria::new()
            .equals_opt::<i32>("year", None)
            .contains_opt("name", None)
            .at_least_opt::<i32>("year", None);
        assert!(criteria.is_empty());
    }

    #[test]
    fn contains_respects_case_flag() {
        let r = row();
        assert!(Criteria::new()
            .contains_ignore_case_opt("name", Some("milho"))
            .matches(&r));
        assert!(!Criteria::new().contains_opt("name", Some("milho")).matches(&r));
        assert!(Criteria::new().contains_opt("name", Some("Milho")).matches(&r));
    }

    #[test]
    fn ranges_are_inclusive() {
        let r = row();
        assert!(Criteria::new()
            .at_least_opt("year", Some(2024))
            .at_most_opt("year", Some(2024))
            .matches(&r));
        assert!(!Criteria::new().at_least_opt("year", Some(2025)).matches(&r));
    }

    #[test]
    fn one_of_empty_matches_nothing() {
        let r = row();
        assert!(!Criteria::new().one_of("id", vec![]).matches(&r));
        assert!(Criteria::new().one_of("id", vec![r.id]).matches(&r));
    }

    #[test]
    fn unknown_column_never_matches() {
        assert!(!Criteria::new().equals("missing", 1).matches(&row()));
    }

    #[test]
    fn mismatched_types_never_match() {
        assert!(!Criteria::new().equals("year", "2024").matches(&row()));
    }
}
