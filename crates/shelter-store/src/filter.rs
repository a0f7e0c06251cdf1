//! Mongo-style query documents
//!
//! A filter is a document whose keys are field names. A literal value means
//! equality; an object whose keys all start with `$` is a set of operators
//! that must all hold:
//!
//! ```text
//! {"animal_type": "Dog", "age_upon_outcome_in_weeks": {"$gte": 26, "$lt": 156}}
//! ```

use serde_json::Value;
use shelter_core::{is_missing, Document, Error, Result};
use std::cmp::Ordering;

/// Parsed query over documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq)]
struct Clause {
    field: String,
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Eq(Value),
    Ne(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Exists(bool),
}

impl Filter {
    /// Filter that matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a query document
    pub fn parse(query: &Document) -> Result<Self> {
        let mut clauses = Vec::with_capacity(query.len());

        for (field, value) in query {
            if field.starts_with('$') {
                return Err(Error::invalid_filter(format!(
                    "top-level operator '{}' is not supported",
                    field
                )));
            }

            let conditions = match value {
                Value::Object(ops) if !ops.is_empty() && ops.keys().all(|k| k.starts_with('$')) => {
                    ops.iter()
                        .map(|(op, arg)| parse_condition(field, op, arg))
                        .collect::<Result<Vec<_>>>()?
                }
                other => vec![Condition::Eq(other.clone())],
            };

            clauses.push(Clause {
                field: field.clone(),
                conditions,
            });
        }

        Ok(Self { clauses })
    }

    /// Build a filter requiring every listed field to be present and non-null
    pub fn not_null<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        let clauses = fields
            .into_iter()
            .map(|field| Clause {
                field: field.to_string(),
                conditions: vec![Condition::Ne(Value::Null)],
            })
            .collect();
        Self { clauses }
    }

    /// Check a document against every clause
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses.iter().all(|clause| {
            let value = document.get(&clause.field);
            clause.conditions.iter().all(|c| c.holds(value))
        })
    }
}

fn parse_condition(field: &str, op: &str, arg: &Value) -> Result<Condition> {
    let list = |arg: &Value| -> Result<Vec<Value>> {
        arg.as_array().cloned().ok_or_else(|| {
            Error::invalid_filter(format!("'{}' on '{}' expects an array", op, field))
        })
    };

    Ok(match op {
        "$eq" => Condition::Eq(arg.clone()),
        "$ne" => Condition::Ne(arg.clone()),
        "$in" => Condition::In(list(arg)?),
        "$nin" => Condition::Nin(list(arg)?),
        "$gt" => Condition::Gt(arg.clone()),
        "$gte" => Condition::Gte(arg.clone()),
        "$lt" => Condition::Lt(arg.clone()),
        "$lte" => Condition::Lte(arg.clone()),
        "$exists" => match arg {
            Value::Bool(b) => Condition::Exists(*b),
            _ => {
                return Err(Error::invalid_filter(format!(
                    "'$exists' on '{}' expects a boolean",
                    field
                )))
            }
        },
        other => {
            return Err(Error::invalid_filter(format!(
                "unknown operator '{}' on '{}'",
                other, field
            )))
        }
    })
}

impl Condition {
    fn holds(&self, value: Option<&Value>) -> bool {
        match self {
            Self::Eq(target) => equals(value, target),
            Self::Ne(target) => !equals(value, target),
            Self::In(targets) => targets.iter().any(|t| equals(value, t)),
            Self::Nin(targets) => !targets.iter().any(|t| equals(value, t)),
            Self::Gt(target) => compare(value, target) == Some(Ordering::Greater),
            Self::Gte(target) => matches!(
                compare(value, target),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt(target) => compare(value, target) == Some(Ordering::Less),
            Self::Lte(target) => matches!(
                compare(value, target),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::Exists(expected) => value.is_some() == *expected,
        }
    }
}

/// Equality where null matches an absent field and numbers compare by value
fn equals(value: Option<&Value>, target: &Value) -> bool {
    if target.is_null() {
        return is_missing(value);
    }
    match (value, target) {
        (None, _) => false,
        (Some(Value::Number(a)), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Some(v), t) => v == t,
    }
}

/// Ordering between same-typed scalars; anything else is incomparable
fn compare(value: Option<&Value>, target: &Value) -> Option<Ordering> {
    match (value?, target) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn filter(value: Value) -> Filter {
        Filter::parse(&doc(value)).unwrap()
    }

    #[test]
    fn test_literal_equality() {
        let f = filter(json!({"animal_type": "Dog"}));
        assert!(f.matches(&doc(json!({"animal_type": "Dog", "breed": "Beagle"}))));
        assert!(!f.matches(&doc(json!({"animal_type": "Cat"}))));
        assert!(!f.matches(&doc(json!({"breed": "Beagle"}))));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        let f = filter(json!({"age": 26}));
        assert!(f.matches(&doc(json!({"age": 26.0}))));
    }

    #[test]
    fn test_ne_null_requires_presence() {
        let f = filter(json!({"breed": {"$ne": null}}));
        assert!(f.matches(&doc(json!({"breed": "Beagle"}))));
        assert!(!f.matches(&doc(json!({"breed": null}))));
        assert!(!f.matches(&doc(json!({}))));
    }

    #[test]
    fn test_range_and_in() {
        let f = filter(json!({
            "breed": {"$in": ["Labrador Retriever", "Newfoundland"]},
            "age": {"$gte": 26, "$lt": 156}
        }));
        assert!(f.matches(&doc(json!({"breed": "Newfoundland", "age": 26}))));
        assert!(!f.matches(&doc(json!({"breed": "Newfoundland", "age": 156}))));
        assert!(!f.matches(&doc(json!({"breed": "Beagle", "age": 50}))));
        assert!(!f.matches(&doc(json!({"breed": "Newfoundland", "age": "50"}))));
    }

    #[test]
    fn test_exists() {
        let f = filter(json!({"breed": {"$exists": false}}));
        assert!(f.matches(&doc(json!({"name": "Rex"}))));
        assert!(!f.matches(&doc(json!({"breed": null}))));
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let err = Filter::parse(&doc(json!({"breed": {"$regex": "Lab"}}))).unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(_)));

        let err = Filter::parse(&doc(json!({"$or": []}))).unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(_)));
    }

    #[test]
    fn test_embedded_object_is_literal() {
        let f = filter(json!({"location": {"lat": 30.0}}));
        assert!(f.matches(&doc(json!({"location": {"lat": 30.0}}))));
        assert!(!f.matches(&doc(json!({"location": {"lat": 31.0}}))));
    }

    #[test]
    fn test_not_null_builder() {
        let f = Filter::not_null(["a", "b"]);
        assert!(f.matches(&doc(json!({"a": 1, "b": "x"}))));
        assert!(!f.matches(&doc(json!({"a": 1}))));
        assert!(Filter::all().matches(&doc(json!({}))));
    }
}
