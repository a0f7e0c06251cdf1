//! Document representation and well-known field names

use serde_json::{Map, Value};

/// A schemaless stored document
pub type Document = Map<String, Value>;

/// Identity field assigned by the store on insert
pub const ID_FIELD: &str = "_id";

/// Outcome value that marks a record as adopted
pub const ADOPTION_OUTCOME: &str = "Adoption";

/// Field names of a raw shelter outcome record
pub mod fields {
    pub const ANIMAL_TYPE: &str = "animal_type";
    pub const SEX_UPON_OUTCOME: &str = "sex_upon_outcome";
    pub const BREED: &str = "breed";
    pub const AGE_UPON_OUTCOME_IN_WEEKS: &str = "age_upon_outcome_in_weeks";
    pub const DATETIME: &str = "datetime";
    pub const OUTCOME_TYPE: &str = "outcome_type";

    /// Fields that must be non-null for a record to be used in training
    pub const TRAINING_REQUIRED: [&str; 6] = [
        OUTCOME_TYPE,
        ANIMAL_TYPE,
        SEX_UPON_OUTCOME,
        BREED,
        AGE_UPON_OUTCOME_IN_WEEKS,
        DATETIME,
    ];
}

/// Returns true when the value is absent or JSON null
pub fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_covers_absent_and_null() {
        let doc = json!({"a": null, "b": 1});
        let doc = doc.as_object().unwrap();
        assert!(is_missing(doc.get("a")));
        assert!(is_missing(doc.get("c")));
        assert!(!is_missing(doc.get("b")));
    }
}
