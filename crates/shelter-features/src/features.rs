//! Raw record to feature vector derivation
//!
//! Both training and serving go through the functions in this module so the
//! model always sees features built the same way.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use shelter_core::{fields, Document, ParseError, ADOPTION_OUTCOME};

/// Categorical feature names, in encoding order
pub const CATEGORICAL_FEATURES: [&str; 3] = ["animal_type", "sex_upon_outcome", "primary_breed"];

/// Numeric feature names, in encoding order
pub const NUMERIC_FEATURES: [&str; 2] = ["outcome_month", "age_weeks"];

/// Column order of a serving request row
pub const FEATURE_COLUMNS: [&str; 5] = [
    "animal_type",
    "sex_upon_outcome",
    "primary_breed",
    "age_weeks",
    "outcome_month",
];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Model-ready representation of one animal outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub animal_type: String,
    pub sex_upon_outcome: String,
    pub primary_breed: String,
    /// Calendar month, 1-12
    pub outcome_month: u32,
    pub age_weeks: f64,
}

impl FeatureVector {
    /// Categorical values in [`CATEGORICAL_FEATURES`] order
    pub fn categorical(&self) -> [&str; 3] {
        [
            self.animal_type.as_str(),
            self.sex_upon_outcome.as_str(),
            self.primary_breed.as_str(),
        ]
    }

    /// Numeric values in [`NUMERIC_FEATURES`] order
    pub fn numeric(&self) -> [f64; 2] {
        [self.outcome_month as f64, self.age_weeks]
    }

    /// Build features from an already-derived serving request.
    ///
    /// The breed is normalised again, which leaves a derived primary breed
    /// unchanged and maps a compound breed the same way training does.
    pub fn from_request(request: &AdoptionRequest) -> Result<Self, ParseError> {
        if !(1..=12).contains(&request.outcome_month) {
            return Err(ParseError::InvalidMonth(request.outcome_month));
        }
        if !request.age_weeks.is_finite() {
            return Err(ParseError::InvalidNumber {
                field: "age_weeks",
                value: request.age_weeks.to_string(),
            });
        }

        Ok(Self {
            animal_type: request.animal_type.clone(),
            sex_upon_outcome: request.sex_upon_outcome.clone(),
            primary_breed: primary_breed(&request.primary_breed),
            outcome_month: request.outcome_month as u32,
            age_weeks: request.age_weeks,
        })
    }
}

/// Prediction request carrying already-derived features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptionRequest {
    pub animal_type: String,
    pub sex_upon_outcome: String,
    pub primary_breed: String,
    pub age_weeks: f64,

    /// Accepts integral floats such as `5.0`
    #[serde(deserialize_with = "integral")]
    pub outcome_month: i64,
}

fn integral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(n) => Ok(n),
        Number::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        Number::Float(f) => Err(de::Error::custom(format!(
            "expected an integer, got {}",
            f
        ))),
    }
}

/// Training target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    NotAdopted,
    Adopted,
}

impl Label {
    /// 0 or 1
    pub fn value(self) -> u8 {
        match self {
            Self::NotAdopted => 0,
            Self::Adopted => 1,
        }
    }

    pub fn as_f64(self) -> f64 {
        self.value() as f64
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.value()
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NotAdopted),
            1 => Ok(Self::Adopted),
            other => Err(format!("label must be 0 or 1, got {}", other)),
        }
    }
}

/// Derive a feature vector from a raw stored record
pub fn extract_features(record: &Document) -> Result<FeatureVector, ParseError> {
    let animal_type = required_str(record, fields::ANIMAL_TYPE)?;
    let sex_upon_outcome = required_str(record, fields::SEX_UPON_OUTCOME)?;
    let breed = required_str(record, fields::BREED)?;
    let age = required(record, fields::AGE_UPON_OUTCOME_IN_WEEKS)?;
    let datetime = required(record, fields::DATETIME)?;

    let primary_breed = primary_breed(breed);

    let datetime = datetime.as_str().ok_or(ParseError::InvalidType {
        field: fields::DATETIME,
        expected: "a string",
    })?;
    let outcome_month = parse_month(datetime).ok_or_else(|| ParseError::InvalidTimestamp {
        field: fields::DATETIME,
        value: datetime.to_string(),
    })?;

    let age_weeks = coerce_number(age).ok_or_else(|| ParseError::InvalidNumber {
        field: fields::AGE_UPON_OUTCOME_IN_WEEKS,
        value: age.to_string(),
    })?;

    Ok(FeatureVector {
        animal_type: animal_type.to_string(),
        sex_upon_outcome: sex_upon_outcome.to_string(),
        primary_breed,
        outcome_month,
        age_weeks,
    })
}

/// 1 when the outcome is exactly "Adoption", 0 otherwise
pub fn extract_label(record: &Document) -> Label {
    match record.get(fields::OUTCOME_TYPE) {
        Some(Value::String(outcome)) if outcome == ADOPTION_OUTCOME => Label::Adopted,
        _ => Label::NotAdopted,
    }
}

/// First `/`-separated segment of a breed description, trimmed
pub fn primary_breed(breed: &str) -> String {
    breed.split('/').next().unwrap_or_default().trim().to_string()
}

/// Month (1-12) of a timestamp in any accepted format
pub fn parse_month(raw: &str) -> Option<u32> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.month());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.month());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.month());
        }
    }

    None
}

/// Finite number from a JSON number or numeric string
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn required<'a>(record: &'a Document, field: &'static str) -> Result<&'a Value, ParseError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(ParseError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn required_str<'a>(record: &'a Document, field: &'static str) -> Result<&'a str, ParseError> {
    required(record, field)?
        .as_str()
        .ok_or(ParseError::InvalidType {
            field,
            expected: "a string",
        })
}
