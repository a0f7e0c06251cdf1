//! Rescue-profile queries and breed statistics for the dashboard

use serde::Serialize;
use serde_json::{json, Value};
use shelter_core::{fields, Document};
use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

/// Search-and-rescue training profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescueType {
    WaterRescue,
    MountainWildernessRescue,
    DisasterIndividualTracking,
    /// No restriction
    All,
}

impl RescueType {
    /// Query document selecting candidate animals for this profile
    pub fn query(&self) -> Document {
        let query = match self {
            Self::WaterRescue => json!({
                "animal_type": "Dog",
                "breed": {"$in": ["Labrador Retriever", "Newfoundland"]},
                "age_upon_outcome_in_weeks": {"$gte": 26, "$lt": 156},
                "sex_upon_outcome": "Intact Female",
            }),
            Self::MountainWildernessRescue => json!({
                "animal_type": "Dog",
                "breed": {"$in": [
                    "German Shepherd",
                    "Alaskan Malamute",
                    "Old English Sheepdog",
                    "Siberian Husky",
                    "Rottweiler",
                ]},
                "age_upon_outcome_in_weeks": {"$gte": 26, "$lt": 156},
                "sex_upon_outcome": "Intact Male",
            }),
            Self::DisasterIndividualTracking => json!({
                "animal_type": "Dog",
                "breed": {"$in": [
                    "Doberman Pinscher",
                    "German Shepherd",
                    "Golden Retriever",
                    "Bloodhound",
                    "Rottweiler",
                ]},
                "age_upon_outcome_in_weeks": {"$gte": 20, "$lt": 300},
                "sex_upon_outcome": "Intact Male",
            }),
            Self::All => json!({}),
        };

        match query {
            Value::Object(map) => map,
            _ => Document::new(),
        }
    }
}

impl FromStr for RescueType {
    type Err = Infallible;

    /// Unknown names select every animal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "water_rescue" => Self::WaterRescue,
            "mountain_wilderness_rescue" => Self::MountainWildernessRescue,
            "disaster_individual_tracking" => Self::DisasterIndividualTracking,
            _ => Self::All,
        })
    }
}

/// How many breeds to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreedPieMode {
    /// Every breed
    All,
    /// The top `n` breeds plus an `Other` bucket
    Top(usize),
}

impl Default for BreedPieMode {
    fn default() -> Self {
        Self::Top(10)
    }
}

/// One slice of the breed pie chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreedCount {
    pub breed: String,
    pub count: u64,
}

/// Name of the bucket that collects breeds beyond the top `n`
pub const OTHER_BREEDS: &str = "Other";

/// Count non-empty breed strings, most frequent first (ties by name)
pub fn breed_counts(documents: &[Document], mode: BreedPieMode) -> Vec<BreedCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for doc in documents {
        if let Some(Value::String(breed)) = doc.get(fields::BREED) {
            if !breed.is_empty() {
                *counts.entry(breed.as_str()).or_default() += 1;
            }
        }
    }

    let mut sorted: Vec<BreedCount> = counts
        .into_iter()
        .map(|(breed, count)| BreedCount {
            breed: breed.to_string(),
            count,
        })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.breed.cmp(&b.breed)));

    match mode {
        BreedPieMode::All => sorted,
        BreedPieMode::Top(n) => {
            let other: u64 = sorted.iter().skip(n).map(|c| c.count).sum();
            sorted.truncate(n);
            if other > 0 {
                sorted.push(BreedCount {
                    breed: OTHER_BREEDS.to_string(),
                    count: other,
                });
            }
            sorted
        }
    }
}
