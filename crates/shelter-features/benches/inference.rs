//! Inference latency benchmarks
//!
//! Run with: cargo bench -p shelter-features

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use shelter_core::Document;
use shelter_features::{
    extract_features, AdoptionPipeline, FeatureVector, Label, LogisticRegressionConfig,
};

const BREEDS: [&str; 8] = [
    "Beagle",
    "Pit Bull",
    "Labrador Retriever",
    "Chihuahua Shorthair",
    "Domestic Shorthair",
    "Siamese",
    "German Shepherd",
    "Border Collie",
];

fn training_rows(n: usize) -> (Vec<FeatureVector>, Vec<Label>) {
    (0..n)
        .map(|i| {
            let row = FeatureVector {
                animal_type: if i % 3 == 0 { "Cat" } else { "Dog" }.to_string(),
                sex_upon_outcome: if i % 2 == 0 { "Neutered Male" } else { "Intact Female" }
                    .to_string(),
                primary_breed: BREEDS[i % BREEDS.len()].to_string(),
                outcome_month: (i % 12) as u32 + 1,
                age_weeks: (i % 400) as f64,
            };
            let label = if i % 5 < 3 { Label::Adopted } else { Label::NotAdopted };
            (row, label)
        })
        .unzip()
}

fn benchmark_extract_features(c: &mut Criterion) {
    let record: Document = json!({
        "animal_type": "Dog",
        "sex_upon_outcome": "Neutered Male",
        "breed": "Labrador Retriever Mix/Pit Bull",
        "age_upon_outcome_in_weeks": "52.14",
        "datetime": "2015-11-14 16:20:00",
    })
    .as_object()
    .cloned()
    .unwrap_or_default();

    c.bench_function("extract_features", |b| {
        b.iter(|| extract_features(black_box(&record)).unwrap())
    });
}

fn benchmark_predict_proba(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_proba");

    for size in [100usize, 1_000] {
        let (rows, labels) = training_rows(size);
        let pipeline = AdoptionPipeline::fit(&rows, &labels, &LogisticRegressionConfig::default())
            .expect("fit benchmark pipeline");
        let query = rows[size / 2].clone();

        group.bench_with_input(BenchmarkId::new("trained_on", size), &query, |b, query| {
            b.iter(|| pipeline.predict_proba(black_box(query)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_extract_features, benchmark_predict_proba);
criterion_main!(benches);
