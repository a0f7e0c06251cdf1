//! Seeded train/test partitioning

use rand::prelude::*;
use shelter_core::{Error, Result};

/// Row indices of each partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded generator and hold out `ceil(n * test_ratio)`
/// rows for testing.
///
/// The same `(n, test_ratio, seed)` always yields the same partition.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Result<Split> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(Error::config(format!(
            "test_ratio must be in (0, 1), got {}",
            test_ratio
        )));
    }

    let n_test = (n as f64 * test_ratio).ceil() as usize;
    if n_test >= n {
        return Err(Error::training(format!(
            "{} rows leave nothing to train on at test_ratio {}",
            n, test_ratio
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let train = indices.split_off(n_test);
    Ok(Split {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        let split = train_test_split(10, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        // Rounds the test share up
        let split = train_test_split(11, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn test_partitions_cover_every_row_once() {
        let split = train_test_split(50, 0.2, 7).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_determinism() {
        let a = train_test_split(100, 0.2, 42).unwrap();
        let b = train_test_split(100, 0.2, 42).unwrap();
        let c = train_test_split(100, 0.2, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_too_few_rows() {
        assert!(matches!(
            train_test_split(1, 0.2, 42),
            Err(Error::Training(_))
        ));
        assert!(matches!(
            train_test_split(0, 0.2, 42),
            Err(Error::Training(_))
        ));
    }

    #[test]
    fn test_bad_ratio() {
        assert!(matches!(train_test_split(10, 0.0, 42), Err(Error::Config(_))));
        assert!(matches!(train_test_split(10, 1.5, 42), Err(Error::Config(_))));
    }
}
