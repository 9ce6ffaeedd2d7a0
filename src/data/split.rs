//! Seeded train/test split

use crate::error::{Result, SentimentError};
use crate::models::Record;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Index split into train and test partitions
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

impl TrainTestSplit {
    /// Shuffle `0..n_samples` with `seed` and hold out `ceil(n * test_ratio)`
    /// samples, keeping at least one on each side.
    pub fn new(n_samples: usize, test_ratio: f64, seed: u64) -> Result<Self> {
        if !(test_ratio > 0.0 && test_ratio < 1.0) {
            return Err(SentimentError::Config(format!(
                "test ratio must be in (0, 1), got {}",
                test_ratio
            )));
        }
        if n_samples < 2 {
            return Err(SentimentError::EmptyDataset(format!(
                "need at least 2 records to split, got {}",
                n_samples
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let test_size = ((n_samples as f64 * test_ratio).ceil() as usize).clamp(1, n_samples - 1);
        let train_indices = indices.split_off(test_size);

        Ok(Self {
            train_indices,
            test_indices: indices,
        })
    }

    /// Materialize the split over `records`
    pub fn apply<T: Clone>(&self, records: &[T]) -> (Vec<T>, Vec<T>) {
        let pick = |idx: &[usize]| -> Vec<T> {
            idx.iter().filter_map(|&i| records.get(i).cloned()).collect()
        };
        (pick(&self.train_indices[..]), pick(&self.test_indices[..]))
    }
}

/// Split records into (train, test)
pub fn train_test_split(
    records: &[Record],
    test_ratio: f64,
    seed: u64,
) -> Result<(Vec<Record>, Vec<Record>)> {
    Ok(TrainTestSplit::new(records.len(), test_ratio, seed)?.apply(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Polarity;
    use std::collections::HashSet;

    #[test]
    fn test_split_sizes() {
        let split = TrainTestSplit::new(10, 0.2, 42).unwrap();
        assert_eq!(split.test_indices.len(), 2);
        assert_eq!(split.train_indices.len(), 8);

        // ceil(11 * 0.2) = 3
        let split = TrainTestSplit::new(11, 0.2, 42).unwrap();
        assert_eq!(split.test_indices.len(), 3);
    }

    #[test]
    fn test_split_is_partition() {
        let split = TrainTestSplit::new(50, 0.3, 7).unwrap();
        let all: HashSet<usize> = split
            .train_indices
            .iter()
            .chain(split.test_indices.iter())
            .copied()
            .collect();
        assert_eq!(all.len(), 50);
    }

    #[test]
    fn test_split_determinism() {
        let a = TrainTestSplit::new(100, 0.2, 42).unwrap();
        let b = TrainTestSplit::new(100, 0.2, 42).unwrap();
        let c = TrainTestSplit::new(100, 0.2, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_split_keeps_both_sides() {
        let split = TrainTestSplit::new(2, 0.9, 1).unwrap();
        assert_eq!(split.train_indices.len(), 1);
        assert_eq!(split.test_indices.len(), 1);

        assert!(TrainTestSplit::new(1, 0.2, 1).is_err());
        assert!(TrainTestSplit::new(10, 0.0, 1).is_err());
    }

    #[test]
    fn test_train_test_split_records() {
        let records: Vec<Record> = (0..20)
            .map(|i| Record::new(format!("tweet {}", i), Polarity::Positive))
            .collect();

        let (train, test) = train_test_split(&records, 0.2, 42).unwrap();
        assert_eq!(train.len(), 16);
        assert_eq!(test.len(), 4);
        assert!(test.iter().all(|r| !train.contains(r)));
    }
}
