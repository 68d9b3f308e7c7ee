// ✂️ Train/Test Split
// Stratified on the label so both sides keep the class balance

use crate::error::{AuditError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Each class gives `round(test_size * class_count)` rows to the test set.
/// Same seed, same split. `test_size` must lie strictly between 0 and 1.
pub fn stratified_split(labels: &[u8], test_size: f64, seed: u64) -> Result<Split> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(AuditError::Config(format!(
            "test_size must be between 0 and 1, got {}",
            test_size
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [0u8, 1u8] {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == class)
            .map(|(i, _)| i)
            .collect();
        indices.shuffle(&mut rng);

        let n_test = (test_size * indices.len() as f64).round() as usize;
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    if train.is_empty() || test.is_empty() {
        return Err(AuditError::SplitTooSmall { rows: labels.len() });
    }

    // Interleave the classes again
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(Split { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<u8> {
        // 80 negatives, 20 positives
        (0..100).map(|i| u8::from(i % 5 == 0)).collect()
    }

    #[test]
    fn test_sizes_and_stratification() {
        let labels = labels();
        let split = stratified_split(&labels, 0.2, 42).unwrap();

        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);

        let test_positives = split.test.iter().filter(|&&i| labels[i] == 1).count();
        let train_positives = split.train.iter().filter(|&&i| labels[i] == 1).count();
        assert_eq!(test_positives, 4);
        assert_eq!(train_positives, 16);
    }

    #[test]
    fn test_partition_covers_every_row_once() {
        let labels = labels();
        let split = stratified_split(&labels, 0.2, 7).unwrap();

        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let labels = labels();
        let a = stratified_split(&labels, 0.2, 42).unwrap();
        let b = stratified_split(&labels, 0.2, 42).unwrap();
        let c = stratified_split(&labels, 0.2, 43).unwrap();

        assert_eq!(a, b);
        assert_ne!(a.test, c.test);
    }

    #[test]
    fn test_test_size_out_of_range() {
        let labels = labels();
        for test_size in [1.5, 1.0, 0.0, -0.2, f64::NAN] {
            let result = stratified_split(&labels, test_size, 42);
            assert!(matches!(result, Err(AuditError::Config(_))));
        }
    }

    #[test]
    fn test_too_small() {
        let result = stratified_split(&[0, 1], 0.2, 42);
        assert!(matches!(result, Err(AuditError::SplitTooSmall { rows: 2 })));
    }
}
