// ⚖️ Accuracy & Fairness Metrics

use crate::error::{AuditError, Result};

/// Four-fifths rule
pub const DEFAULT_FAIRNESS_THRESHOLD: f64 = 0.8;

/// Share of predictions equal to the truth; both slices have the same length
pub fn accuracy(truth: &[u8], predicted: &[u8]) -> Result<f64> {
    debug_assert_eq!(truth.len(), predicted.len());
    if truth.is_empty() {
        return Err(AuditError::EmptyDataset);
    }
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / truth.len() as f64)
}

/// Mean of 0/1 predictions; an empty group has rate 0
pub fn positive_rate(predictions: &[u8]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let positives = predictions.iter().filter(|&&p| p == 1).count();
    positives as f64 / predictions.len() as f64
}

/// Unprivileged rate over privileged rate, 0 when the privileged rate is 0
pub fn disparate_impact(unprivileged_rate: f64, privileged_rate: f64) -> f64 {
    if privileged_rate > 0.0 {
        unprivileged_rate / privileged_rate
    } else {
        0.0
    }
}

pub fn is_fair(ratio: f64, threshold: f64) -> bool {
    ratio >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[1, 0, 1, 1], &[1, 0, 0, 1]).unwrap(), 0.75);
        assert_eq!(accuracy(&[0, 0], &[0, 0]).unwrap(), 1.0);
        assert!(accuracy(&[], &[]).is_err());
    }

    #[test]
    fn test_positive_rate() {
        assert_eq!(positive_rate(&[1, 0, 0, 1]), 0.5);
        assert_eq!(positive_rate(&[0, 0, 0]), 0.0);
        assert_eq!(positive_rate(&[]), 0.0);
    }

    #[test]
    fn test_disparate_impact_ratio() {
        assert_eq!(disparate_impact(0.1, 0.4), 0.25);
        assert_eq!(disparate_impact(0.3, 0.3), 1.0);
        // Unprivileged group can be favoured
        assert_eq!(disparate_impact(0.5, 0.25), 2.0);
    }

    #[test]
    fn test_disparate_impact_zero_privileged_rate() {
        assert_eq!(disparate_impact(0.3, 0.0), 0.0);
        assert_eq!(disparate_impact(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(is_fair(0.8, DEFAULT_FAIRNESS_THRESHOLD));
        assert!(is_fair(1.3, DEFAULT_FAIRNESS_THRESHOLD));
        assert!(!is_fair(0.79, DEFAULT_FAIRNESS_THRESHOLD));
        assert!(!is_fair(0.0, DEFAULT_FAIRNESS_THRESHOLD));
    }
}
