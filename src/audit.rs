// 🔍 Fairness Audit
// Retrain on every call, then compare positive-prediction rates between
// the first two groups of the protected attribute

use crate::config::AuditConfig;
use crate::dataset::Frame;
use crate::error::{AuditError, Result};
use crate::features::encode;
use crate::metrics::{accuracy, disparate_impact, is_fair, positive_rate};
use crate::model::LogisticRegression;
use crate::scaler::StandardScaler;
use crate::split::stratified_split;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};
use uuid::Uuid;

// ============================================================================
// REPORT
// ============================================================================

/// Unformatted numbers behind the display strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    pub accuracy: f64,
    pub privileged_rate: f64,
    pub unprivileged_rate: f64,
    pub disparate_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowCounts {
    pub total: usize,
    pub train: usize,
    pub test: usize,
    pub privileged: usize,
    pub unprivileged: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub audit_id: String,
    pub generated_at: DateTime<Utc>,

    /// Column as it appears in the dataset
    pub attribute_column: String,

    // Display fields
    pub accuracy: String,
    pub protected_attribute: String,
    pub privileged_group: String,
    pub unprivileged_group: String,
    pub privileged_rate: String,
    pub unprivileged_rate: String,
    pub disparate_impact: String,
    pub is_fair: bool,

    pub threshold: f64,
    pub metrics: RawMetrics,
    pub rows: RowCounts,
}

impl AuditReport {
    pub fn summary(&self) -> String {
        format!(
            "{}: {} vs {} -> disparate impact {} ({}), accuracy {}",
            self.protected_attribute,
            self.unprivileged_group,
            self.privileged_group,
            self.disparate_impact,
            if self.is_fair { "fair" } else { "potential bias" },
            self.accuracy
        )
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

/// `0.8512` -> `85.12%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// `marital-status` -> `Marital Status`
pub fn display_name(attribute: &str) -> String {
    let mut out = String::with_capacity(attribute.len());
    let mut prev_alpha = false;

    for ch in attribute.replace('-', " ").chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }

    out
}

// ============================================================================
// AUDIT
// ============================================================================

/// Load the configured dataset and audit `attribute`
pub fn audit_model(config: &AuditConfig, attribute: &str) -> Result<AuditReport> {
    let frame = Frame::load(&config.data_path)?;
    audit_frame(&frame, config, attribute)
}

pub fn audit_frame(frame: &Frame, config: &AuditConfig, attribute: &str) -> Result<AuditReport> {
    let audit_id = Uuid::new_v4().to_string();
    let span = info_span!("audit", id = %audit_id, attribute);
    let _guard = span.enter();

    if !frame.has_column(attribute) {
        return Err(AuditError::UnknownColumn(attribute.to_string()));
    }
    if attribute == config.target_column {
        return Err(AuditError::InvalidAttribute(attribute.to_string()));
    }

    // 1. Features and labels
    let features = encode(frame, &config.target_column)?;
    let labels = frame.labels(&config.target_column)?;
    debug!(rows = features.len(), width = features.width(), "encoded features");

    // 2. Split
    let split = stratified_split(&labels, config.test_size, config.random_state)?;
    let train_x = features.select(&split.train);
    let test_x = features.select(&split.test);
    let train_y: Vec<u8> = split.train.iter().map(|&i| labels[i]).collect();
    let test_y: Vec<u8> = split.test.iter().map(|&i| labels[i]).collect();

    // 3. Scale on training rows only
    let scaler = StandardScaler::fit(&train_x);
    let train_scaled = scaler.transform(&train_x);
    let test_scaled = scaler.transform(&test_x);

    // 4. Train
    let mut model = LogisticRegression::new(config.model.clone());
    model.fit(&train_scaled, &train_y);
    debug!(iterations = model.iterations, "model trained");

    // 5. Accuracy on held-out rows
    let acc = accuracy(&test_y, &model.predict_all(&test_scaled))?;

    // 6. Predict the whole dataset for the fairness check
    let predictions = model.predict_all(&scaler.transform(&features.rows));

    let groups = frame.unique(attribute)?;
    if groups.len() < 2 {
        return Err(AuditError::NotEnoughGroups {
            attribute: attribute.to_string(),
            found: groups.len(),
        });
    }
    let privileged_group = &groups[0];
    let unprivileged_group = &groups[1];

    let column = frame.column(attribute)?;
    let group_predictions = |group: &str| -> Vec<u8> {
        column
            .iter()
            .zip(&predictions)
            .filter(|(value, _)| **value == group)
            .map(|(_, &p)| p)
            .collect()
    };
    let privileged = group_predictions(privileged_group);
    let unprivileged = group_predictions(unprivileged_group);

    // 7. Disparate impact
    let privileged_rate = positive_rate(&privileged);
    let unprivileged_rate = positive_rate(&unprivileged);
    let ratio = disparate_impact(unprivileged_rate, privileged_rate);
    let fair = is_fair(ratio, config.fairness_threshold);

    let report = AuditReport {
        audit_id: audit_id.clone(),
        generated_at: Utc::now(),
        attribute_column: attribute.to_string(),
        accuracy: format_percent(acc),
        protected_attribute: display_name(attribute),
        privileged_group: privileged_group.clone(),
        unprivileged_group: unprivileged_group.clone(),
        privileged_rate: format_percent(privileged_rate),
        unprivileged_rate: format_percent(unprivileged_rate),
        disparate_impact: format!("{:.2}", ratio),
        is_fair: fair,
        threshold: config.fairness_threshold,
        metrics: RawMetrics {
            accuracy: acc,
            privileged_rate,
            unprivileged_rate,
            disparate_impact: ratio,
        },
        rows: RowCounts {
            total: frame.len(),
            train: split.train.len(),
            test: split.test.len(),
            privileged: privileged.len(),
            unprivileged: unprivileged.len(),
        },
    };

    info!(
        accuracy = acc,
        disparate_impact = ratio,
        is_fair = fair,
        "audit complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic census where income follows hours worked,
    /// and group Alpha works far more hours than group Beta
    fn biased_frame() -> Frame {
        let columns = ["hours", "group", "sector", "income"]
            .iter()
            .map(|c| c.to_string())
            .collect();

        let rows = (0..200)
            .map(|i| {
                let alpha = i % 2 == 0;
                let hours = if alpha { 44 + (i % 20) } else { 10 + (i % 20) };
                let income = u8::from(hours >= 46);
                vec![
                    hours.to_string(),
                    if alpha { "Alpha" } else { "Beta" }.to_string(),
                    if i % 3 == 0 { "Private" } else { "Public" }.to_string(),
                    income.to_string(),
                ]
            })
            .collect();

        Frame::new(columns, rows)
    }

    fn config() -> AuditConfig {
        AuditConfig {
            candidate_columns: vec!["group".to_string(), "sector".to_string()],
            ..AuditConfig::default()
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("gender"), "Gender");
        assert_eq!(display_name("marital-status"), "Marital Status");
        assert_eq!(display_name("hours-per-week"), "Hours Per Week");
        assert_eq!(display_name("RACE"), "Race");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.8512), "85.12%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(1.0), "100.00%");
    }

    #[test]
    fn test_biased_groups_fail_the_check() {
        let report = audit_frame(&biased_frame(), &config(), "group").unwrap();

        assert_eq!(report.privileged_group, "Alpha");
        assert_eq!(report.unprivileged_group, "Beta");
        assert_eq!(report.protected_attribute, "Group");
        assert!(report.metrics.privileged_rate > report.metrics.unprivileged_rate);
        assert!(report.metrics.disparate_impact < 0.8);
        assert!(!report.is_fair);
        assert!(report.metrics.accuracy > 0.85);

        assert_eq!(report.rows.total, 200);
        assert_eq!(report.rows.train + report.rows.test, 200);
        assert_eq!(report.rows.privileged, 100);
        assert_eq!(report.rows.unprivileged, 100);
    }

    #[test]
    fn test_report_formatting_matches_metrics() {
        let report = audit_frame(&biased_frame(), &config(), "group").unwrap();

        assert_eq!(report.accuracy, format_percent(report.metrics.accuracy));
        assert_eq!(
            report.disparate_impact,
            format!("{:.2}", report.metrics.disparate_impact)
        );
        assert_eq!(report.threshold, 0.8);
        assert!(report.summary().contains("Group: Beta vs Alpha"));
    }

    #[test]
    fn test_unrelated_attribute_is_close_to_fair() {
        let report = audit_frame(&biased_frame(), &config(), "sector").unwrap();

        // Sector is independent of hours, so rates stay close
        assert!(report.metrics.disparate_impact > 0.5);
        assert_eq!(report.is_fair, report.metrics.disparate_impact >= 0.8);
    }

    #[test]
    fn test_unknown_attribute() {
        let result = audit_frame(&biased_frame(), &config(), "zip");
        assert!(matches!(result, Err(AuditError::UnknownColumn(_))));
    }

    #[test]
    fn test_target_cannot_be_audited() {
        let result = audit_frame(&biased_frame(), &config(), "income");
        assert!(matches!(result, Err(AuditError::InvalidAttribute(_))));
    }

    #[test]
    fn test_single_group_attribute() {
        let columns = vec!["hours".to_string(), "group".to_string(), "income".to_string()];
        let rows = (0..50)
            .map(|i| vec![i.to_string(), "Only".to_string(), u8::from(i >= 25).to_string()])
            .collect();
        let frame = Frame::new(columns, rows);

        let result = audit_frame(&frame, &config(), "group");
        assert!(matches!(
            result,
            Err(AuditError::NotEnoughGroups { found: 1, .. })
        ));
    }

    #[test]
    fn test_unvalidated_test_size_is_an_error() {
        let config = AuditConfig {
            test_size: 1.5,
            ..config()
        };
        let result = audit_frame(&biased_frame(), &config, "group");
        assert!(matches!(result, Err(AuditError::Config(_))));
    }

    #[test]
    fn test_missing_dataset() {
        let config = AuditConfig {
            data_path: "/nowhere/adult.csv".into(),
            ..AuditConfig::default()
        };
        assert!(matches!(
            audit_model(&config, "gender"),
            Err(AuditError::DatasetMissing(_))
        ));
    }
}
