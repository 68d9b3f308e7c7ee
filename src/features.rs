// 🧮 Feature Encoding
// Numeric columns as-is, categorical columns one-hot with the first level dropped

use crate::dataset::Frame;
use crate::error::{AuditError, Result};
use std::collections::BTreeSet;

/// Dense design matrix, one row per frame row
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy out the given rows, in the given order
    pub fn select(&self, indices: &[usize]) -> Vec<Vec<f64>> {
        indices.iter().map(|&i| self.rows[i].clone()).collect()
    }
}

enum Encoder {
    Numeric(Vec<f64>),
    /// Cells plus the kept levels (sorted, first level dropped)
    OneHot { cells: Vec<String>, levels: Vec<String> },
}

/// Encode every column except `target`
pub fn encode(frame: &Frame, target: &str) -> Result<FeatureMatrix> {
    if frame.is_empty() {
        return Err(AuditError::EmptyDataset);
    }
    if !frame.has_column(target) {
        return Err(AuditError::UnknownColumn(target.to_string()));
    }

    let mut numeric = Vec::new();
    let mut categorical = Vec::new();

    for name in frame.columns().iter().filter(|c| c.as_str() != target) {
        let cells = frame.column(name)?;
        if frame.is_numeric(name)? {
            let values = cells
                .iter()
                .map(|c| c.trim().parse::<f64>().unwrap_or(0.0))
                .collect();
            numeric.push((name.clone(), Encoder::Numeric(values)));
        } else {
            let levels: BTreeSet<&str> = cells.iter().copied().collect();
            let levels: Vec<String> = levels.into_iter().skip(1).map(|l| l.to_string()).collect();
            let cells: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
            categorical.push((name.clone(), Encoder::OneHot { cells, levels }));
        }
    }

    let mut names = Vec::new();
    for (name, encoder) in numeric.iter().chain(categorical.iter()) {
        match encoder {
            Encoder::Numeric(_) => names.push(name.clone()),
            Encoder::OneHot { levels, .. } => {
                names.extend(levels.iter().map(|l| format!("{}_{}", name, l)))
            }
        }
    }

    let mut rows = Vec::with_capacity(frame.len());
    for i in 0..frame.len() {
        let mut row = Vec::with_capacity(names.len());
        for (_, encoder) in numeric.iter().chain(categorical.iter()) {
            match encoder {
                Encoder::Numeric(values) => row.push(values[i]),
                Encoder::OneHot { cells, levels } => {
                    row.extend(levels.iter().map(|l| if &cells[i] == l { 1.0 } else { 0.0 }))
                }
            }
        }
        rows.push(row);
    }

    Ok(FeatureMatrix { names, rows })
}
