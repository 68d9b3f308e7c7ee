// 📊 Census Dataset
// Typed record for the cleaned file + a generic frame for the audit pipeline

use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Column order of both the raw UCI file and the cleaned CSV
pub const COLUMN_NAMES: [&str; 15] = [
    "age",
    "workclass",
    "fnlwgt",
    "education",
    "education-num",
    "marital-status",
    "occupation",
    "relationship",
    "race",
    "gender",
    "capital-gain",
    "capital-loss",
    "hours-per-week",
    "native-country",
    "income",
];

// ============================================================================
// CENSUS RECORD
// ============================================================================

/// One cleaned census row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CensusRecord {
    pub age: u32,
    pub workclass: String,
    pub fnlwgt: u64,
    pub education: String,
    pub education_num: u32,
    pub marital_status: String,
    pub occupation: String,
    pub relationship: String,
    pub race: String,
    pub gender: String,
    pub capital_gain: u64,
    pub capital_loss: u64,
    pub hours_per_week: u32,
    pub native_country: String,

    /// 1 when income is above 50K, else 0
    pub income: u8,
}

// ============================================================================
// FRAME
// ============================================================================

/// Column-named table of string cells, loaded fresh per audit
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Frame { columns, rows }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AuditError::DatasetMissing(path.to_path_buf()));
        }
        let rdr = csv::Reader::from_path(path)?;
        Self::from_csv(rdr)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut rdr: csv::Reader<R>) -> Result<Self> {
        let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Frame { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| AuditError::UnknownColumn(name.to_string()))
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.index_of(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// A column is numeric when every cell parses as a float
    pub fn is_numeric(&self, name: &str) -> Result<bool> {
        let cells = self.column(name)?;
        Ok(!cells.is_empty() && cells.iter().all(|c| c.trim().parse::<f64>().is_ok()))
    }

    /// Distinct values in order of first appearance
    pub fn unique(&self, name: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for cell in self.column(name)? {
            if seen.insert(cell) {
                values.push(cell.to_string());
            }
        }
        Ok(values)
    }

    /// Parse the binary target column
    pub fn labels(&self, target: &str) -> Result<Vec<u8>> {
        self.column(target)?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| match cell.trim().parse::<f64>() {
                Ok(v) if v == 0.0 => Ok(0),
                Ok(v) if v == 1.0 => Ok(1),
                _ => Err(AuditError::InvalidLabel {
                    row,
                    value: cell.to_string(),
                }),
            })
            .collect()
    }
}

/// Read only the header and keep the candidates the file actually has
pub fn auditable_columns(path: &Path, candidates: &[String]) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(AuditError::DatasetMissing(path.to_path_buf()));
    }
    let mut rdr = csv::Reader::from_path(path)?;
    let headers = rdr.headers()?;

    Ok(candidates
        .iter()
        .filter(|c| headers.iter().any(|h| h == c.as_str()))
        .cloned()
        .collect())
}
