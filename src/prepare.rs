// 📥 Data Preparation
// Download the raw UCI Adult file, drop incomplete rows, binarize income

use crate::dataset::{CensusRecord, COLUMN_NAMES};
use crate::error::Result;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Marker the raw file uses for unknown values
pub const MISSING_MARKER: &str = "?";

/// Raw income value that maps to label 1
pub const HIGH_INCOME: &str = ">50K";

#[derive(Debug, Clone, PartialEq)]
pub struct PrepareSummary {
    pub raw_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
    pub output_path: PathBuf,
}

impl PrepareSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} raw rows: {} kept, {} dropped -> {}",
            self.raw_rows,
            self.kept_rows,
            self.dropped_rows,
            self.output_path.display()
        )
    }
}

// ============================================================================
// CLEANING
// ============================================================================

/// Parse the headerless raw file into clean records.
/// Returns the records and the number of raw rows seen.
pub fn clean_raw<R: Read>(reader: R) -> Result<(Vec<CensusRecord>, usize)> {
    // Fields are separated by ", " in the raw file
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut raw_rows = 0;

    for (line_num, result) in rdr.records().enumerate() {
        let record = result?;
        raw_rows += 1;

        match parse_record(&record) {
            Some(r) => records.push(r),
            None => debug!(line = line_num + 1, "dropping incomplete row"),
        }
    }

    Ok((records, raw_rows))
}

fn parse_record(record: &StringRecord) -> Option<CensusRecord> {
    if record.len() != COLUMN_NAMES.len() {
        return None;
    }
    if record.iter().any(|f| f == MISSING_MARKER || f.is_empty()) {
        return None;
    }

    let text = |i: usize| record[i].to_string();

    Some(CensusRecord {
        age: record[0].parse().ok()?,
        workclass: text(1),
        fnlwgt: record[2].parse().ok()?,
        education: text(3),
        education_num: record[4].parse().ok()?,
        marital_status: text(5),
        occupation: text(6),
        relationship: text(7),
        race: text(8),
        gender: text(9),
        capital_gain: record[10].parse().ok()?,
        capital_loss: record[11].parse().ok()?,
        hours_per_week: record[12].parse().ok()?,
        native_country: text(13),
        income: u8::from(&record[14] == HIGH_INCOME),
    })
}

/// Write the cleaned CSV with a header row, creating the directory if needed
pub fn write_clean(records: &[CensusRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Clean an already-downloaded raw file and save it
pub fn prepare_from_reader<R: Read>(reader: R, output: &Path) -> Result<PrepareSummary> {
    let (records, raw_rows) = clean_raw(reader)?;
    write_clean(&records, output)?;

    let summary = PrepareSummary {
        raw_rows,
        kept_rows: records.len(),
        dropped_rows: raw_rows - records.len(),
        output_path: output.to_path_buf(),
    };
    info!(
        raw = summary.raw_rows,
        kept = summary.kept_rows,
        dropped = summary.dropped_rows,
        path = %output.display(),
        "cleaned dataset saved"
    );

    Ok(summary)
}

// ============================================================================
// DOWNLOAD
// ============================================================================

#[cfg(feature = "download")]
pub fn download(url: &str, timeout_secs: u64) -> Result<Vec<u8>> {
    info!(%url, "downloading dataset");

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?;
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;

    debug!(bytes = bytes.len(), "download complete");
    Ok(bytes.to_vec())
}

/// Download, clean and save in one step
#[cfg(feature = "download")]
pub fn setup_data(url: &str, timeout_secs: u64, output: &Path) -> Result<PrepareSummary> {
    let raw = download(url, timeout_secs)?;
    prepare_from_reader(raw.as_slice(), output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Frame;

    const RAW: &str = "\
39, State-gov, 77516, Bachelors, 13, Never-married, Adm-clerical, Not-in-family, White, Male, 2174, 0, 40, United-States, <=50K
52, Self-emp-inc, 287927, HS-grad, 9, Married-civ-spouse, Exec-managerial, Wife, White, Female, 15024, 0, 40, United-States, >50K
54, ?, 180211, Some-college, 10, Married-civ-spouse, ?, Husband, Asian-Pac-Islander, Male, 0, 0, 60, South, >50K
31, Private, 45781, Masters, 14, Never-married, Prof-specialty, Not-in-family, White, Female, 14084, 0, 50, United-States, >50K
30, Private, 12345, Masters

";

    #[test]
    fn test_clean_drops_missing_and_short_rows() {
        let (records, raw_rows) = clean_raw(RAW.as_bytes()).unwrap();

        assert_eq!(raw_rows, 5);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].workclass, "State-gov");
        assert_eq!(records[1].relationship, "Wife");
        assert_eq!(records[2].education_num, 14);
    }

    #[test]
    fn test_income_is_binarized() {
        let (records, _) = clean_raw(RAW.as_bytes()).unwrap();
        let labels: Vec<u8> = records.iter().map(|r| r.income).collect();
        assert_eq!(labels, vec![0, 1, 1]);
    }

    #[test]
    fn test_non_numeric_age_is_dropped() {
        let raw = "abc, Private, 1, HS-grad, 9, Divorced, Sales, Unmarried, White, Female, 0, 0, 40, Cuba, <=50K\n";
        let (records, raw_rows) = clean_raw(raw.as_bytes()).unwrap();
        assert_eq!(raw_rows, 1);
        assert!(records.is_empty());
    }

    #[test]
    fn test_prepare_writes_readable_csv() {
        let dir = std::env::temp_dir().join(format!("prepare-{}", uuid::Uuid::new_v4()));
        let output = dir.join("data").join("adult.csv");

        let summary = prepare_from_reader(RAW.as_bytes(), &output).unwrap();
        assert_eq!(summary.kept_rows, 3);
        assert_eq!(summary.dropped_rows, 2);
        assert!(summary.summary().contains("3 kept"));

        let frame = Frame::load(&output).unwrap();
        assert_eq!(frame.columns().len(), COLUMN_NAMES.len());
        assert_eq!(frame.labels("income").unwrap(), vec![0, 1, 1]);
        assert_eq!(frame.unique("gender").unwrap(), vec!["Male", "Female"]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
