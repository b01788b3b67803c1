//! Load input decks from CSV
//!
//! The withdrawal schedule and the rider list arrive as small CSV files;
//! both feed the sample workbook's input tables.

use crate::engine::CellValue;
use crate::schedule::WithdrawalRecord;
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// One rider row of the input deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderRecord {
    pub code: String,
    pub sum_assured: f64,
    pub term_years: u32,
    pub rate_per_mille: f64,
}

impl RiderRecord {
    /// Render the record as an input-table row
    pub fn to_row(&self) -> Vec<CellValue> {
        vec![
            self.code.as_str().into(),
            self.sum_assured.into(),
            self.term_years.into(),
            self.rate_per_mille.into(),
        ]
    }
}

/// Load withdrawal year-range records from a CSV file
/// Expected columns: start_year, end_year, amount
pub fn load_withdrawals<P: AsRef<Path>>(path: P) -> Result<Vec<WithdrawalRecord>, Box<dyn Error>> {
    load_withdrawals_from_reader(std::fs::File::open(path)?)
}

/// Load withdrawal records from any reader
pub fn load_withdrawals_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<WithdrawalRecord>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: WithdrawalRecord = result?;
        records.push(record);
    }

    Ok(records)
}

/// Load rider records from a CSV file
/// Expected columns: code, sum_assured, term_years, rate_per_mille
pub fn load_riders<P: AsRef<Path>>(path: P) -> Result<Vec<RiderRecord>, Box<dyn Error>> {
    load_riders_from_reader(std::fs::File::open(path)?)
}

/// Load rider records from any reader
pub fn load_riders_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<RiderRecord>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: RiderRecord = result?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_withdrawals() {
        let csv = "start_year,end_year,amount\n2,4,500\n7,7,1500\n";
        let records = load_withdrawals_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            WithdrawalRecord {
                start_year: 2,
                end_year: 4,
                amount: 500.0
            }
        );
    }

    #[test]
    fn test_load_riders() {
        let csv = "code,sum_assured,term_years,rate_per_mille\n\
                   ADB01,50000,10,1.2\n\
                   WOP01,12000,20,2.0\n";
        let records = load_riders_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].code, "WOP01");
        assert_eq!(records[1].term_years, 20);
    }

    #[test]
    fn test_malformed_deck_is_an_error() {
        let csv = "start_year,end_year,amount\ntwo,4,500\n";
        assert!(load_withdrawals_from_reader(csv.as_bytes()).is_err());
    }
}
