//! Loading the prepared company table from CSV.
//!
//! Expected headers: `Company`, `Beta`, `Expected return`, `ESG score`,
//! `Dividend yield`, `P/E`, `Clean200`, `ScienceBasedTargets`. Other columns
//! (for example a leading index column) are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::company::{Company, CompanyTable};
use crate::error::{PortfolioError, Result};

/// Options for [`read_csv`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Skip rows with missing or non-finite values, or a negative P/E,
    /// instead of rejecting the whole table.
    pub drop_incomplete: bool,
}

#[derive(Debug, Deserialize)]
struct CompanyRow {
    #[serde(rename = "Company")]
    company: String,
    #[serde(rename = "Beta")]
    beta: Option<f64>,
    #[serde(rename = "Expected return")]
    expected_return: Option<f64>,
    #[serde(rename = "ESG score")]
    esg_score: Option<f64>,
    #[serde(rename = "Dividend yield")]
    dividend_yield: Option<f64>,
    #[serde(rename = "P/E")]
    pe: Option<f64>,
    #[serde(rename = "Clean200")]
    clean200: String,
    #[serde(rename = "ScienceBasedTargets")]
    science_based_targets: String,
}

impl CompanyRow {
    fn into_company(self) -> std::result::Result<Company, String> {
        let name = self.company.trim().to_string();
        let field = |value: Option<f64>, column: &str| {
            value.ok_or_else(|| format!("{}: missing {}", name, column))
        };

        let company = Company {
            beta: field(self.beta, "Beta")?,
            expected_return: field(self.expected_return, "Expected return")?,
            sustainability: field(self.esg_score, "ESG score")?,
            dividend_yield: field(self.dividend_yield, "Dividend yield")?,
            pe_ratio: field(self.pe, "P/E")?,
            clean_energy: Company::clean_energy_score(
                parse_flag(&self.clean200).map_err(|e| format!("{}: Clean200 {}", name, e))?,
                parse_flag(&self.science_based_targets)
                    .map_err(|e| format!("{}: ScienceBasedTargets {}", name, e))?,
            ),
            name,
        };

        match company.defect() {
            None => Ok(company),
            Some(defect) => Err(defect),
        }
    }
}

/// Parse a 0/1 or true/false flag. An empty cell is missing, like an empty
/// numeric cell.
fn parse_flag(raw: &str) -> std::result::Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(true),
        "0" | "0.0" | "false" => Ok(false),
        "" => Err("is missing".into()),
        other => Err(format!("flag must be 0/1 or true/false, got '{}'", other)),
    }
}

/// Read a company table from any CSV source.
pub fn read_csv<R: Read>(reader: R, options: &LoadOptions) -> Result<CompanyTable> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let mut companies = Vec::new();
    let mut dropped = 0usize;

    for (row, record) in rdr.deserialize::<CompanyRow>().enumerate() {
        let record = record.map_err(|e| {
            PortfolioError::InvalidInput(format!("malformed company table: {}", e))
        })?;

        match record.into_company() {
            Ok(company) => companies.push(company),
            Err(reason) if options.drop_incomplete => {
                warn!(row, %reason, "dropping incomplete company row");
                dropped += 1;
            }
            Err(reason) => {
                return Err(PortfolioError::InvalidInput(format!("row {}: {}", row, reason)));
            }
        }
    }

    let table = CompanyTable::new(companies)?;
    info!(companies = table.len(), dropped, "loaded company table");
    Ok(table)
}

/// Read a company table from a CSV file.
pub fn load_csv(path: impl AsRef<Path>, options: &LoadOptions) -> Result<CompanyTable> {
    let file = File::open(path.as_ref())?;
    read_csv(file, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::Objective;
    use tracing_test::traced_test;

    const HEADER: &str =
        ",Company,Beta,Expected return,ESG score,Dividend yield,P/E,Clean200,ScienceBasedTargets\n";

    #[test]
    fn test_reads_rows_and_sums_flags() {
        let data = format!(
            "{}0,Alpha,0.9,0.08,0.7,2.5,14.0,True,True\n1,Beta Corp,1.2,0.12,0.4,1.0,22.0,0,1\n",
            HEADER
        );
        let table = read_csv(data.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.companies()[1].name, "Beta Corp");
        assert_eq!(table.column(Objective::CleanEnergy), vec![2.0, 1.0]);
        assert_eq!(table.column(Objective::Sustainability), vec![0.7, 0.4]);
    }

    #[test]
    fn test_missing_column_is_invalid_input() {
        let data = "Company,Beta,Expected return\nAlpha,1.0,0.1\n";
        let err = read_csv(data.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidInput(_)), "{err}");
    }

    #[test]
    fn test_non_numeric_value_is_invalid_input() {
        let data = format!("{}0,Alpha,high,0.08,0.7,2.5,14.0,0,0\n", HEADER);
        let err = read_csv(data.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidInput(_)));
    }

    #[test]
    fn test_bad_flag_is_invalid_input() {
        let data = format!("{}0,Alpha,1.0,0.08,0.7,2.5,14.0,yes,0\n", HEADER);
        let err = read_csv(data.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Clean200"));
    }

    #[test]
    fn test_empty_flag_is_missing() {
        let data = format!("{}0,Alpha,1.0,0.08,0.7,2.5,14.0,1,\n", HEADER);
        let err = read_csv(data.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidInput(_)));
        assert!(err.to_string().contains("ScienceBasedTargets is missing"), "{err}");
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let err = read_csv(HEADER.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_incomplete_row_rejected_by_default() {
        let data = format!(
            "{}0,Alpha,1.0,0.08,0.7,2.5,,0,0\n1,Gamma,1.0,0.1,0.5,3.0,10.0,0,0\n",
            HEADER
        );
        let err = read_csv(data.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("missing P/E"));
    }

    #[traced_test]
    #[test]
    fn test_incomplete_rows_dropped_with_warning() {
        let data = format!(
            "{}0,Alpha,1.0,0.08,0.7,2.5,,0,0\n1,Loss Co,1.0,0.1,0.5,3.0,-4.0,0,0\n2,Gamma,1.0,0.1,0.5,3.0,10.0,0,0\n3,Delta,1.0,0.1,0.5,3.0,12.0,,1\n",
            HEADER
        );
        let options = LoadOptions {
            drop_incomplete: true,
        };
        let table = read_csv(data.as_bytes(), &options).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.companies()[0].name, "Gamma");
        assert!(logs_contain("dropping incomplete company row"));
    }
}
