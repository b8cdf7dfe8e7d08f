use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::{CustomerId, CustomerProfile, CustomerStatus, Repayment};

/// Errors raised while loading customer profiles from a CSV export.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read customer export: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: invalid repayment mark '{mark}' (expected 0 or 1)")]
    InvalidRepaymentMark { row: usize, mark: char },
    #[error("row {row}: unknown status '{value}'")]
    UnknownStatus { row: usize, value: String },
}

/// Parse a customer export with the headers
/// `customer_id,name,monthly_income,outstanding_loans,credit_score,repayment_history,status`.
///
/// Out-of-range financial values are kept as-is; rejecting them is the scorer's job.
pub fn parse_profiles<R: Read>(reader: R) -> Result<Vec<CustomerProfile>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut profiles = Vec::new();

    for (index, record) in csv_reader.deserialize::<CustomerRow>().enumerate() {
        let row = record?;
        profiles.push(row.into_profile(index + 1)?);
    }

    Ok(profiles)
}

#[derive(Debug, Deserialize)]
struct CustomerRow {
    customer_id: String,
    #[serde(default)]
    name: String,
    monthly_income: f64,
    outstanding_loans: f64,
    credit_score: i32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    repayment_history: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

impl CustomerRow {
    fn into_profile(self, row: usize) -> Result<CustomerProfile, ImportError> {
        let loan_repayment_history = match self.repayment_history.as_deref() {
            Some(raw) => parse_history(raw, row)?,
            None => Vec::new(),
        };

        let status = match self.status {
            Some(value) => CustomerStatus::from_label(&value)
                .ok_or(ImportError::UnknownStatus { row, value })?,
            None => CustomerStatus::Review,
        };

        Ok(CustomerProfile {
            customer_id: CustomerId(self.customer_id),
            name: self.name,
            monthly_income: self.monthly_income,
            outstanding_loans: self.outstanding_loans,
            credit_score: self.credit_score,
            loan_repayment_history,
            status,
        })
    }
}

fn parse_history(raw: &str, row: usize) -> Result<Vec<Repayment>, ImportError> {
    raw.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != ';' && *ch != ',')
        .map(|mark| match mark {
            '1' => Ok(Repayment::Paid),
            '0' => Ok(Repayment::Missed),
            _ => Err(ImportError::InvalidRepaymentMark { row, mark }),
        })
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
