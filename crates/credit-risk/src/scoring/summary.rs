use serde::Serialize;

use super::level::RiskLevel;
use super::validation::ValidationError;
use super::RiskScore;
use crate::customers::CustomerId;

/// Portfolio-level rollup of a batch of scoring results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    pub high_risk_customers: Vec<CustomerId>,
}

impl PortfolioSummary {
    pub fn from_results(results: &[Result<RiskScore, ValidationError>]) -> Self {
        let mut summary = PortfolioSummary {
            total: results.len(),
            ..Self::default()
        };
        let mut score_sum: u64 = 0;

        for result in results {
            match result {
                Ok(score) => {
                    score_sum += u64::from(score.score);
                    match score.level {
                        RiskLevel::Low => summary.low += 1,
                        RiskLevel::Medium => summary.medium += 1,
                        RiskLevel::High => {
                            summary.high += 1;
                            summary.high_risk_customers.push(score.customer_id.clone());
                        }
                    }
                }
                Err(_) => summary.failed += 1,
            }
        }

        let scored = summary.scored();
        if scored > 0 {
            summary.average_score = Some(score_sum as f64 / scored as f64);
        }

        summary
    }

    pub fn scored(&self) -> usize {
        self.low + self.medium + self.high
    }
}
