use crate::infra::{InMemoryCustomerStore, TracingAlertSink};
use chrono::Local;
use clap::Args;
use credit_risk::config::AppConfig;
use credit_risk::customers::{
    parse_profiles, CustomerId, CustomerProfile, CustomerStatus, Repayment,
};
use credit_risk::error::AppError;
use credit_risk::scoring::{PortfolioSummary, RiskScore, RiskScorer, ValidationError};
use credit_risk::workflow::{WorkflowCoordinator, WorkflowError};
use serde_json::json;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV export with one customer profile per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Override the configured loan repayment period for this run
    #[arg(long)]
    pub(crate) loan_period_months: Option<u32>,
    /// Emit results and summary as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Notes attached to every approval in the demo run
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        csv,
        loan_period_months,
        json,
    } = args;

    let config = AppConfig::load()?;
    let scorer = RiskScorer::new(config.risk);
    let months = loan_period_months.unwrap_or(config.risk.loan_period_months);

    let profiles = parse_profiles(File::open(&csv)?)?;
    let results: Vec<_> = profiles
        .iter()
        .map(|profile| scorer.score_with_period(profile, months))
        .collect();
    let summary = PortfolioSummary::from_results(&results);

    if json {
        let rows: Vec<_> = profiles
            .iter()
            .zip(&results)
            .map(|(profile, result)| match result {
                Ok(risk) => json!({ "customer_id": profile.customer_id, "risk": risk }),
                Err(err) => json!({ "customer_id": profile.customer_id, "error": err.to_string() }),
            })
            .collect();
        let payload = json!({
            "loan_period_months": months,
            "results": rows,
            "summary": summary,
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => return Err(AppError::Io(err.into())),
        }
        return Ok(());
    }

    println!(
        "Scored {} customers from {} ({} month loan period)",
        profiles.len(),
        csv.display(),
        months
    );
    for (profile, result) in profiles.iter().zip(&results) {
        render_result(&profile.customer_id, result);
    }
    render_summary(&summary);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let notes = args
        .notes
        .unwrap_or_else(|| "credit committee demo".to_string());

    let portfolio = sample_portfolio();
    let sink = Arc::new(TracingAlertSink::default());
    let coordinator = WorkflowCoordinator::new(
        Arc::new(InMemoryCustomerStore::with_profiles(portfolio.clone())),
        sink.clone(),
        RiskScorer::default(),
        Default::default(),
    );

    println!(
        "Credit risk workflow demo ({})",
        Local::now().format("%Y-%m-%d %H:%M")
    );

    let scored = coordinator.score_portfolio()?;
    println!("\nPortfolio before decisions");
    for (profile, result) in portfolio.iter().zip(&scored.results) {
        render_result(&profile.customer_id, result);
    }
    render_summary(&scored.summary);

    println!("\nApproving every customer");
    for profile in &portfolio {
        match coordinator
            .transition(profile, CustomerStatus::Approved, Some(notes.clone()))
            .await
        {
            Ok(updated) => println!("- {}: {}", updated.customer_id, updated.status),
            Err(err @ WorkflowError::ScoringFailed { .. }) => {
                println!("- {}: left in {} ({err})", profile.customer_id, profile.status)
            }
            Err(err) => return Err(err.into()),
        }
    }

    let alerts = sink.delivered();
    println!("\nHigh-risk alerts raised: {}", alerts.len());
    for alert in alerts {
        println!(
            "- {} scored {} ({}) at {}",
            alert.customer_id,
            alert.score,
            alert.level,
            alert.raised_at.format("%H:%M:%S")
        );
    }

    Ok(())
}

fn render_result(customer_id: &CustomerId, result: &Result<RiskScore, ValidationError>) {
    match result {
        Ok(risk) => println!("- {customer_id}: {}", risk.summary()),
        Err(err) => println!("- {customer_id}: not scored ({err})"),
    }
}

fn render_summary(summary: &PortfolioSummary) {
    println!(
        "Summary: {} low | {} medium | {} high | {} failed",
        summary.low, summary.medium, summary.high, summary.failed
    );
    if let Some(average) = summary.average_score {
        println!("Average score {average:.1}");
    }
    if !summary.high_risk_customers.is_empty() {
        let ids: Vec<_> = summary
            .high_risk_customers
            .iter()
            .map(CustomerId::as_str)
            .collect();
        println!("High risk: {}", ids.join(", "));
    }
}

/// Seed book covering every risk band plus one profile that cannot be scored.
pub(crate) fn sample_portfolio() -> Vec<CustomerProfile> {
    use Repayment::{Missed, Paid};

    let profile = |id: &str,
                   name: &str,
                   income: f64,
                   loans: f64,
                   credit_score: i32,
                   history: Vec<Repayment>| CustomerProfile {
        customer_id: CustomerId::from(id),
        name: name.to_string(),
        monthly_income: income,
        outstanding_loans: loans,
        credit_score,
        loan_repayment_history: history,
        status: CustomerStatus::Review,
    };

    vec![
        profile(
            "cust-001",
            "Ada Reyes",
            4000.0,
            24000.0,
            620,
            vec![Paid, Paid, Missed, Paid, Paid, Paid],
        ),
        profile(
            "cust-002",
            "Bo Lind",
            2000.0,
            60000.0,
            350,
            vec![Missed, Missed, Paid],
        ),
        profile("cust-003", "Cy Okafor", 9000.0, 1200.0, 820, vec![Paid; 4]),
        profile("cust-004", "Di Novak", 0.0, 5000.0, 700, vec![Paid]),
        profile("cust-005", "Ed Park", 5200.0, 0.0, 780, Vec::new()),
    ]
}
