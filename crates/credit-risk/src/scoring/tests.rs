use super::*;
use crate::customers::{CustomerId, CustomerProfile, CustomerStatus, Repayment};

fn profile(credit_score: i32, income: f64, loans: f64, history: &[u8]) -> CustomerProfile {
    CustomerProfile {
        customer_id: CustomerId::from("cust-001"),
        name: "Test Borrower".to_string(),
        monthly_income: income,
        outstanding_loans: loans,
        credit_score,
        loan_repayment_history: history
            .iter()
            .map(|mark| Repayment::try_from(*mark).expect("binary mark"))
            .collect(),
        status: CustomerStatus::Review,
    }
}

fn scorer() -> RiskScorer {
    RiskScorer::default()
}

#[test]
fn reference_scenario_scores_medium() {
    let outcome = scorer()
        .score(&profile(620, 4000.0, 24000.0, &[1, 1, 0, 1, 1, 1]))
        .expect("valid profile");

    assert_eq!(outcome.factors.credit_score_impact, 17);
    assert_eq!(outcome.factors.repayment_history_impact, 5);
    assert_eq!(outcome.factors.loan_to_income_ratio_impact, 15);
    assert_eq!(outcome.score, 37);
    assert_eq!(outcome.level, RiskLevel::Medium);
    assert_eq!(outcome.customer_id, CustomerId::from("cust-001"));
}

#[test]
fn credit_score_endpoints_map_to_weight_bounds() {
    let best = scorer()
        .score(&profile(850, 4000.0, 0.0, &[1]))
        .expect("valid");
    let worst = scorer()
        .score(&profile(300, 4000.0, 0.0, &[1]))
        .expect("valid");

    assert_eq!(best.factors.credit_score_impact, 0);
    assert_eq!(worst.factors.credit_score_impact, 40);
}

#[test]
fn empty_history_is_neutral() {
    let outcome = scorer()
        .score(&profile(850, 4000.0, 0.0, &[]))
        .expect("valid");

    assert_eq!(outcome.factors.repayment_history_impact, 15);
    assert_eq!(outcome.score, 15);
}

#[test]
fn history_extremes_map_to_zero_and_full_weight() {
    let missed = scorer()
        .score(&profile(850, 4000.0, 0.0, &[0, 0, 0, 0, 0, 0]))
        .expect("valid");
    let paid = scorer()
        .score(&profile(850, 4000.0, 0.0, &[1, 1, 1, 1, 1, 1]))
        .expect("valid");

    assert_eq!(missed.factors.repayment_history_impact, 30);
    assert_eq!(paid.factors.repayment_history_impact, 0);
}

#[test]
fn zero_income_is_a_division_error() {
    let error = scorer()
        .score(&profile(700, 0.0, 1000.0, &[1]))
        .expect_err("zero income must fail");

    assert!(error.is_division_by_zero());
    assert_eq!(error.customer_id(), &CustomerId::from("cust-001"));
}

#[test]
fn zero_income_fails_even_without_loans() {
    let error = scorer()
        .score(&profile(700, 0.0, 0.0, &[]))
        .expect_err("zero income must fail");

    assert!(matches!(error, ValidationError::DivisionByZero { .. }));
}

#[test]
fn out_of_range_inputs_name_the_field() {
    let cases = [
        (profile(299, 4000.0, 0.0, &[]), ProfileField::CreditScore),
        (profile(851, 4000.0, 0.0, &[]), ProfileField::CreditScore),
        (profile(700, -1.0, 0.0, &[]), ProfileField::MonthlyIncome),
        (profile(700, f64::NAN, 0.0, &[]), ProfileField::MonthlyIncome),
        (profile(700, 4000.0, -5.0, &[]), ProfileField::OutstandingLoans),
        (
            profile(700, 4000.0, f64::INFINITY, &[]),
            ProfileField::OutstandingLoans,
        ),
    ];

    for (input, expected_field) in cases {
        match scorer().score(&input) {
            Err(ValidationError::OutOfRange { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected {expected_field} violation, got {other:?}"),
        }
    }
}

#[test]
fn zero_loan_period_is_rejected() {
    match scorer().score_with_period(&profile(700, 4000.0, 1000.0, &[1]), 0) {
        Err(ValidationError::OutOfRange { field, .. }) => {
            assert_eq!(field, ProfileField::LoanPeriodMonths)
        }
        other => panic!("expected loan period violation, got {other:?}"),
    }
}

#[test]
fn validation_messages_carry_customer_and_range() {
    let error = scorer()
        .score(&profile(900, 4000.0, 0.0, &[]))
        .expect_err("credit score above range");

    let message = error.to_string();
    assert!(message.contains("cust-001"));
    assert!(message.contains("credit_score"));
    assert!(message.contains("[300, 850]"));
}

#[test]
fn scores_and_factors_stay_within_bounds() {
    let histories: [&[u8]; 4] = [&[], &[1, 1, 1], &[0, 1, 0], &[0, 0, 0, 0]];

    for credit in (300..=850).step_by(55) {
        for income in [1.0, 850.0, 4000.0, 12000.0] {
            for loans in [0.0, 5000.0, 48000.0, 1_000_000.0] {
                for history in histories {
                    let outcome = scorer()
                        .score(&profile(credit, income, loans, history))
                        .expect("valid profile");

                    assert!(outcome.score <= 100);
                    assert!(outcome.factors.credit_score_impact <= 40);
                    assert!(outcome.factors.repayment_history_impact <= 30);
                    assert!(outcome.factors.loan_to_income_ratio_impact <= 30);
                    assert!(
                        (i32::from(outcome.score) - i32::from(outcome.factors.sum())).abs() <= 1
                    );
                    assert_eq!(outcome.level, RiskLevel::from_score(outcome.score));
                }
            }
        }
    }
}

#[test]
fn higher_loans_never_lower_the_loan_impact() {
    let mut previous = 0;
    for step in 0..=40 {
        let loans = f64::from(step) * 2500.0;
        let outcome = scorer()
            .score(&profile(700, 4000.0, loans, &[1, 0]))
            .expect("valid");

        assert!(outcome.factors.loan_to_income_ratio_impact >= previous);
        previous = outcome.factors.loan_to_income_ratio_impact;
    }
    assert_eq!(previous, 30);
}

#[test]
fn loan_period_and_ceiling_follow_policy() {
    let input = profile(850, 4000.0, 24000.0, &[1]);

    let twelve_months = scorer()
        .score_with_period(&input, 12)
        .expect("valid");
    assert_eq!(twelve_months.factors.loan_to_income_ratio_impact, 30);

    let lenient = RiskScorer::new(RiskPolicy {
        loan_period_months: 24,
        loan_to_income_ceiling: 1.0,
    });
    let outcome = lenient.score(&input).expect("valid");
    assert!((7..=8).contains(&outcome.factors.loan_to_income_ratio_impact));
}

#[test]
fn high_risk_profile_classifies_high() {
    let outcome = scorer()
        .score(&profile(350, 2000.0, 60000.0, &[0, 0, 1]))
        .expect("valid");

    assert!(outcome.is_high());
    assert!(outcome.score >= HIGH_RISK_FLOOR);
}

#[test]
fn scoring_is_deterministic() {
    let input = profile(640, 3500.0, 18000.0, &[1, 0, 1, 1]);
    let first = scorer().score(&input).expect("valid");
    let second = scorer().score(&input).expect("valid");
    assert_eq!(first, second);
}

#[test]
fn batch_scoring_isolates_failures_and_preserves_order() {
    let mut broken = profile(700, 0.0, 100.0, &[]);
    broken.customer_id = CustomerId::from("cust-broken");
    let mut strong = profile(820, 9000.0, 0.0, &[1, 1, 1]);
    strong.customer_id = CustomerId::from("cust-strong");
    let mut weak = profile(320, 1500.0, 40000.0, &[0, 0, 0]);
    weak.customer_id = CustomerId::from("cust-weak");

    let results = scorer().score_all(&[strong, broken, weak]);

    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().expect("scored").customer_id,
        CustomerId::from("cust-strong")
    );
    assert!(results[1]
        .as_ref()
        .expect_err("zero income")
        .is_division_by_zero());
    assert_eq!(results[2].as_ref().expect("scored").level, RiskLevel::High);

    let summary = PortfolioSummary::from_results(&results);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.scored(), 2);
    assert_eq!(summary.high, 1);
    assert_eq!(summary.high_risk_customers, vec![CustomerId::from("cust-weak")]);
    assert!(summary.average_score.is_some());
}

#[test]
fn empty_portfolio_has_no_average() {
    let summary = PortfolioSummary::from_results(&[]);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.average_score, None);
}

#[test]
fn summary_mentions_every_factor() {
    let outcome = scorer()
        .score(&profile(620, 4000.0, 24000.0, &[1, 1, 0, 1, 1, 1]))
        .expect("valid");

    assert_eq!(
        outcome.summary(),
        "score 37 (medium): credit 17, repayment 5, loan-to-income 15"
    );
}
