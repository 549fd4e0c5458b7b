use chrono::NaiveDate;
use loan_schedule_core::schedule::{self, fees, grace, GraceUnit, ScheduleRow};
use loan_schedule_core::{
    CustomFee, ErrorCode, FeeType, LoanTerms, RepaymentCycle, RepaymentStructure, ReturnType,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn terms(loan_amount: Decimal, rate: Decimal, period: u32) -> LoanTerms {
    LoanTerms {
        loan_amount,
        interest_rate: rate,
        repayment_period: period,
        repayment_structure: RepaymentStructure::PrincipalAndInterest,
        repayment_cycle: RepaymentCycle::Monthly,
        first_payment_date: date(2024, 2, 1),
        grace_period: Decimal::ZERO,
        return_type: ReturnType::InterestBased,
        custom_fees: Vec::new(),
    }
}

fn principal_sum(rows: &[ScheduleRow]) -> Decimal {
    rows.iter().map(|r| r.principal).sum()
}

// ===========================================================================
// Interest-based, principal and interest
// ===========================================================================

#[test]
fn test_twelve_month_amortization() {
    let output = schedule::calculate_repayment_schedule(&terms(dec!(12000), dec!(12), 12)).unwrap();
    let res = &output.result;

    assert_eq!(res.schedule.len(), 12);
    let numbers: Vec<u32> = res.schedule.iter().map(|r| r.payment_no).collect();
    assert_eq!(numbers, (1..=12).collect::<Vec<u32>>());

    for pair in res.schedule.windows(2) {
        assert!(pair[1].outstanding_balance < pair[0].outstanding_balance);
    }
    assert_eq!(res.schedule[11].outstanding_balance, Decimal::ZERO);
    assert_eq!(principal_sum(&res.schedule), dec!(12000));
    assert_eq!(res.summary.total_principal, dec!(12000.00));

    let first = &res.schedule[0];
    assert_eq!(first.interest, dec!(120.00));
    assert_eq!(first.principal, dec!(946.19));
    assert_eq!(first.payment_due, dec!(1066.19));
    assert_eq!(first.outstanding_balance, dec!(11053.81));

    let last = &res.schedule[11];
    assert_eq!(last.interest, dec!(10.56));
    assert_eq!(last.principal, dec!(1055.63));
    assert_eq!(last.payment_due, dec!(1066.19));

    assert_eq!(res.summary.monthly_payment, dec!(1066.19));
    // 12 * 1066.1854... = 12794.23
    assert_eq!(res.summary.total_payment_due, dec!(12794.23));
    assert_eq!(res.summary.total_interest, dec!(794.23));
}

#[test]
fn test_twelve_month_amortization_with_three_month_grace() {
    let mut t = terms(dec!(12000), dec!(12), 12);
    t.grace_period = dec!(3);
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    let rows = &output.result.schedule;

    for r in &rows[..3] {
        assert_eq!(r.principal, Decimal::ZERO);
        assert_eq!(r.interest, dec!(120.00));
        assert_eq!(r.payment_due, r.interest);
        assert_eq!(r.outstanding_balance, dec!(12000));
    }

    // The full 12000 amortizes over the remaining 9 installments
    for r in &rows[3..11] {
        assert_eq!(r.payment_due, dec!(1400.88));
    }
    assert_eq!(rows[3].principal, dec!(1280.88));
    assert_eq!(rows[11].outstanding_balance, Decimal::ZERO);
    assert_eq!(principal_sum(rows), dec!(12000));

    assert_eq!(output.result.summary.monthly_payment, dec!(1400.88));
    assert_eq!(output.result.loan_summary.grace_period, 3);
}

#[test]
fn test_zero_rate_amortization_is_defined() {
    let mut t = terms(dec!(1000), Decimal::ZERO, 3);
    t.grace_period = dec!(1);
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    let rows = &output.result.schedule;

    assert_eq!(rows[0].payment_due, Decimal::ZERO);
    assert_eq!(rows[1].principal, dec!(500));
    assert_eq!(rows[2].principal, dec!(500));
    assert_eq!(output.result.summary.total_interest, Decimal::ZERO);
    assert_eq!(output.result.summary.monthly_payment, dec!(500));
}

#[test]
fn test_single_installment_loan() {
    let output = schedule::calculate_repayment_schedule(&terms(dec!(5000), dec!(12), 1)).unwrap();
    let rows = &output.result.schedule;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].interest, dec!(50));
    assert_eq!(rows[0].principal, dec!(5000));
    assert_eq!(rows[0].payment_due, dec!(5050));
    assert_eq!(rows[0].outstanding_balance, Decimal::ZERO);
}

#[test]
fn test_grace_leaving_one_amortizing_installment() {
    let mut t = terms(dec!(6000), dec!(12), 4);
    t.grace_period = dec!(3);
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    let rows = &output.result.schedule;
    assert_eq!(rows[3].principal, dec!(6000));
    assert_eq!(rows[3].payment_due, dec!(6060));
}

// ===========================================================================
// Bullet
// ===========================================================================

#[test]
fn test_bullet_six_installments() {
    let mut t = terms(dec!(10000), dec!(12), 6);
    t.repayment_structure = RepaymentStructure::Bullet;
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    let rows = &output.result.schedule;

    for r in &rows[..5] {
        assert_eq!(r.principal, Decimal::ZERO);
        assert_eq!(r.interest, dec!(100));
        assert_eq!(r.payment_due, r.interest);
        assert_eq!(r.outstanding_balance, dec!(10000));
    }
    assert_eq!(rows[5].principal, dec!(10000));
    assert_eq!(rows[5].payment_due, dec!(10100));
    assert_eq!(rows[5].outstanding_balance, Decimal::ZERO);
    assert_eq!(output.result.summary.total_interest, dec!(600));
    assert_eq!(output.result.summary.monthly_payment, dec!(100));
}

#[test]
fn test_bullet_with_grace_has_same_shape() {
    let mut t = terms(dec!(10000), dec!(12), 6);
    t.repayment_structure = RepaymentStructure::Bullet;
    t.grace_period = dec!(2);
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    let rows = &output.result.schedule;
    assert!(rows[..5].iter().all(|r| r.principal.is_zero()));
    assert_eq!(rows[5].principal, dec!(10000));
}

// ===========================================================================
// Revenue sharing
// ===========================================================================

#[test]
fn test_revenue_sharing_six_installments() {
    let mut t = terms(dec!(10000), dec!(20), 6);
    t.return_type = ReturnType::RevenueSharing;
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    let rows = &output.result.schedule;

    assert_eq!(rows.len(), 6);
    for r in rows {
        assert_eq!(r.interest, dec!(333.33));
    }
    for r in &rows[..5] {
        assert_eq!(r.principal, Decimal::ZERO);
        assert_eq!(r.outstanding_balance, dec!(10000));
        assert_eq!(r.payment_due, dec!(333.33));
    }
    assert_eq!(rows[5].principal, dec!(10000));
    assert_eq!(rows[5].outstanding_balance, Decimal::ZERO);
    assert_eq!(rows[5].payment_due, dec!(10333.33));
    assert_eq!(output.result.summary.monthly_payment, dec!(333.33));
    assert_eq!(output.result.summary.total_interest, dec!(2000.00));
    assert!(output.methodology.starts_with("Revenue Share"));
}

#[test]
fn test_revenue_sharing_discards_grace_with_warning() {
    let mut t = terms(dec!(10000), dec!(20), 6);
    t.return_type = ReturnType::RevenueSharing;
    t.grace_period = dec!(2);
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    assert_eq!(output.result.loan_summary.grace_period, 0);
    assert_eq!(output.warnings.len(), 1);
    assert!(output.result.schedule[0].interest > Decimal::ZERO);
}

// ===========================================================================
// Grace normalization and validation
// ===========================================================================

#[test]
fn test_grace_in_days_normalizes_to_months() {
    let mut t = terms(dec!(12000), dec!(12), 12);
    t.grace_period = dec!(90);
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    let echo = &output.result.loan_summary;
    assert_eq!(echo.grace_period, 3);
    assert_eq!(echo.grace_period_unit, GraceUnit::Days);
    assert!(output.result.schedule[..3].iter().all(|r| r.principal.is_zero()));
}

#[test]
fn test_grace_in_days_consuming_whole_term_fails() {
    let mut t = terms(dec!(12000), dec!(12), 3);
    t.grace_period = dec!(90);
    let err = schedule::calculate_repayment_schedule(&t).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidGracePeriod);
    assert_eq!(err.code().as_str(), "INVALID_GRACE_PERIOD");
}

#[test]
fn test_standalone_grace_normalization() {
    let input = grace::GraceInput {
        grace_period: dec!(90),
        repayment_period: 12,
        return_type: ReturnType::InterestBased,
    };
    let output = grace::normalize_grace_period(&input).unwrap();
    assert_eq!(output.result.grace_period, 3);
}

#[test]
fn test_validation_errors_return_no_schedule() {
    let mut t = terms(dec!(-5), dec!(12), 12);
    assert_eq!(
        schedule::calculate_repayment_schedule(&t).unwrap_err().code(),
        ErrorCode::InvalidLoanAmount
    );
    t.loan_amount = dec!(100);
    t.repayment_period = 0;
    assert_eq!(
        schedule::calculate_repayment_schedule(&t).unwrap_err().code(),
        ErrorCode::InvalidRepaymentPeriod
    );
}

// ===========================================================================
// Fees and cycles
// ===========================================================================

#[test]
fn test_facility_fee_in_summary() {
    let mut t = terms(dec!(10000), dec!(12), 12);
    t.custom_fees = vec![
        CustomFee {
            name: "Arrangement".into(),
            amount: dec!(100),
            fee_type: FeeType::Flat,
        },
        CustomFee {
            name: "Processing".into(),
            amount: dec!(1),
            fee_type: FeeType::Percentage,
        },
    ];
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    assert_eq!(output.result.summary.facility_fee, dec!(200.00));

    let fee_only = fees::calculate_facility_fee(&fees::FacilityFeeInput {
        loan_amount: t.loan_amount,
        custom_fees: t.custom_fees.clone(),
    })
    .unwrap();
    assert_eq!(fee_only.result.facility_fee, dec!(200.00));
}

#[test]
fn test_weekly_cycle_due_dates() {
    let mut t = terms(dec!(1200), dec!(12), 4);
    t.repayment_cycle = RepaymentCycle::Weekly;
    t.first_payment_date = date(2024, 2, 26);
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    let dates: Vec<NaiveDate> = output.result.schedule.iter().map(|r| r.due_date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 2, 26), date(2024, 3, 4), date(2024, 3, 11), date(2024, 3, 18)]
    );
}

#[test]
fn test_quarterly_cycle_month_end() {
    let mut t = terms(dec!(1200), dec!(12), 4);
    t.repayment_cycle = RepaymentCycle::Quarterly;
    t.first_payment_date = date(2023, 11, 30);
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    let dates: Vec<NaiveDate> = output.result.schedule.iter().map(|r| r.due_date).collect();
    assert_eq!(
        dates,
        vec![date(2023, 11, 30), date(2024, 2, 29), date(2024, 5, 30), date(2024, 8, 30)]
    );
}

#[test]
fn test_terms_from_json() {
    let json = r#"{
        "loan_amount": "10000",
        "interest_rate": "20",
        "repayment_period": 6,
        "repayment_cycle": "bi_weekly",
        "first_payment_date": "2024-01-05",
        "return_type": "revenue_sharing",
        "custom_fees": [{"name": "Setup", "amount": "150", "type": "flat"}]
    }"#;
    let t: LoanTerms = serde_json::from_str(json).unwrap();
    let output = schedule::calculate_repayment_schedule(&t).unwrap();
    assert_eq!(output.result.schedule[1].due_date, date(2024, 1, 19));
    assert_eq!(output.result.summary.facility_fee, dec!(150));
}
