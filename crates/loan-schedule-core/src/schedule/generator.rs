use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rounding::round_money;
use crate::schedule::dates;
use crate::terms::{RepaymentCycle, RepaymentStructure, ReturnType};
use crate::time_value::{checked, level_payment, monthly_rate, percent_of};
use crate::types::{Money, Rate};
use crate::LoanScheduleResult;

/// A published schedule row. All amounts are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub payment_no: u32,
    pub due_date: NaiveDate,
    pub payment_due: Money,
    pub interest: Money,
    pub principal: Money,
    pub outstanding_balance: Money,
}

/// An installment as the fold produces it, before rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct Installment {
    pub payment_no: u32,
    pub due_date: NaiveDate,
    pub payment_due: Money,
    pub interest: Money,
    pub principal: Money,
    pub outstanding_balance: Money,
}

impl Installment {
    pub fn to_row(&self) -> ScheduleRow {
        ScheduleRow {
            payment_no: self.payment_no,
            due_date: self.due_date,
            payment_due: round_money(self.payment_due),
            interest: round_money(self.interest),
            principal: round_money(self.principal),
            outstanding_balance: round_money(self.outstanding_balance),
        }
    }
}

/// Validated terms reduced to what the fold needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulePlan {
    pub loan_amount: Money,
    /// Annual percentage.
    pub interest_rate: Rate,
    pub installments: u32,
    /// Normalized grace installments; always 0 for revenue sharing.
    pub grace_installments: u32,
    pub structure: RepaymentStructure,
    pub cycle: RepaymentCycle,
    pub first_payment_date: NaiveDate,
    pub return_type: ReturnType,
}

impl SchedulePlan {
    /// True when the level-payment path (and its final-row correction) applies.
    pub fn amortizes(&self) -> bool {
        self.return_type == ReturnType::InterestBased
            && self.structure == RepaymentStructure::PrincipalAndInterest
    }

    /// Grace capped so at least the last installment falls outside it.
    fn with_bounded_grace(mut self) -> Self {
        self.grace_installments = self
            .grace_installments
            .min(self.installments.saturating_sub(1));
        self
    }
}

/// Per-row pricing rule, fixed before the first row is produced.
#[derive(Debug, Clone, Copy)]
enum Model {
    RevenueShare { per_installment: Money },
    Amortizing { rate: Decimal, payment: Money },
    Bullet { rate: Decimal },
}

impl Model {
    fn for_plan(plan: &SchedulePlan) -> LoanScheduleResult<Self> {
        let rate = monthly_rate(plan.interest_rate);
        let model = match (plan.return_type, plan.structure) {
            (ReturnType::RevenueSharing, _) => {
                let total_share = percent_of(plan.loan_amount, plan.interest_rate)?;
                Model::RevenueShare {
                    per_installment: total_share / Decimal::from(plan.installments.max(1)),
                }
            }
            (ReturnType::InterestBased, RepaymentStructure::PrincipalAndInterest) => {
                // Grace rows leave the balance untouched, so amortization
                // starts from the full loan amount.
                let amortizing = plan.installments.saturating_sub(plan.grace_installments);
                Model::Amortizing {
                    rate,
                    payment: level_payment(plan.loan_amount, rate, amortizing)?,
                }
            }
            (ReturnType::InterestBased, RepaymentStructure::Bullet) => Model::Bullet { rate },
        };
        Ok(model)
    }
}

/// Running state threaded from one row into the next.
#[derive(Debug, Clone, Copy)]
struct Carry {
    balance: Money,
    principal_paid: Money,
}

/// Lazy, finite sequence of installments for one plan.
///
/// Restartable by cloning; `generate_installments` collects it eagerly.
#[derive(Debug, Clone)]
pub struct ScheduleRows {
    plan: SchedulePlan,
    model: Model,
    carry: Carry,
    next_no: u32,
}

impl ScheduleRows {
    pub fn new(plan: SchedulePlan) -> LoanScheduleResult<Self> {
        let plan = plan.with_bounded_grace();
        Ok(ScheduleRows {
            model: Model::for_plan(&plan)?,
            carry: Carry {
                balance: plan.loan_amount,
                principal_paid: Decimal::ZERO,
            },
            next_no: 1,
            plan,
        })
    }

    /// Interest and principal for row `payment_no` given the carried state.
    fn split(&self, payment_no: u32) -> LoanScheduleResult<(Money, Money)> {
        let plan = &self.plan;
        let opening = self.carry.balance;
        let is_last = payment_no == plan.installments;
        let in_grace = payment_no <= plan.grace_installments;

        let split = match self.model {
            Model::RevenueShare { per_installment } => {
                let principal = if is_last { plan.loan_amount } else { Decimal::ZERO };
                (per_installment, principal)
            }
            Model::Amortizing { rate, payment } => {
                let interest = checked(opening.checked_mul(rate), "installment interest")?;
                let principal = if in_grace {
                    Decimal::ZERO
                } else if is_last {
                    // Absorb residual drift so the balance closes at zero
                    checked(
                        plan.loan_amount.checked_sub(self.carry.principal_paid),
                        "final principal",
                    )?
                } else {
                    checked(payment.checked_sub(interest), "installment principal")?
                };
                (interest, principal)
            }
            Model::Bullet { rate } => {
                let interest = checked(opening.checked_mul(rate), "installment interest")?;
                let principal = if is_last { plan.loan_amount } else { Decimal::ZERO };
                (interest, principal)
            }
        };
        Ok(split)
    }

    fn advance(&mut self, payment_no: u32) -> LoanScheduleResult<Installment> {
        let due_date = dates::due_date(self.plan.first_payment_date, self.plan.cycle, payment_no)?;
        let (interest, principal) = self.split(payment_no)?;

        let balance = if payment_no == self.plan.installments {
            Decimal::ZERO
        } else {
            checked(self.carry.balance.checked_sub(principal), "outstanding balance")?
        };
        self.carry = Carry {
            balance,
            principal_paid: checked(
                self.carry.principal_paid.checked_add(principal),
                "principal paid",
            )?,
        };

        Ok(Installment {
            payment_no,
            due_date,
            payment_due: checked(interest.checked_add(principal), "payment due")?,
            interest,
            principal,
            outstanding_balance: self.carry.balance,
        })
    }
}

impl Iterator for ScheduleRows {
    type Item = LoanScheduleResult<Installment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_no > self.plan.installments {
            return None;
        }
        let payment_no = self.next_no;
        self.next_no += 1;

        let row = self.advance(payment_no);
        if row.is_err() {
            self.next_no = self.plan.installments + 1;
        }
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.plan.installments + 1).saturating_sub(self.next_no) as usize;
        (remaining, Some(remaining))
    }
}

/// Generate every installment of the plan, unrounded.
pub fn generate_installments(plan: SchedulePlan) -> LoanScheduleResult<Vec<Installment>> {
    ScheduleRows::new(plan)?.collect()
}

/// Force the last installment to retire exactly what the earlier ones left.
///
/// Idempotent: a schedule that already closes at zero is unchanged.
pub fn correct_final_installment(loan_amount: Money, installments: &mut [Installment]) {
    let Some((last, prior)) = installments.split_last_mut() else {
        return;
    };
    let paid: Money = prior.iter().map(|i| i.principal).sum();
    last.principal = loan_amount - paid;
    last.payment_due = last.interest + last.principal;
    last.outstanding_balance = Decimal::ZERO;
}

/// Round installments for output.
///
/// On the level-payment path the last row is re-derived from the rounded
/// rows before it, so the published principals add up to the loan amount
/// to the cent.
pub fn publish_rows(plan: &SchedulePlan, installments: &[Installment]) -> Vec<ScheduleRow> {
    let mut rows: Vec<ScheduleRow> = installments.iter().map(Installment::to_row).collect();

    if plan.amortizes() {
        if let Some((last, prior)) = rows.split_last_mut() {
            let paid: Money = prior.iter().map(|r| r.principal).sum();
            last.principal = round_money(plan.loan_amount) - paid;
            last.payment_due = last.interest + last.principal;
            last.outstanding_balance = Decimal::ZERO;
        }
    }

    rows
}
