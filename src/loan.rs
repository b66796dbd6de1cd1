//! Loan estimator - fixed-rate amortization figures for a purchase
//!
//! EMI = P × r × (1 + r)^n / ((1 + r)^n − 1)
//!
//! where P is the loan amount, r the monthly rate and n the number of
//! monthly installments. It is evaluated as P × r / (1 − (1 + r)^−n) with
//! `ln_1p`/`exp_m1`, which stays finite for very small rates and very long
//! terms. A zero rate, or one too small to register, falls back to P / n.
//! No rounding is applied; formatting is left to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conventional down payment as a share of the price
pub const DEFAULT_DOWN_PAYMENT_RATIO: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoanError {
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("property price must be greater than zero (got {0})")]
    NonPositivePrice(f64),

    #[error("down payment cannot be negative (got {0})")]
    NegativeDownPayment(f64),

    #[error("down payment {down_payment} exceeds property price {price}")]
    DownPaymentExceedsPrice { down_payment: f64, price: f64 },

    #[error("loan term must be between {min} and {max} years (got {years})")]
    TermOutOfRange { years: u32, min: u32, max: u32 },

    #[error("interest rate must be between {min}% and {max}% (got {rate}%)")]
    RateOutOfRange { rate: f64, min: f64, max: f64 },
}

/// Accepted parameter ranges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanLimits {
    pub min_term_years: u32,
    pub max_term_years: u32,
    pub min_rate: f64,
    pub max_rate: f64,
}

impl Default for LoanLimits {
    fn default() -> Self {
        Self {
            min_term_years: 5,
            max_term_years: 30,
            min_rate: 0.0,
            max_rate: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    pub property_price: f64,
    pub down_payment: f64,
    pub loan_term_years: u32,
    pub annual_interest_rate_percent: f64,
}

impl LoanInput {
    /// Input with the conventional 20% down payment
    pub fn with_default_down_payment(
        property_price: f64,
        loan_term_years: u32,
        annual_interest_rate_percent: f64,
    ) -> Self {
        Self {
            property_price,
            down_payment: default_down_payment(property_price),
            loan_term_years,
            annual_interest_rate_percent,
        }
    }

    pub fn loan_amount(&self) -> f64 {
        self.property_price - self.down_payment
    }

    pub fn total_months(&self) -> u64 {
        u64::from(self.loan_term_years) * 12
    }

    pub fn monthly_rate(&self) -> f64 {
        (self.annual_interest_rate_percent / 12.0) / 100.0
    }

    pub fn validate(&self, limits: &LoanLimits) -> Result<(), LoanError> {
        if !self.property_price.is_finite() {
            return Err(LoanError::NotFinite("property price"));
        }
        if !self.down_payment.is_finite() {
            return Err(LoanError::NotFinite("down payment"));
        }
        if !self.annual_interest_rate_percent.is_finite() {
            return Err(LoanError::NotFinite("interest rate"));
        }

        if self.property_price <= 0.0 {
            return Err(LoanError::NonPositivePrice(self.property_price));
        }
        if self.down_payment < 0.0 {
            return Err(LoanError::NegativeDownPayment(self.down_payment));
        }
        if self.down_payment > self.property_price {
            return Err(LoanError::DownPaymentExceedsPrice {
                down_payment: self.down_payment,
                price: self.property_price,
            });
        }

        if self.loan_term_years == 0
            || self.loan_term_years < limits.min_term_years
            || self.loan_term_years > limits.max_term_years
        {
            return Err(LoanError::TermOutOfRange {
                years: self.loan_term_years,
                min: limits.min_term_years,
                max: limits.max_term_years,
            });
        }

        let rate = self.annual_interest_rate_percent;
        if rate < 0.0 || rate < limits.min_rate || rate > limits.max_rate {
            return Err(LoanError::RateOutOfRange {
                rate,
                min: limits.min_rate,
                max: limits.max_rate,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResult {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_payment: f64,
    pub loan_to_value_percent: f64,
}

/// One loan year of the amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyBreakdown {
    pub year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub closing_balance: f64,
}

pub fn default_down_payment(property_price: f64) -> f64 {
    property_price * DEFAULT_DOWN_PAYMENT_RATIO
}

/// LTV implied by a down payment: 100 − down / price × 100
pub fn loan_to_value_percent(property_price: f64, down_payment: f64) -> Option<f64> {
    if property_price <= 0.0 {
        return None;
    }
    Some(100.0 - down_payment / property_price * 100.0)
}

/// Estimate with the default limits
pub fn estimate(input: &LoanInput) -> Result<LoanResult, LoanError> {
    estimate_with_limits(input, &LoanLimits::default())
}

pub fn estimate_with_limits(
    input: &LoanInput,
    limits: &LoanLimits,
) -> Result<LoanResult, LoanError> {
    input.validate(limits)?;

    let loan_amount = input.loan_amount();
    let total_months = input.total_months();
    let monthly_payment = monthly_payment(loan_amount, input.monthly_rate(), total_months);

    let total_payment = monthly_payment * total_months as f64;
    let total_interest = total_payment - loan_amount;

    Ok(LoanResult {
        loan_amount,
        monthly_payment,
        total_interest,
        total_payment,
        loan_to_value_percent: (loan_amount / input.property_price) * 100.0,
    })
}

/// EMI for a loan; `months` must be non-zero
pub fn monthly_payment(loan_amount: f64, monthly_rate: f64, months: u64) -> f64 {
    let n = months as f64;

    // 1 - (1 + r)^-n
    let discount = -(-n * monthly_rate.ln_1p()).exp_m1();
    if discount == 0.0 {
        return loan_amount / n;
    }

    loan_amount * monthly_rate / discount
}

/// Schedule with the default limits
pub fn amortization_schedule(input: &LoanInput) -> Result<Vec<YearlyBreakdown>, LoanError> {
    amortization_schedule_with_limits(input, &LoanLimits::default())
}

/// Year-by-year split of each installment into principal and interest
pub fn amortization_schedule_with_limits(
    input: &LoanInput,
    limits: &LoanLimits,
) -> Result<Vec<YearlyBreakdown>, LoanError> {
    let result = estimate_with_limits(input, limits)?;
    let rate = input.monthly_rate();

    let mut balance = result.loan_amount;
    let mut schedule = Vec::new();

    for year in 1..=input.loan_term_years {
        let mut principal_paid = 0.0;
        let mut interest_paid = 0.0;

        for _ in 0..12 {
            let interest = balance * rate;
            let principal = result.monthly_payment - interest;
            balance -= principal;
            principal_paid += principal;
            interest_paid += interest;
        }

        // Floating residue on the final installment
        if year == input.loan_term_years {
            balance = 0.0;
        }

        schedule.push(YearlyBreakdown {
            year,
            principal_paid,
            interest_paid,
            closing_balance: balance,
        });
    }

    Ok(schedule)
}
