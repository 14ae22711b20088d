//! Monthly salary calculation.
//!
//! Turns a staff member's pay basis and attendance into a net salary. Pay is
//! earned per effective day (a half day counts as 0.5) and no absence
//! deduction is ever applied on top, so `deductions` is always zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, SalaryType};

use super::rounding::{ratio_or_zero, round_whole};

/// Working days in a pay period unless the operator says otherwise.
pub const DEFAULT_WORKING_DAYS: u32 = 26;

/// Hours paid per effective day for hourly staff.
pub const DEFAULT_HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Everything the calculation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollInput {
    /// Monthly salary, daily rate or hourly rate depending on `salary_type`.
    pub basic_salary: Decimal,
    /// How `basic_salary` is interpreted.
    #[serde(default)]
    pub salary_type: SalaryType,
    /// Full days worked.
    pub present_days: u32,
    /// Half days worked.
    #[serde(default)]
    pub half_days: u32,
    /// Working days in the period.
    #[serde(default = "default_working_days")]
    pub total_working_days: u32,
}

fn default_working_days() -> u32 {
    DEFAULT_WORKING_DAYS
}

impl PayrollInput {
    /// Rejects inputs that would produce a negative salary.
    pub fn validate(&self) -> EngineResult<()> {
        if self.basic_salary < Decimal::ZERO {
            return Err(EngineError::validation(
                "basicSalary",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// The outcome of a payroll calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollCalculation {
    /// `present_days + half_days * 0.5`.
    pub effective_days: Decimal,
    /// Unrounded daily rate, for monthly staff only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub per_day_salary: Option<Decimal>,
    /// Always zero.
    pub deductions: Decimal,
    /// Whole-number salary payable.
    pub net_salary: Decimal,
    /// How the figure was reached.
    pub audit_step: AuditStep,
}

/// Full days plus half of the half days.
pub fn effective_days(present_days: u32, half_days: u32) -> Decimal {
    Decimal::from(present_days) + Decimal::from(half_days) * Decimal::new(5, 1)
}

// Salary figures past the decimal range are rejected rather than wrapped.
fn product(factors: &[Decimal]) -> EngineResult<Decimal> {
    factors.iter().try_fold(Decimal::ONE, |acc, f| {
        acc.checked_mul(*f)
            .ok_or_else(|| EngineError::validation("basicSalary", "is too large"))
    })
}

/// Computes net salary using the default 8 hour day.
///
/// ```
/// use tuition_engine::calculation::{calculate_salary, PayrollInput};
/// use tuition_engine::models::SalaryType;
/// use rust_decimal::Decimal;
///
/// let input = PayrollInput {
///     basic_salary: Decimal::new(26000, 0),
///     salary_type: SalaryType::Monthly,
///     present_days: 20,
///     half_days: 2,
///     total_working_days: 26,
/// };
/// let result = calculate_salary(&input).unwrap();
/// assert_eq!(result.net_salary, Decimal::new(21000, 0));
/// assert_eq!(result.deductions, Decimal::ZERO);
/// ```
pub fn calculate_salary(input: &PayrollInput) -> EngineResult<PayrollCalculation> {
    calculate_salary_with(input, DEFAULT_HOURS_PER_DAY, 1)
}

/// Computes net salary with an explicit hours-per-day figure for hourly
/// staff. `step_number` numbers the audit step.
pub fn calculate_salary_with(
    input: &PayrollInput,
    hours_per_day: Decimal,
    step_number: u32,
) -> EngineResult<PayrollCalculation> {
    input.validate()?;
    if hours_per_day < Decimal::ZERO {
        return Err(EngineError::validation("hoursPerDay", "must not be negative"));
    }

    let effective = effective_days(input.present_days, input.half_days);

    let (per_day_salary, net_salary, rule_id, rule_name, reasoning) = match input.salary_type {
        SalaryType::Monthly => {
            let per_day = ratio_or_zero(input.basic_salary, Decimal::from(input.total_working_days));
            let net = round_whole(product(&[per_day, effective])?);
            let reasoning = if input.total_working_days == 0 {
                "No working days in the period, salary is 0".to_string()
            } else {
                format!(
                    "{} / {} working days x {} effective days = {}",
                    input.basic_salary, input.total_working_days, effective, net
                )
            };
            (Some(per_day), net, "monthly_pro_rata", "Monthly Pro-Rata", reasoning)
        }
        SalaryType::Daily => {
            let net = round_whole(product(&[input.basic_salary, effective])?);
            let reasoning = format!(
                "{} per day x {} effective days = {}",
                input.basic_salary, effective, net
            );
            (None, net, "daily_rate", "Daily Rate", reasoning)
        }
        SalaryType::Hourly => {
            let net = round_whole(product(&[input.basic_salary, hours_per_day, effective])?);
            let reasoning = format!(
                "{} per hour x {} hours x {} effective days = {}",
                input.basic_salary, hours_per_day, effective, net
            );
            (None, net, "hourly_rate", "Hourly Rate", reasoning)
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::json!({
            "basic_salary": input.basic_salary.to_string(),
            "salary_type": input.salary_type,
            "present_days": input.present_days,
            "half_days": input.half_days,
            "total_working_days": input.total_working_days,
            "hours_per_day": hours_per_day.to_string(),
        }),
        output: serde_json::json!({
            "effective_days": effective.to_string(),
            "net_salary": net_salary.to_string(),
            "deductions": "0",
        }),
        reasoning,
    };

    Ok(PayrollCalculation {
        effective_days: effective,
        per_day_salary,
        deductions: Decimal::ZERO,
        net_salary,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn input(basic: &str, salary_type: SalaryType, present: u32, half: u32, wd: u32) -> PayrollInput {
        PayrollInput {
            basic_salary: dec(basic),
            salary_type,
            present_days: present,
            half_days: half,
            total_working_days: wd,
        }
    }

    /// PAY-001: a full month pays the full salary
    #[test]
    fn test_monthly_full_attendance() {
        let result = calculate_salary(&input("26000", SalaryType::Monthly, 26, 0, 26)).unwrap();
        assert_eq!(result.net_salary, dec("26000"));
        assert_eq!(result.deductions, Decimal::ZERO);
        assert_eq!(result.per_day_salary, Some(dec("1000")));
        assert_eq!(result.audit_step.rule_id, "monthly_pro_rata");
    }

    /// PAY-002: half days count as 0.5
    #[test]
    fn test_monthly_with_half_days() {
        let result = calculate_salary(&input("26000", SalaryType::Monthly, 20, 2, 26)).unwrap();
        assert_eq!(result.effective_days, dec("21"));
        assert_eq!(result.net_salary, dec("21000"));
        assert_eq!(result.deductions, Decimal::ZERO);
    }

    /// PAY-003: daily rate times effective days
    #[test]
    fn test_daily_rate() {
        let result = calculate_salary(&input("500", SalaryType::Daily, 10, 0, 26)).unwrap();
        assert_eq!(result.net_salary, dec("5000"));
        assert_eq!(result.per_day_salary, None);
    }

    /// PAY-004: hourly rate times eight hours per effective day
    #[test]
    fn test_hourly_rate() {
        let result = calculate_salary(&input("50", SalaryType::Hourly, 5, 0, 26)).unwrap();
        assert_eq!(result.net_salary, dec("2000"));
        assert_eq!(result.audit_step.rule_id, "hourly_rate");
    }

    #[test]
    fn test_hourly_rate_with_configured_hours() {
        let result =
            calculate_salary_with(&input("50", SalaryType::Hourly, 5, 0, 26), dec("6"), 1).unwrap();
        assert_eq!(result.net_salary, dec("1500"));
    }

    #[test]
    fn test_zero_working_days_pays_nothing() {
        let result = calculate_salary(&input("26000", SalaryType::Monthly, 5, 0, 0)).unwrap();
        assert_eq!(result.net_salary, Decimal::ZERO);
    }

    #[test]
    fn test_monthly_rounds_half_away_from_zero() {
        // 10000 / 26 * 13.5 = 5192.307...
        let result = calculate_salary(&input("10000", SalaryType::Monthly, 13, 1, 26)).unwrap();
        assert_eq!(result.net_salary, dec("5192"));
        // 3 / 2 * 1 = 1.5
        let result = calculate_salary(&input("3", SalaryType::Monthly, 1, 0, 2)).unwrap();
        assert_eq!(result.net_salary, dec("2"));
    }

    #[test]
    fn test_negative_salary_rejected() {
        let err = calculate_salary(&input("-1", SalaryType::Daily, 1, 0, 26)).unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
    }

    #[test]
    fn test_salary_past_decimal_range_rejected() {
        for salary_type in [SalaryType::Daily, SalaryType::Hourly] {
            let input = PayrollInput {
                basic_salary: Decimal::MAX / Decimal::from(4),
                salary_type,
                present_days: 10,
                half_days: 0,
                total_working_days: 26,
            };
            match calculate_salary(&input) {
                Err(EngineError::Validation { field, message }) => {
                    assert_eq!(field, "basicSalary");
                    assert_eq!(message, "is too large");
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_input_defaults_from_json() {
        let json = r#"{"basicSalary": "26000", "presentDays": 26}"#;
        let parsed: PayrollInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.salary_type, SalaryType::Monthly);
        assert_eq!(parsed.total_working_days, 26);
        assert_eq!(parsed.half_days, 0);
    }

    proptest! {
        #[test]
        fn prop_net_salary_is_whole_and_non_negative(
            basic in 0i64..=1_000_000,
            present in 0u32..=31,
            half in 0u32..=31,
            wd in 0u32..=31,
            kind in 0u8..3,
        ) {
            let salary_type = match kind {
                0 => SalaryType::Monthly,
                1 => SalaryType::Daily,
                _ => SalaryType::Hourly,
            };
            let result = calculate_salary(&PayrollInput {
                basic_salary: Decimal::new(basic, 0),
                salary_type,
                present_days: present,
                half_days: half,
                total_working_days: wd,
            }).unwrap();
            prop_assert!(result.net_salary >= Decimal::ZERO);
            prop_assert_eq!(result.net_salary, result.net_salary.trunc());
            prop_assert_eq!(result.deductions, Decimal::ZERO);
        }

        #[test]
        fn prop_full_month_pays_basic(basic in 0i64..=1_000_000, wd in 1u32..=31) {
            let result = calculate_salary(&PayrollInput {
                basic_salary: Decimal::new(basic, 0),
                salary_type: SalaryType::Monthly,
                present_days: wd,
                half_days: 0,
                total_working_days: wd,
            }).unwrap();
            prop_assert_eq!(result.net_salary, Decimal::new(basic, 0));
        }
    }
}
