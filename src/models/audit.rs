//! Audit records attached to derived figures.
//!
//! Every payroll figure carries the rule that produced it, its inputs and a
//! human-readable explanation, so a salary slip can be traced back to the
//! attendance it was computed from.

use serde::{Deserialize, Serialize};

/// A single step recording a calculation decision.
///
/// # Example
///
/// ```
/// use tuition_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "monthly_pro_rata".to_string(),
///     rule_name: "Monthly Pro-Rata".to_string(),
///     input: serde_json::json!({"basic_salary": "26000"}),
///     output: serde_json::json!({"net_salary": "26000"}),
///     reasoning: "$26000 / 26 x 26 = $26000".to_string(),
/// };
/// assert_eq!(step.rule_id, "monthly_pro_rata");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during a calculation.
///
/// Warnings indicate data that did not stop the calculation but may need a
/// second look, such as attendance marked twice for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_step_round_trip_keeps_json_payloads() {
        let step = AuditStep {
            step_number: 2,
            rule_id: "effective_days".to_string(),
            rule_name: "Effective Days".to_string(),
            input: serde_json::json!({"present_days": 20, "half_days": 2}),
            output: serde_json::json!({"effective_days": "21"}),
            reasoning: "20 + 2 x 0.5 = 21".to_string(),
        };
        let json = serde_json::to_string(&step).unwrap();
        let back: AuditStep = serde_json::from_str(&json).unwrap();
        assert_eq!(back.input["half_days"], 2);
        assert_eq!(back, step);
    }

    #[test]
    fn test_warning_serialization() {
        let warning = AuditWarning {
            code: "DUPLICATE_ATTENDANCE".to_string(),
            message: "2026-03-02 marked twice".to_string(),
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"DUPLICATE_ATTENDANCE\""));
    }
}
