// File: src/checks.rs
// Purpose: Validator categories and the checks they run against a field value

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use tracing::trace;

use crate::error::{RuleError, ValidationFailure};
use crate::messages;
use crate::registry::{self, PatternKey};
use crate::spec::{CompareOperator, CompareTarget, PromptKind, Special, ValidationSpec};
use crate::value::{format_number, FieldValue};

/// Positive integer written with plain digits
static POSITIVE_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]*[1-9][0-9]*$").expect("positive integer pattern"));

/// Settlement cycle of a merchant account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettleCycle {
    /// Settled after N working days
    Daily,
    /// Settled on a weekday
    Weekly,
    /// Settled on a day of the month
    Monthly,
}

impl SettleCycle {
    /// `"0"` is daily, `"1"` weekly, anything else monthly
    pub fn from_code(code: &str) -> Self {
        match code {
            "0" => SettleCycle::Daily,
            "1" => SettleCycle::Weekly,
            _ => SettleCycle::Monthly,
        }
    }

    /// Largest day number a settlement day may take
    pub fn max_day(&self) -> u32 {
        match self {
            SettleCycle::Daily => 999,
            SettleCycle::Weekly => 7,
            SettleCycle::Monthly => 28,
        }
    }
}

/// Domain-specific checks selected by `special.key`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpecialCheck {
    /// Settlement day within the bounds of its cycle
    #[serde(rename = "key1")]
    SettleCycleDay(SettleCycle),
}

impl SpecialCheck {
    pub fn resolve(special: &Special) -> Result<Self, RuleError> {
        match special.key.as_str() {
            "key1" => Ok(SpecialCheck::SettleCycleDay(SettleCycle::from_code(
                &special.settle_cycle,
            ))),
            other => Err(RuleError::UnknownSpecialKey(other.to_string())),
        }
    }
}

/// One validator category with its typed payload
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "check", rename_all = "camelCase")]
pub enum Check {
    Required,
    NamedPattern {
        key: PatternKey,
    },
    Pattern {
        #[serde(serialize_with = "serialize_regex")]
        regex: Regex,
    },
    NumInterval {
        lower: f64,
        upper: f64,
    },
    DateInterval {
        lower: String,
        upper: String,
    },
    Compare {
        target: CompareTarget,
        operator: CompareOperator,
    },
    Special {
        special: SpecialCheck,
    },
}

fn serialize_regex<S: Serializer>(regex: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(regex.as_str())
}

impl Check {
    pub fn name(&self) -> &'static str {
        match self {
            Check::Required => "required",
            Check::NamedPattern { .. } => "namedPattern",
            Check::Pattern { .. } => "pattern",
            Check::NumInterval { .. } => "numInterval",
            Check::DateInterval { .. } => "dateInterval",
            Check::Compare { .. } => "compare",
            Check::Special { .. } => "special",
        }
    }
}

/// Message inputs shared by every validator built from one spec
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Prompt {
    kind: PromptKind,
    text: String,
    fail_text: Option<String>,
}

impl Prompt {
    pub(crate) fn from_spec(spec: &ValidationSpec) -> Self {
        Self {
            kind: spec.prompt_kind,
            text: spec.prompt_text.clone(),
            fail_text: spec.effective_fail_text().map(str::to_string),
        }
    }

    /// Caller's fail text if any, else the generated default
    fn fail_or(&self, default: impl FnOnce() -> String) -> ValidationFailure {
        ValidationFailure::new(self.fail_text.clone().unwrap_or_else(default))
    }
}

/// A check bound to the messages of the field it belongs to
#[derive(Debug, Clone)]
pub struct Validator {
    check: Check,
    prompt: Prompt,
}

impl Validator {
    pub(crate) fn new(check: Check, prompt: Prompt) -> Self {
        Self { check, prompt }
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    /// Run the check against a value
    ///
    /// Only the required check looks at empty values; every other category
    /// lets falsy values through so optional fields stay optional.
    pub fn validate(&self, value: &FieldValue) -> Result<(), ValidationFailure> {
        let outcome = match &self.check {
            Check::Required => self.check_required(value),
            _ if !value.is_truthy() => Ok(()),
            Check::NamedPattern { key } => self.check_named_pattern(*key, value),
            Check::Pattern { regex } => self.check_pattern(regex, value),
            Check::NumInterval { lower, upper } => self.check_num_interval(*lower, *upper, value),
            Check::DateInterval { lower, upper } => self.check_date_interval(lower, upper, value),
            Check::Compare { target, operator } => self.check_compare(target, *operator, value),
            Check::Special { special } => self.check_special(*special, value),
        };

        if let Err(failure) = &outcome {
            trace!(check = self.check.name(), message = %failure, "field value rejected");
        }
        outcome
    }

    /// Callback form of [`Validator::validate`] for hosts that expect a
    /// continuation: `report` runs exactly once, before this returns, with
    /// `None` on success or the failure otherwise
    pub fn validate_with<F>(&self, value: &FieldValue, report: F)
    where
        F: FnOnce(Option<ValidationFailure>),
    {
        report(self.validate(value).err())
    }

    fn check_required(&self, value: &FieldValue) -> Result<(), ValidationFailure> {
        if !value.is_truthy() {
            if value.is_zero() {
                return Ok(());
            }
            return Err(ValidationFailure::new(messages::required_message(
                self.prompt.kind,
                &self.prompt.text,
            )));
        }
        if value.is_blank_string() {
            return Err(ValidationFailure::new(messages::BLANK_MESSAGE));
        }
        Ok(())
    }

    fn check_named_pattern(&self, key: PatternKey, value: &FieldValue) -> Result<(), ValidationFailure> {
        let entry = registry::lookup(key);
        if entry.matcher.is_match(&value.to_string()) {
            return Ok(());
        }
        Err(self.prompt.fail_or(|| {
            entry
                .tip
                .map(str::to_string)
                .unwrap_or_else(|| messages::format_message(self.prompt.kind, &self.prompt.text))
        }))
    }

    fn check_pattern(&self, regex: &Regex, value: &FieldValue) -> Result<(), ValidationFailure> {
        if regex.is_match(&value.to_string()) {
            return Ok(());
        }
        Err(self
            .prompt
            .fail_or(|| messages::format_message(self.prompt.kind, &self.prompt.text)))
    }

    fn check_num_interval(&self, lower: f64, upper: f64, value: &FieldValue) -> Result<(), ValidationFailure> {
        let n = value.as_number();
        if lower <= n && n <= upper {
            return Ok(());
        }
        Err(self
            .prompt
            .fail_or(|| messages::num_interval_message(self.prompt.kind, lower, upper)))
    }

    fn check_date_interval(&self, lower: &str, upper: &str, value: &FieldValue) -> Result<(), ValidationFailure> {
        let date = value.to_string();
        if lower <= date.as_str() && date.as_str() <= upper {
            return Ok(());
        }
        Err(self
            .prompt
            .fail_or(|| messages::date_interval_message(self.prompt.kind, lower, upper)))
    }

    fn check_compare(
        &self,
        target: &CompareTarget,
        operator: CompareOperator,
        value: &FieldValue,
    ) -> Result<(), ValidationFailure> {
        if compare_holds(value, target, operator) {
            return Ok(());
        }
        Err(self.prompt.fail_or(|| {
            let target = match target {
                CompareTarget::Number(n) => format_number(*n),
                CompareTarget::Text(s) => s.clone(),
            };
            messages::compare_message(self.prompt.kind, operator, &target)
        }))
    }

    fn check_special(&self, special: SpecialCheck, value: &FieldValue) -> Result<(), ValidationFailure> {
        match special {
            SpecialCheck::SettleCycleDay(cycle) => {
                let max = cycle.max_day();
                let text = value.to_string();
                let within = POSITIVE_INTEGER.is_match(&text)
                    && text
                        .parse::<f64>()
                        .map(|day| day >= 1.0 && day <= f64::from(max))
                        .unwrap_or(false);
                if within {
                    return Ok(());
                }
                Err(self
                    .prompt
                    .fail_or(|| messages::max_message(self.prompt.kind, max)))
            }
        }
    }
}

impl Serialize for Validator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.check.serialize(serializer)
    }
}

/// Equality is strict (same kind, same value). Ordering compares two
/// strings lexically and anything else numerically; `NaN` satisfies nothing.
fn compare_holds(value: &FieldValue, target: &CompareTarget, operator: CompareOperator) -> bool {
    if operator == CompareOperator::Eq {
        return match (value, target) {
            (FieldValue::Number(a), CompareTarget::Number(b)) => a == b,
            (FieldValue::String(a), CompareTarget::Text(b)) => a == b,
            _ => false,
        };
    }

    let ordering = match (value, target) {
        (FieldValue::String(a), CompareTarget::Text(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => value.as_number().partial_cmp(&target.to_value().as_number()),
    };

    match ordering {
        None => false,
        Some(ordering) => match operator {
            CompareOperator::Lt => ordering == Ordering::Less,
            CompareOperator::Gt => ordering == Ordering::Greater,
            CompareOperator::Le => ordering != Ordering::Greater,
            CompareOperator::Ge => ordering != Ordering::Less,
            CompareOperator::Eq => ordering == Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn validator(check: Check) -> Validator {
        Validator::new(
            check,
            Prompt {
                kind: PromptKind::Input,
                text: "金额".to_string(),
                fail_text: None,
            },
        )
    }

    #[test]
    fn test_required_zero_is_exempt() {
        let required = validator(Check::Required);
        assert!(required.validate(&FieldValue::from(0)).is_ok());
        assert_eq!(
            required.validate(&FieldValue::Null).unwrap_err().message,
            "请输入金额"
        );
        assert_eq!(
            required.validate(&FieldValue::from("   ")).unwrap_err().message,
            messages::BLANK_MESSAGE
        );
    }

    #[rstest]
    #[case(CompareOperator::Lt, 7.0, true)]
    #[case(CompareOperator::Lt, 8.0, false)]
    #[case(CompareOperator::Eq, 8.0, true)]
    #[case(CompareOperator::Gt, 9.0, true)]
    #[case(CompareOperator::Le, 8.0, true)]
    #[case(CompareOperator::Ge, 7.0, false)]
    fn test_compare_numbers(#[case] operator: CompareOperator, #[case] value: f64, #[case] expected: bool) {
        let target = CompareTarget::Number(8.0);
        assert_eq!(compare_holds(&FieldValue::from(value), &target, operator), expected);
    }

    #[test]
    fn test_compare_equality_is_strict() {
        let target = CompareTarget::Number(8.0);
        assert!(!compare_holds(&FieldValue::from("8"), &target, CompareOperator::Eq));
        assert!(compare_holds(&FieldValue::from("9"), &target, CompareOperator::Gt));
    }

    #[test]
    fn test_compare_strings_lexically() {
        let target = CompareTarget::from("b");
        assert!(compare_holds(&FieldValue::from("a"), &target, CompareOperator::Lt));
        assert!(compare_holds(&FieldValue::from("b"), &target, CompareOperator::Eq));
        assert!(!compare_holds(&FieldValue::from("abc"), &target, CompareOperator::Ge));
    }

    #[test]
    fn test_compare_nan_never_holds() {
        let target = CompareTarget::Number(1.0);
        assert!(!compare_holds(&FieldValue::from("abc"), &target, CompareOperator::Le));
        assert!(!compare_holds(&FieldValue::from("abc"), &target, CompareOperator::Ge));
    }

    #[rstest]
    #[case("0", 999)]
    #[case("1", 7)]
    #[case("2", 28)]
    #[case("", 28)]
    fn test_settle_cycle_codes(#[case] code: &str, #[case] max: u32) {
        assert_eq!(SettleCycle::from_code(code).max_day(), max);
    }

    #[test]
    fn test_settle_day_rejects_non_integers() {
        let check = validator(Check::Special {
            special: SpecialCheck::SettleCycleDay(SettleCycle::Monthly),
        });
        assert!(check.validate(&FieldValue::from("15")).is_ok());
        assert!(check.validate(&FieldValue::from(15)).is_ok());
        assert!(check.validate(&FieldValue::from("1.5")).is_err());
        assert!(check.validate(&FieldValue::from("-3")).is_err());
        assert_eq!(
            check.validate(&FieldValue::from("29")).unwrap_err().message,
            "请输入小于等于28的数字"
        );
    }

    #[test]
    fn test_unknown_special_key() {
        let special = Special {
            key: "key9".to_string(),
            settle_cycle: String::new(),
        };
        assert!(matches!(
            SpecialCheck::resolve(&special),
            Err(RuleError::UnknownSpecialKey(key)) if key == "key9"
        ));
    }

    #[test]
    fn test_validate_with_reports_once() {
        let check = validator(Check::NumInterval {
            lower: 0.0,
            upper: 10.0,
        });
        let mut reports = Vec::new();
        check.validate_with(&FieldValue::from(5), |outcome| reports.push(outcome));
        check.validate_with(&FieldValue::from(50), |outcome| reports.push(outcome));
        assert_eq!(reports.len(), 2);
        assert!(reports[0].is_none());
        assert_eq!(
            reports[1].as_ref().map(|failure| failure.message.as_str()),
            Some("请输入0-10的数字")
        );
    }

    #[test]
    fn test_check_serialization() {
        let json = serde_json::to_value(validator(Check::Special {
            special: SpecialCheck::SettleCycleDay(SettleCycle::Weekly),
        }))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"check": "special", "special": {"key1": "weekly"}})
        );

        let json = serde_json::to_value(validator(Check::Pattern {
            regex: Regex::new("^[a-z]+$").unwrap(),
        }))
        .unwrap();
        assert_eq!(json, serde_json::json!({"check": "pattern", "regex": "^[a-z]+$"}));
    }
}
