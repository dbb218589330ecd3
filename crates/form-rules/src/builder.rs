// File: src/builder.rs
// Purpose: Turn a ValidationSpec into an ordered list of rule descriptors

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::checks::{Check, Prompt, SpecialCheck, Validator};
use crate::descriptor::RuleDescriptor;
use crate::error::RuleError;
use crate::registry::PatternKey;
use crate::spec::ValidationSpec;
use crate::value::format_number;

/// How checks are grouped into descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssemblyStrategy {
    /// One descriptor per configured category
    #[default]
    PerCategory,
    /// At most two descriptors: the required check, then the first
    /// configured category
    Merged,
}

/// Builds rule descriptors from field specs
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBuilder {
    strategy: AssemblyStrategy,
}

impl RuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: AssemblyStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> AssemblyStrategy {
        self.strategy
    }

    /// Build the descriptors for one field
    ///
    /// Categories are emitted in a fixed order: required, named pattern,
    /// pattern, numeric interval, date interval, compare, special. Every
    /// descriptor shares the spec's `required` flag and trigger.
    pub fn build(&self, spec: &ValidationSpec) -> Result<Vec<RuleDescriptor>, RuleError> {
        let checks = collect_checks(spec).inspect_err(|err| {
            warn!(prompt = %spec.prompt_text, error = %err, "rejected field configuration");
        })?;

        let checks = match self.strategy {
            AssemblyStrategy::PerCategory => checks,
            AssemblyStrategy::Merged => merge(checks),
        };

        let prompt = Prompt::from_spec(spec);
        let rules: Vec<RuleDescriptor> = checks
            .into_iter()
            .map(|check| RuleDescriptor {
                required: spec.is_required,
                trigger: spec.trigger_mode,
                validator: Validator::new(check, prompt.clone()),
            })
            .collect();

        debug!(
            prompt = %spec.prompt_text,
            rules = rules.len(),
            strategy = ?self.strategy,
            "built form rules"
        );
        Ok(rules)
    }
}

/// Build a field's descriptors with the default per-category strategy
pub fn build_rules(spec: &ValidationSpec) -> Result<Vec<RuleDescriptor>, RuleError> {
    RuleBuilder::default().build(spec)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn collect_checks(spec: &ValidationSpec) -> Result<Vec<Check>, RuleError> {
    let mut checks = Vec::new();

    if spec.is_required {
        checks.push(Check::Required);
    }

    if let Some(key) = non_empty(&spec.reg_key) {
        checks.push(Check::NamedPattern {
            key: key.parse::<PatternKey>()?,
        });
    }

    if let Some(source) = non_empty(&spec.pattern) {
        let regex = Regex::new(source).map_err(|source_err| RuleError::InvalidPattern {
            pattern: source.to_string(),
            source: source_err,
        })?;
        checks.push(Check::Pattern { regex });
    }

    if let Some((lower, upper)) = spec.num_interval {
        if lower.is_nan() || upper.is_nan() {
            return Err(RuleError::InvalidBound {
                field: "numInterval",
            });
        }
        if lower > upper {
            return Err(RuleError::InvertedInterval {
                field: "numInterval",
                lower: format_number(lower),
                upper: format_number(upper),
            });
        }
        checks.push(Check::NumInterval { lower, upper });
    }

    if let Some((lower, upper)) = &spec.date_interval {
        if lower > upper {
            return Err(RuleError::InvertedInterval {
                field: "dateInterval",
                lower: lower.clone(),
                upper: upper.clone(),
            });
        }
        checks.push(Check::DateInterval {
            lower: lower.clone(),
            upper: upper.clone(),
        });
    }

    if let Some(compare) = &spec.compare {
        checks.push(Check::Compare {
            target: compare.target_value.clone(),
            operator: compare.operator,
        });
    }

    if let Some(special) = &spec.special {
        checks.push(Check::Special {
            special: SpecialCheck::resolve(special)?,
        });
    }

    Ok(checks)
}

fn merge(checks: Vec<Check>) -> Vec<Check> {
    let (required, rest): (Vec<Check>, Vec<Check>) = checks
        .into_iter()
        .partition(|check| matches!(check, Check::Required));
    required.into_iter().chain(rest.into_iter().take(1)).collect()
}
