// File: src/descriptor.rs
// Purpose: Rule descriptors handed to the host form library

use serde::Serialize;

use crate::checks::Validator;
use crate::error::ValidationFailure;
use crate::spec::Trigger;
use crate::value::FieldValue;

/// One entry of a field's rule list: `{ required, trigger, validator }`
///
/// Field names match what callback-based form libraries expect, so the
/// serialized form can be handed to a client unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct RuleDescriptor {
    pub required: bool,
    pub trigger: Trigger,
    pub validator: Validator,
}

impl RuleDescriptor {
    pub fn validate(&self, value: &FieldValue) -> Result<(), ValidationFailure> {
        self.validator.validate(value)
    }

    /// Whether this rule should run for a given event name
    pub fn runs_on(&self, event: &str) -> bool {
        self.trigger.events().iter().any(|name| *name == event)
    }
}

/// Run a field's rules in order and stop at the first failure
pub fn validate_all(rules: &[RuleDescriptor], value: &FieldValue) -> Result<(), ValidationFailure> {
    rules.iter().try_for_each(|rule| rule.validate(value))
}
