// File: src/schema.rs
// Purpose: Whole-form rule definitions loaded from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::builder::{AssemblyStrategy, RuleBuilder};
use crate::descriptor::{validate_all, RuleDescriptor};
use crate::error::RuleError;
use crate::spec::ValidationSpec;
use crate::validation::ValidationResult;
use crate::value::FieldValue;

/// Rule definitions for every field of a form
///
/// ```toml
/// [options]
/// assembly = "merged"
///
/// [fields.mobile]
/// isRequired = true
/// promptText = "手机号"
/// regKey = "phone"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub options: SchemaOptions,

    #[serde(default)]
    pub fields: BTreeMap<String, ValidationSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaOptions {
    #[serde(default)]
    pub assembly: AssemblyStrategy,
}

impl FormSchema {
    /// Load a schema from a TOML file
    ///
    /// A missing or empty file yields an empty schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form schema: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse form schema: {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let schema: FormSchema = toml::from_str(content)?;
        Ok(schema)
    }

    pub fn builder(&self) -> RuleBuilder {
        RuleBuilder::with_strategy(self.options.assembly)
    }

    /// Build the rule lists for every field, keyed by field name
    pub fn build_rules(&self) -> Result<BTreeMap<String, Vec<RuleDescriptor>>, RuleError> {
        let builder = self.builder();
        let rules = self
            .fields
            .iter()
            .map(|(name, spec)| {
                builder
                    .build(spec)
                    .map(|rules| (name.clone(), rules))
                    .map_err(|err| err.in_field(name.as_str()))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        debug!(fields = rules.len(), "built form schema rules");
        Ok(rules)
    }

    /// Run every field's rules against submitted values
    ///
    /// Fields absent from `values` are validated as empty. Each field reports
    /// only its first failure, the message a form would show.
    pub fn validate_form(&self, values: &HashMap<String, FieldValue>) -> Result<ValidationResult, RuleError> {
        let mut result = ValidationResult::success();
        let empty = FieldValue::Null;

        for (name, rules) in self.build_rules()? {
            let value = values.get(&name).unwrap_or(&empty);
            if let Err(failure) = validate_all(&rules, value) {
                result.add_error(name.as_str(), failure.message);
            }
        }

        Ok(result)
    }
}
