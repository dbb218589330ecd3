//! form-rules
//!
//! Declare what a form field needs (required, a named or ad-hoc pattern,
//! numeric or date bounds, a comparison, a domain-specific check) and get
//! back the `{ required, trigger, validator }` rule list a callback-based
//! form library consumes.
//!
//! ```
//! use form_rules::{build_rules, FieldValue, ValidationSpec};
//!
//! let rules = build_rules(&ValidationSpec::new("手机号").required().reg_key("phone")).unwrap();
//! assert_eq!(rules.len(), 2);
//! assert!(rules[1].validate(&FieldValue::from("13812345678")).is_ok());
//! assert_eq!(
//!     rules[0].validate(&FieldValue::from("")).unwrap_err().message,
//!     "请输入手机号"
//! );
//! ```

pub mod builder;
pub mod checks;
pub mod descriptor;
pub mod error;
pub mod messages;
pub mod registry;
pub mod schema;
pub mod spec;
pub mod validation;
pub mod value;

pub use builder::{build_rules, AssemblyStrategy, RuleBuilder};
pub use checks::{Check, SettleCycle, SpecialCheck, Validator};
pub use descriptor::{validate_all, RuleDescriptor};
pub use error::{RuleError, ValidationFailure};
pub use registry::{lookup, Matcher, NamedPattern, PatternKey};
pub use schema::{FormSchema, SchemaOptions};
pub use spec::{
    Compare, CompareOperator, CompareTarget, PromptKind, Special, Trigger, ValidationSpec,
};
pub use validation::ValidationResult;
pub use value::FieldValue;
