// File: src/spec.rs
// Purpose: Declarative description of one form field's validation needs

use serde::{Deserialize, Serialize, Serializer};

use crate::value::FieldValue;

/// Which verb prefixes generated messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "LegacyCode")]
pub enum PromptKind {
    /// 请输入 (text inputs)
    #[default]
    Input,
    /// 请选择 (selects, pickers)
    Select,
    /// 请上传 (uploads)
    Upload,
}

/// When the host form library should run a field's validators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "LegacyCode")]
pub enum Trigger {
    /// Validate when the field loses focus
    #[default]
    Blur,
    /// Validate on every change
    Change,
    /// Validate on blur and on change
    Both,
}

impl Trigger {
    /// Event names this trigger listens to
    pub fn events(&self) -> &'static [&'static str] {
        match self {
            Trigger::Blur => &["blur"],
            Trigger::Change => &["change"],
            Trigger::Both => &["blur", "change"],
        }
    }
}

/// `"blur"`, `"change"` or `["blur", "change"]`, the shape form libraries expect
impl Serialize for Trigger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Trigger::Both => self.events().serialize(serializer),
            single => serializer.serialize_str(single.events()[0]),
        }
    }
}

/// Comparison operator for [`Compare`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "LegacyCode")]
pub enum CompareOperator {
    Lt,
    Eq,
    Gt,
    Le,
    Ge,
}

/// Right-hand side of a comparison
///
/// Numbers cover "must be at least N" fields; strings cover equality
/// checks such as a confirmation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompareTarget {
    Number(f64),
    Text(String),
}

impl CompareTarget {
    pub fn to_value(&self) -> FieldValue {
        match self {
            CompareTarget::Number(n) => FieldValue::Number(*n),
            CompareTarget::Text(s) => FieldValue::String(s.clone()),
        }
    }
}

impl From<f64> for CompareTarget {
    fn from(n: f64) -> Self {
        CompareTarget::Number(n)
    }
}

impl From<i32> for CompareTarget {
    fn from(n: i32) -> Self {
        CompareTarget::Number(n as f64)
    }
}

impl From<&str> for CompareTarget {
    fn from(s: &str) -> Self {
        CompareTarget::Text(s.to_string())
    }
}

impl From<String> for CompareTarget {
    fn from(s: String) -> Self {
        CompareTarget::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compare {
    #[serde(alias = "targetVal")]
    pub target_value: CompareTarget,
    #[serde(alias = "compareType")]
    pub operator: CompareOperator,
}

/// Selects one of the domain-specific checks by key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Special {
    pub key: String,
    /// `"0"` daily, `"1"` weekly, anything else monthly
    #[serde(default)]
    pub settle_cycle: String,
}

/// Validation needs of a single form field
///
/// Every category field that is set contributes its own rule. Empty
/// strings in `pattern`, `reg_key` and `fail_text` count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationSpec {
    pub is_required: bool,

    #[serde(alias = "tipType")]
    pub prompt_kind: PromptKind,

    /// Noun naming the field, e.g. "手机号"
    #[serde(alias = "tipText")]
    pub prompt_text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_text: Option<String>,

    #[serde(alias = "tigMethod")]
    pub trigger_mode: Trigger,

    /// Regex source, compiled when rules are built
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Key into the named pattern registry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_interval: Option<(f64, f64)>,

    /// Inclusive bounds compared as strings, so both must share one format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_interval: Option<(String, String)>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare: Option<Compare>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<Special>,
}

impl ValidationSpec {
    pub fn new(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn prompt_kind(mut self, kind: PromptKind) -> Self {
        self.prompt_kind = kind;
        self
    }

    pub fn fail_text(mut self, text: impl Into<String>) -> Self {
        self.fail_text = Some(text.into());
        self
    }

    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger_mode = trigger;
        self
    }

    pub fn pattern(mut self, source: impl Into<String>) -> Self {
        self.pattern = Some(source.into());
        self
    }

    pub fn reg_key(mut self, key: impl Into<String>) -> Self {
        self.reg_key = Some(key.into());
        self
    }

    pub fn num_interval(mut self, lower: f64, upper: f64) -> Self {
        self.num_interval = Some((lower, upper));
        self
    }

    pub fn date_interval(mut self, lower: impl Into<String>, upper: impl Into<String>) -> Self {
        self.date_interval = Some((lower.into(), upper.into()));
        self
    }

    pub fn compare(mut self, operator: CompareOperator, target: impl Into<CompareTarget>) -> Self {
        self.compare = Some(Compare {
            target_value: target.into(),
            operator,
        });
        self
    }

    pub fn special(mut self, key: impl Into<String>, settle_cycle: impl Into<String>) -> Self {
        self.special = Some(Special {
            key: key.into(),
            settle_cycle: settle_cycle.into(),
        });
        self
    }

    /// `fail_text` when it is set and non-empty
    pub(crate) fn effective_fail_text(&self) -> Option<&str> {
        self.fail_text.as_deref().filter(|text| !text.is_empty())
    }
}

/// Enumerations accept either their name or the integer code used by
/// older form definitions
#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyCode {
    Index(u8),
    Name(String),
    Names(Vec<String>),
}

impl TryFrom<LegacyCode> for PromptKind {
    type Error = String;

    fn try_from(code: LegacyCode) -> Result<Self, Self::Error> {
        match code {
            LegacyCode::Index(0) => Ok(PromptKind::Input),
            LegacyCode::Index(1) => Ok(PromptKind::Select),
            LegacyCode::Index(2) => Ok(PromptKind::Upload),
            LegacyCode::Name(name) => match name.to_ascii_lowercase().as_str() {
                "input" => Ok(PromptKind::Input),
                "select" => Ok(PromptKind::Select),
                "upload" => Ok(PromptKind::Upload),
                _ => Err(format!("unknown prompt kind `{}`", name)),
            },
            LegacyCode::Index(n) => Err(format!("prompt kind code {} out of range 0..=2", n)),
            LegacyCode::Names(_) => Err("prompt kind must be a single value".to_string()),
        }
    }
}

impl TryFrom<LegacyCode> for Trigger {
    type Error = String;

    fn try_from(code: LegacyCode) -> Result<Self, Self::Error> {
        match code {
            LegacyCode::Index(0) => Ok(Trigger::Blur),
            LegacyCode::Index(1) => Ok(Trigger::Change),
            LegacyCode::Index(2) => Ok(Trigger::Both),
            LegacyCode::Index(n) => Err(format!("trigger code {} out of range 0..=2", n)),
            LegacyCode::Name(name) => match name.to_ascii_lowercase().as_str() {
                "blur" => Ok(Trigger::Blur),
                "change" => Ok(Trigger::Change),
                "both" => Ok(Trigger::Both),
                _ => Err(format!("unknown trigger `{}`", name)),
            },
            LegacyCode::Names(names) => {
                let has = |event: &str| names.iter().any(|n| n.eq_ignore_ascii_case(event));
                match (has("blur"), has("change")) {
                    (true, true) => Ok(Trigger::Both),
                    (true, false) => Ok(Trigger::Blur),
                    (false, true) => Ok(Trigger::Change),
                    (false, false) => Err(format!("no known trigger in {:?}", names)),
                }
            }
        }
    }
}

impl TryFrom<LegacyCode> for CompareOperator {
    type Error = String;

    fn try_from(code: LegacyCode) -> Result<Self, Self::Error> {
        match code {
            LegacyCode::Index(0) => Ok(CompareOperator::Lt),
            LegacyCode::Index(1) => Ok(CompareOperator::Eq),
            LegacyCode::Index(2) => Ok(CompareOperator::Gt),
            LegacyCode::Index(3) => Ok(CompareOperator::Le),
            LegacyCode::Index(4) => Ok(CompareOperator::Ge),
            LegacyCode::Index(n) => Err(format!("compare code {} out of range 0..=4", n)),
            LegacyCode::Name(name) => match name.to_ascii_uppercase().as_str() {
                "LT" | "<" => Ok(CompareOperator::Lt),
                "EQ" | "=" | "==" => Ok(CompareOperator::Eq),
                "GT" | ">" => Ok(CompareOperator::Gt),
                "LE" | "<=" => Ok(CompareOperator::Le),
                "GE" | ">=" => Ok(CompareOperator::Ge),
                _ => Err(format!("unknown compare operator `{}`", name)),
            },
            LegacyCode::Names(_) => Err("compare operator must be a single value".to_string()),
        }
    }
}
