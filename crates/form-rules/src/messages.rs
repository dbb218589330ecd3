//! Fixed phrases used to assemble failure messages

use crate::spec::{CompareOperator, PromptKind};
use crate::value::format_number;

/// Shown when a required field holds nothing but whitespace
pub const BLANK_MESSAGE: &str = "不可全部输入空格";

impl PromptKind {
    pub fn verb(&self) -> &'static str {
        match self {
            PromptKind::Input => "请输入",
            PromptKind::Select => "请选择",
            PromptKind::Upload => "请上传",
        }
    }
}

impl CompareOperator {
    pub fn word(&self) -> &'static str {
        match self {
            CompareOperator::Lt => "小于",
            CompareOperator::Eq => "等于",
            CompareOperator::Gt => "大于",
            CompareOperator::Le => "小于等于",
            CompareOperator::Ge => "大于等于",
        }
    }
}

/// 请输入手机号
pub fn required_message(kind: PromptKind, prompt_text: &str) -> String {
    format!("{}{}", kind.verb(), prompt_text)
}

/// 请输入符合格式的手机号
pub fn format_message(kind: PromptKind, prompt_text: &str) -> String {
    format!("{}符合格式的{}", kind.verb(), prompt_text)
}

/// 请输入0-100的数字
pub fn num_interval_message(kind: PromptKind, lower: f64, upper: f64) -> String {
    format!(
        "{}{}-{}的数字",
        kind.verb(),
        format_number(lower),
        format_number(upper)
    )
}

/// 请输入2024-01-01-2024-12-31的日期
pub fn date_interval_message(kind: PromptKind, lower: &str, upper: &str) -> String {
    format!("{}{}-{}的日期", kind.verb(), lower, upper)
}

/// 请输入大于等于8的数字
pub fn compare_message(kind: PromptKind, operator: CompareOperator, target: &str) -> String {
    format!("{}{}{}的数字", kind.verb(), operator.word(), target)
}

/// 请输入小于等于7的数字
pub fn max_message(kind: PromptKind, max: u32) -> String {
    format!("{}小于等于{}的数字", kind.verb(), max)
}
