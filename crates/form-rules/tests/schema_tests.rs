//! Form schema loading and whole-form validation

use form_rules::{AssemblyStrategy, FieldValue, FormSchema};
use std::collections::HashMap;
use std::fs;

const SIGNUP_FORM: &str = r#"
[fields.mobile]
isRequired = true
promptText = "手机号"
regKey = "phone"
triggerMode = "both"

[fields.age]
promptText = "年龄"
numInterval = [18, 120]

[fields.settleDay]
isRequired = true
promptKind = "select"
promptText = "结算日"
special = { key = "key1", settleCycle = "1" }
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_build_rules_per_field() {
    init_tracing();
    let schema = FormSchema::from_toml_str(SIGNUP_FORM).unwrap();
    let rules = schema.build_rules().unwrap();

    let names: Vec<&str> = rules.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["age", "mobile", "settleDay"]);
    assert_eq!(rules["mobile"].len(), 2);
    assert_eq!(rules["age"].len(), 1);
    assert_eq!(rules["settleDay"].len(), 2);
}

#[test]
fn test_validate_form_collects_failures() {
    init_tracing();
    let schema = FormSchema::from_toml_str(SIGNUP_FORM).unwrap();

    let mut values = HashMap::new();
    values.insert("mobile".to_string(), FieldValue::from("12345"));
    values.insert("age".to_string(), FieldValue::from(17));

    let result = schema.validate_form(&values).unwrap();
    assert!(!result.is_valid);
    assert_eq!(
        result.get_error("mobile").map(String::as_str),
        Some("请输入符合格式的手机号")
    );
    assert_eq!(
        result.get_error("age").map(String::as_str),
        Some("请输入18-120的数字")
    );
    assert_eq!(
        result.get_error("settleDay").map(String::as_str),
        Some("请选择结算日")
    );
}

#[test]
fn test_validate_form_accepts_valid_values() {
    let schema = FormSchema::from_toml_str(SIGNUP_FORM).unwrap();

    let values: HashMap<String, FieldValue> = serde_json::from_str::<HashMap<String, serde_json::Value>>(
        r#"{"mobile": "13812345678", "age": 30, "settleDay": "5"}"#,
    )
    .unwrap()
    .into_iter()
    .map(|(name, value)| (name, FieldValue::from(value)))
    .collect();

    let result = schema.validate_form(&values).unwrap();
    assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("form-rules-schema-{}.toml", std::process::id()));
    fs::write(&path, format!("[options]\nassembly = \"merged\"\n{}", SIGNUP_FORM)).unwrap();

    let schema = FormSchema::load(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(schema.options.assembly, AssemblyStrategy::Merged);
    assert_eq!(schema.fields.len(), 3);
}

#[test]
fn test_load_reports_parse_errors_with_path() {
    let path = std::env::temp_dir().join(format!("form-rules-broken-{}.toml", std::process::id()));
    fs::write(&path, "[fields.mobile]\nregKey = ").unwrap();

    let err = FormSchema::load(&path).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(err.to_string().contains("Failed to parse form schema"));
}
