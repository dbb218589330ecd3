//! form-rules WASM
//!
//! WebAssembly bindings that hand form-rules descriptors to JavaScript form
//! libraries. Each rule is a plain `{ required, trigger, validator }`
//! object; `validator(rule, value, callback)` calls `callback()` when the
//! value passes and `callback(new Error(message))` when it does not.

use form_rules::{build_rules, validate_all, FieldValue, PatternKey, RuleDescriptor, ValidationSpec};
use js_sys::{Array, Function, Object, Reflect, RegExp};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::console;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Build the rule list for one field
///
/// Accepts the same object the JavaScript helper took, including the older
/// `tipType` / `tipText` / `tigMethod` names. `pattern` may be a `RegExp`
/// or a source string; it must use syntax the Rust regex engine supports
/// (no look-around or back-references).
///
/// # Example (JavaScript)
/// ```javascript
/// const rules = ruleVerify({
///     isRequired: true,
///     promptText: '手机号',
///     regKey: 'phone',
///     triggerMode: 'both'
/// });
/// ```
///
/// Throws when the configuration can never produce a working validator
/// (unknown `regKey`, unknown `special.key`, invalid pattern, inverted bounds).
#[wasm_bindgen(js_name = ruleVerify)]
pub fn rule_verify(spec: JsValue) -> Result<Array, JsValue> {
    let rules = rules_from_js(&spec)?;

    let array = Array::new();
    for rule in rules {
        array.push(&descriptor_to_js(rule)?);
    }
    Ok(array)
}

/// Run a field's rules against a value without going through callbacks
///
/// Returns the first failure message, or `undefined` when the value passes.
#[wasm_bindgen(js_name = validateValue)]
pub fn validate_value(spec: JsValue, value: JsValue) -> Result<Option<String>, JsValue> {
    let rules = rules_from_js(&spec)?;
    let value = field_value_from_js(&value);
    Ok(validate_all(&rules, &value).err().map(|failure| failure.message))
}

/// Keys accepted by `regKey`
#[wasm_bindgen(js_name = patternKeys)]
pub fn pattern_keys() -> Array {
    PatternKey::ALL
        .iter()
        .map(|key| JsValue::from_str(key.as_str()))
        .collect()
}

fn rules_from_js(spec: &JsValue) -> Result<Vec<RuleDescriptor>, JsValue> {
    let spec = spec_from_js(spec)?;
    build_rules(&spec).map_err(|err| {
        let message = err.to_string();
        console::warn_2(&"form-rules: invalid field configuration".into(), &message.as_str().into());
        JsValue::from(js_sys::Error::new(&message))
    })
}

/// Deserialize a spec object, lifting a `RegExp` pattern into its source
fn spec_from_js(spec: &JsValue) -> Result<ValidationSpec, JsValue> {
    let source = spec
        .dyn_ref::<Object>()
        .ok_or_else(|| JsValue::from(js_sys::Error::new("ruleVerify expects an object")))?;

    // Work on a shallow copy so the caller's object is left untouched
    let copy = Object::assign(&Object::new(), source);
    let pattern_key = JsValue::from_str("pattern");
    let pattern = Reflect::get(&copy, &pattern_key)?;
    Reflect::delete_property(&copy, &pattern_key)?;

    let mut parsed: ValidationSpec = serde_wasm_bindgen::from_value(copy.into())?;
    parsed.pattern = match pattern.dyn_ref::<RegExp>() {
        Some(regexp) => Some(regexp_source(regexp)),
        None => pattern.as_string(),
    };
    Ok(parsed)
}

/// Translate a JavaScript `RegExp` into a Rust regex source, carrying over
/// the `i`, `m` and `s` flags
fn regexp_source(regexp: &RegExp) -> String {
    let source = ascii_perl_classes(&String::from(regexp.source()));
    let flags: String = String::from(regexp.flags())
        .chars()
        .filter(|flag| matches!(flag, 'i' | 'm' | 's'))
        .collect();

    if flags.is_empty() {
        source
    } else {
        format!("(?{}){}", flags, source)
    }
}

/// Pin `\d`, `\w` and `\b` to their ASCII meaning
///
/// JavaScript reads these classes as ASCII only, while the Rust regex engine
/// would otherwise accept any Unicode digit or letter. Inside a character
/// class the replacement is a nested class, and `[\b]` is a backspace.
fn ascii_perl_classes(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut in_class = false;
    let mut chars = source.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('d') => out.push_str("[0-9]"),
                Some('D') => out.push_str("[^0-9]"),
                Some('w') => out.push_str("[0-9A-Za-z_]"),
                Some('W') => out.push_str("[^0-9A-Za-z_]"),
                Some('b') if in_class => out.push_str("\\x08"),
                Some(boundary @ ('b' | 'B')) => {
                    out.push_str("(?-u:\\");
                    out.push(boundary);
                    out.push(')');
                }
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn field_value_from_js(value: &JsValue) -> FieldValue {
    if value.is_null() || value.is_undefined() {
        FieldValue::Null
    } else if let Some(b) = value.as_bool() {
        FieldValue::Bool(b)
    } else if let Some(n) = value.as_f64() {
        FieldValue::Number(n)
    } else if let Some(s) = value.as_string() {
        FieldValue::String(s)
    } else if Array::is_array(value) {
        FieldValue::Array(Array::from(value).iter().map(|item| field_value_from_js(&item)).collect())
    } else {
        serde_wasm_bindgen::from_value(value.clone())
            .unwrap_or_else(|_| FieldValue::Object(Default::default()))
    }
}

fn descriptor_to_js(rule: RuleDescriptor) -> Result<JsValue, JsValue> {
    let object = Object::new();
    Reflect::set(&object, &"required".into(), &JsValue::from_bool(rule.required))?;
    Reflect::set(&object, &"trigger".into(), &serde_wasm_bindgen::to_value(&rule.trigger)?)?;

    let validator = rule.validator;
    let callback = Closure::<dyn Fn(JsValue, JsValue, Function)>::new(
        move |_rule: JsValue, value: JsValue, report: Function| {
            let value = field_value_from_js(&value);
            let outcome = match validator.validate(&value) {
                Ok(()) => report.call0(&JsValue::NULL),
                Err(failure) => report.call1(
                    &JsValue::NULL,
                    &js_sys::Error::new(&failure.message).into(),
                ),
            };
            if let Err(err) = outcome {
                console::error_2(&"form-rules: validation callback threw".into(), &err);
            }
        },
    );
    Reflect::set(&object, &"validator".into(), &callback.into_js_value())?;

    Ok(object.into())
}
