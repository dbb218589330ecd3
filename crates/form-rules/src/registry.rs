// File: src/registry.rs
// Purpose: Named validation patterns addressable by key

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::RuleError;

/// Symbols accepted in the `passwords` pattern (escaped for a character class)
const PASSWORD_SYMBOLS: &str = r##"`\~!@\#$%\^\&*()\\\[\]{}<>,.?/";:'_+=| \-"##;

/// Characters allowed in the local part of an email address
const EMAIL_LOCAL: &str = r"[0-9A-Za-z_!\#$%\&'*+/=?\^`{|}\~\-]";

/// One label of an email domain
const EMAIL_LABEL: &str = r"[0-9A-Za-z_](?:[0-9A-Za-z_\-]*[0-9A-Za-z_])?";

/// Keys of the built-in pattern registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternKey {
    /// 18-digit mainland resident identity number
    IdNumber,
    /// 6-16 characters mixing letters, digits and symbols
    Passwords,
    /// Landline (with area code) or mobile number
    ContactNumber,
    /// Mobile number only
    Phone,
    Email,
    /// 6-10 characters mixing letters, digits and any other character
    Pwd,
    /// 0-99999999 with at most two decimal places
    NumInterval,
}

impl PatternKey {
    pub const ALL: [PatternKey; 7] = [
        PatternKey::IdNumber,
        PatternKey::Passwords,
        PatternKey::ContactNumber,
        PatternKey::Phone,
        PatternKey::Email,
        PatternKey::Pwd,
        PatternKey::NumInterval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKey::IdNumber => "idNumber",
            PatternKey::Passwords => "passwords",
            PatternKey::ContactNumber => "contactNumber",
            PatternKey::Phone => "phone",
            PatternKey::Email => "email",
            PatternKey::Pwd => "pwd",
            PatternKey::NumInterval => "numInterval",
        }
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternKey {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| RuleError::UnknownPatternKey(s.to_string()))
    }
}

/// How a registry entry decides whether a value conforms
#[derive(Debug)]
pub enum Matcher {
    Regex(Regex),
    /// Every regex must match; stands in for look-ahead requirements
    AllOf(Vec<Regex>),
}

impl Matcher {
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Matcher::Regex(regex) => regex.is_match(value),
            Matcher::AllOf(regexes) => regexes.iter().all(|regex| regex.is_match(value)),
        }
    }
}

/// A registry entry: matcher plus an optional canned failure tip
#[derive(Debug)]
pub struct NamedPattern {
    pub key: PatternKey,
    pub matcher: Matcher,
    pub tip: Option<&'static str>,
}

fn compile(source: &str) -> Regex {
    Regex::new(source).unwrap_or_else(|err| panic!("built-in pattern `{}` is invalid: {}", source, err))
}

static ID_NUMBER: Lazy<NamedPattern> = Lazy::new(|| NamedPattern {
    key: PatternKey::IdNumber,
    matcher: Matcher::Regex(compile(
        r"^[1-9][0-9]{5}(18|19|[23][0-9])[0-9]{2}(0[1-9]|10|11|12)([0-2][1-9]|10|20|30|31)[0-9]{3}[0-9Xx]$",
    )),
    tip: None,
});

static PASSWORDS: Lazy<NamedPattern> = Lazy::new(|| NamedPattern {
    key: PatternKey::Passwords,
    matcher: Matcher::AllOf(vec![
        compile(&format!("^[0-9a-zA-Z{}]{{6,16}}$", PASSWORD_SYMBOLS)),
        compile("[0-9]"),
        compile("[a-zA-Z]"),
        compile(&format!("[{}]", PASSWORD_SYMBOLS)),
    ]),
    tip: None,
});

static CONTACT_NUMBER: Lazy<NamedPattern> = Lazy::new(|| NamedPattern {
    key: PatternKey::ContactNumber,
    matcher: Matcher::Regex(compile(
        r"^((0[0-9]{2,3}-?[0-9]{7,8})|(1[3465789][0-9]{9}))$",
    )),
    tip: None,
});

static PHONE: Lazy<NamedPattern> = Lazy::new(|| NamedPattern {
    key: PatternKey::Phone,
    matcher: Matcher::Regex(compile(r"^1[3456789][0-9]{9}$")),
    tip: None,
});

static EMAIL: Lazy<NamedPattern> = Lazy::new(|| NamedPattern {
    key: PatternKey::Email,
    matcher: Matcher::Regex(compile(&format!(
        r"{local}+(?:\.{local}+)*@(?:{label}\.)+{label}",
        local = EMAIL_LOCAL,
        label = EMAIL_LABEL,
    ))),
    tip: None,
});

static PWD: Lazy<NamedPattern> = Lazy::new(|| NamedPattern {
    key: PatternKey::Pwd,
    matcher: Matcher::AllOf(vec![
        compile(r"^.{6,10}$"),
        compile("[0-9]"),
        compile("[a-zA-Z]"),
        compile("[^a-zA-Z0-9]"),
    ]),
    tip: None,
});

static NUM_INTERVAL: Lazy<NamedPattern> = Lazy::new(|| NamedPattern {
    key: PatternKey::NumInterval,
    matcher: Matcher::Regex(compile(
        r"^([1-9][0-9]{0,7})(\.[0-9]{1,2})?$|^0[.]([1-9][0-9]?|[0-9][1-9])$",
    )),
    tip: None,
});

/// Look up the registry entry for a key
pub fn lookup(key: PatternKey) -> &'static NamedPattern {
    match key {
        PatternKey::IdNumber => &ID_NUMBER,
        PatternKey::Passwords => &PASSWORDS,
        PatternKey::ContactNumber => &CONTACT_NUMBER,
        PatternKey::Phone => &PHONE,
        PatternKey::Email => &EMAIL,
        PatternKey::Pwd => &PWD,
        PatternKey::NumInterval => &NUM_INTERVAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_every_key_resolves_to_its_entry() {
        for key in PatternKey::ALL {
            assert_eq!(lookup(key).key, key);
            assert_eq!(key.as_str().parse::<PatternKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            "fax".parse::<PatternKey>(),
            Err(RuleError::UnknownPatternKey(key)) if key == "fax"
        ));
    }

    #[rstest]
    #[case::id_number(PatternKey::IdNumber, "11010519491231002X", true)]
    #[case::id_number_lower_x(PatternKey::IdNumber, "11010519491231002x", true)]
    #[case::id_number_bad_month(PatternKey::IdNumber, "110105194913310021", false)]
    #[case::id_number_short(PatternKey::IdNumber, "110105491231002", false)]
    #[case::passwords(PatternKey::Passwords, "abc123!@", true)]
    #[case::passwords_space_symbol(PatternKey::Passwords, "abc 123", true)]
    #[case::passwords_no_symbol(PatternKey::Passwords, "abcdef12", false)]
    #[case::passwords_too_short(PatternKey::Passwords, "a1!", false)]
    #[case::passwords_too_long(PatternKey::Passwords, "abcdefgh12345678!", false)]
    #[case::contact_landline(PatternKey::ContactNumber, "010-12345678", true)]
    #[case::contact_landline_no_dash(PatternKey::ContactNumber, "075512345678", true)]
    #[case::contact_mobile(PatternKey::ContactNumber, "13812345678", true)]
    #[case::contact_invalid(PatternKey::ContactNumber, "12345", false)]
    #[case::phone(PatternKey::Phone, "13812345678", true)]
    #[case::phone_short(PatternKey::Phone, "12345", false)]
    #[case::phone_bad_prefix(PatternKey::Phone, "12812345678", false)]
    #[case::email(PatternKey::Email, "user@example.com", true)]
    #[case::email_plus(PatternKey::Email, "first.last+tag@mail.example.cn", true)]
    #[case::email_no_domain(PatternKey::Email, "user@", false)]
    #[case::email_no_at(PatternKey::Email, "not-an-email", false)]
    #[case::pwd(PatternKey::Pwd, "ab12!x", true)]
    #[case::pwd_letters_only(PatternKey::Pwd, "abcdefgh", false)]
    #[case::pwd_too_long(PatternKey::Pwd, "abc123!@#xyz", false)]
    #[case::num_integer(PatternKey::NumInterval, "99999999", true)]
    #[case::num_decimal(PatternKey::NumInterval, "123.45", true)]
    #[case::num_fraction(PatternKey::NumInterval, "0.05", true)]
    #[case::num_zero_fraction(PatternKey::NumInterval, "0.00", false)]
    #[case::num_too_large(PatternKey::NumInterval, "123456789", false)]
    #[case::num_three_places(PatternKey::NumInterval, "1.234", false)]
    fn test_registry_patterns(#[case] key: PatternKey, #[case] value: &str, #[case] expected: bool) {
        assert_eq!(lookup(key).matcher.is_match(value), expected, "{} on {:?}", key, value);
    }
}
