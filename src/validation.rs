//! # Validation
//!
//! Local checks a draft must pass before the editor hands it to the controller.
//! Failures here never reach the remote resource and never touch `PageState.error`;
//! the editor shows them inline next to the offending field.

use crate::model::RecordDraft;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Draft fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    Email,
    Department,
}

impl Field {
    /// Name the field goes by in forms and wire payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::Email => "email",
            Field::Department => "department",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field error messages. Empty means the draft is acceptable.
pub type ValidationErrors = BTreeMap<Field, &'static str>;

fn email_shape() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // Unanchored: any `x@y.z` run anywhere in the input is enough.
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("static email pattern compiles"))
}

/// Checks required fields and the email shape.
pub fn validate(draft: &RecordDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if draft.first_name.trim().is_empty() {
        errors.insert(Field::FirstName, "First name is required");
    }
    if !email_shape().is_match(draft.email.trim()) {
        errors.insert(Field::Email, "Invalid email address");
    }
    if draft.department.trim().is_empty() {
        errors.insert(Field::Department, "Department is required");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(first_name: &str, email: &str, department: &str) -> RecordDraft {
        RecordDraft {
            first_name: first_name.into(),
            email: email.into(),
            department: department.into(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_first_name_is_the_only_error() {
        let errors = validate(&draft("", "a@b.com", "X"));
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![Field::FirstName]);
    }

    #[test]
    fn malformed_email_is_the_only_error() {
        let errors = validate(&draft("A", "not-an-email", "X"));
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![Field::Email]);
    }

    #[test]
    fn complete_draft_passes() {
        assert!(validate(&draft("A", "a@b.com", "X")).is_empty());
    }

    #[test]
    fn empty_draft_reports_every_field() {
        let errors = validate(&RecordDraft::default());
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[&Field::Department], "Department is required");
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(validate(&draft("A", "a@localhost", "X")).contains_key(&Field::Email));
        assert!(validate(&draft("A", "a @c.d", "X")).contains_key(&Field::Email));
    }

    #[test]
    fn email_shape_may_appear_inside_longer_input() {
        assert!(validate(&draft("A", "a b@c.d", "X")).is_empty());
        assert!(validate(&draft("A", "Ada <ada@engine.org>", "X")).is_empty());
    }

    #[test]
    fn field_names_match_form_keys() {
        assert_eq!(Field::FirstName.to_string(), "firstName");
    }
}
