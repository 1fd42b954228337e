//! Record Editor: collects one record's fields and validates them before saving.

use crate::model::{Record, RecordDraft};
use crate::validation::{validate, Field, ValidationErrors};

/// Whether the editor was opened on an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

/// Inputs the editor shows, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    FirstName,
    LastName,
    Email,
    Department,
}

impl EditorField {
    pub const ALL: [EditorField; 4] = [
        EditorField::FirstName,
        EditorField::LastName,
        EditorField::Email,
        EditorField::Department,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditorField::FirstName => "First Name",
            EditorField::LastName => "Last Name",
            EditorField::Email => "Email",
            EditorField::Department => "Department",
        }
    }

    /// The validated field behind this input; last name has no rules.
    pub fn validated(self) -> Option<Field> {
        match self {
            EditorField::FirstName => Some(Field::FirstName),
            EditorField::LastName => None,
            EditorField::Email => Some(Field::Email),
            EditorField::Department => Some(Field::Department),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEditor {
    mode: EditorMode,
    draft: RecordDraft,
    errors: ValidationErrors,
    failure: Option<String>,
}

impl RecordEditor {
    /// Opens in create mode without a record, edit mode with one.
    pub fn new(existing: Option<&Record>) -> Self {
        let (mode, draft) = match existing {
            Some(record) => (EditorMode::Edit, RecordDraft::from_record(record)),
            None => (EditorMode::Create, RecordDraft::default()),
        };
        Self {
            mode,
            draft,
            errors: ValidationErrors::new(),
            failure: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Add User",
            EditorMode::Edit => "Edit User",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Add User",
            EditorMode::Edit => "Save Changes",
        }
    }

    pub fn value(&self, field: EditorField) -> &str {
        match field {
            EditorField::FirstName => &self.draft.first_name,
            EditorField::LastName => &self.draft.last_name,
            EditorField::Email => &self.draft.email,
            EditorField::Department => &self.draft.department,
        }
    }

    pub fn set(&mut self, field: EditorField, value: impl Into<String>) {
        let slot = match field {
            EditorField::FirstName => &mut self.draft.first_name,
            EditorField::LastName => &mut self.draft.last_name,
            EditorField::Email => &mut self.draft.email,
            EditorField::Department => &mut self.draft.department,
        };
        *slot = value.into();
    }

    /// Validates the draft. Returns it for saving when it passes; otherwise keeps
    /// the per-field errors for display and returns `None`.
    pub fn submit(&mut self) -> Option<RecordDraft> {
        self.errors = validate(&self.draft);
        self.failure = None;
        self.errors.is_empty().then(|| self.draft.clone())
    }

    /// Shows a top-level message after the save itself failed.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn field_error(&self, field: EditorField) -> Option<&'static str> {
        field
            .validated()
            .and_then(|field| self.errors.get(&field).copied())
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn render(&self) -> String {
        let mut out = format!("== {} ==\n", self.title());
        if let Some(failure) = &self.failure {
            out.push_str(&format!("!! {failure}\n"));
        }
        for field in EditorField::ALL {
            out.push_str(&format!("{:<11}: {}\n", field.label(), self.value(field)));
            if let Some(error) = self.field_error(field) {
                out.push_str(&format!("{:<11}  ^ {error}\n", ""));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_in_create_mode_without_record() {
        let editor = RecordEditor::new(None);
        assert_eq!(editor.mode(), EditorMode::Create);
        assert_eq!(editor.submit_label(), "Add User");
        assert_eq!(editor.value(EditorField::FirstName), "");
    }

    #[test]
    fn edit_mode_prefills_from_record() {
        let record = Record::new("Ervin Howell", "Shanna@melissa.tv", "Deckow-Crist").with_id(2);
        let editor = RecordEditor::new(Some(&record));

        assert_eq!(editor.mode(), EditorMode::Edit);
        assert_eq!(editor.title(), "Edit User");
        assert_eq!(editor.value(EditorField::LastName), "Howell");
        assert_eq!(editor.value(EditorField::Department), "Deckow-Crist");
    }

    #[test]
    fn invalid_submit_keeps_inline_errors() {
        let mut editor = RecordEditor::new(None);
        editor.set(EditorField::FirstName, "Ada");
        editor.set(EditorField::Email, "ada-at-engine");

        assert!(editor.submit().is_none());
        assert_eq!(editor.field_error(EditorField::Email), Some("Invalid email address"));
        assert_eq!(editor.field_error(EditorField::Department), Some("Department is required"));
        assert_eq!(editor.field_error(EditorField::FirstName), None);
        assert!(editor.render().contains("^ Invalid email address"));
    }

    #[test]
    fn valid_submit_returns_draft_with_id() {
        let record = Record::new("Ervin Howell", "Shanna@melissa.tv", "Deckow-Crist").with_id(2);
        let mut editor = RecordEditor::new(Some(&record));
        editor.set(EditorField::Email, "ervin@howell.dev");

        let draft = editor.submit().expect("valid draft");
        assert_eq!(draft.email, "ervin@howell.dev");
        assert!(draft.existing_id().is_some());
        assert!(editor.errors().is_empty());
    }

    #[test]
    fn save_failure_shows_banner_until_next_submit() {
        let mut editor = RecordEditor::new(None);
        editor.record_failure("Failed to save user");
        assert!(editor.render().contains("!! Failed to save user"));

        editor.submit();
        assert_eq!(editor.failure(), None);
    }
}
