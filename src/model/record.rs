use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier assigned to a record by the remote resource.
///
/// The backing resource hands out numeric ids, but nothing here depends on that:
/// ids are kept as opaque strings and accepted from JSON as either a number or a
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Local stand-in used when a create response carries no identifier.
    pub fn placeholder() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// One user entry in the directory.
///
/// `id` is `None` until the remote resource (or a placeholder) has assigned one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub department: String,
}

impl Record {
    /// Creates a record that has not been stored yet.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            department: department.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Overwrites fields the patch carries as present and non-empty.
    ///
    /// Everything else keeps its local value, so a partial echo from the server
    /// never blanks out data the caller already knows.
    pub fn merge(&mut self, patch: RecordPatch) {
        if let Some(id) = patch.id.filter(|id| !id.is_empty()) {
            self.id = Some(id);
        }
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.email, patch.email);
        merge_field(&mut self.department, patch.department);
    }

    /// True when both records carry the same, set identifier.
    pub fn has_id(&self, id: &RecordId) -> bool {
        self.id.as_ref() == Some(id)
    }
}

fn merge_field(slot: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        *slot = value;
    }
}

/// Partial representation echoed back by the remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordPatch {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

/// Editable working copy of a record, as collected by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDraft {
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

impl RecordDraft {
    /// Splits the stored display name at the first space.
    pub fn from_record(record: &Record) -> Self {
        let (first_name, last_name) = match record.name.split_once(' ') {
            Some((first, rest)) => (first.to_string(), rest.to_string()),
            None => (record.name.clone(), String::new()),
        };
        Self {
            id: record.id.clone(),
            first_name,
            last_name,
            email: record.email.clone(),
            department: record.department.clone(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Builds the record this draft describes, keeping its id if any.
    pub fn to_record(&self) -> Record {
        Record {
            id: self.id.clone(),
            name: self.full_name(),
            email: self.email.clone(),
            department: self.department.clone(),
        }
    }

    /// Present and non-empty id; a blank id counts as "not created yet".
    pub fn existing_id(&self) -> Option<&RecordId> {
        self.id.as_ref().filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Record {
        Record::new("Alice Liddell", "alice@example.com", "Research").with_id(1)
    }

    #[test]
    fn merge_keeps_fields_missing_from_echo() {
        let mut record = alice();
        record.merge(RecordPatch {
            email: Some("alice@wonder.land".into()),
            name: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(record.email, "alice@wonder.land");
        assert_eq!(record.name, "Alice Liddell");
        assert_eq!(record.department, "Research");
        assert_eq!(record.id, Some(RecordId::from(1)));
    }

    #[test]
    fn merge_ignores_blank_id() {
        let mut record = alice();
        record.merge(RecordPatch {
            id: Some(RecordId::new(" ")),
            ..Default::default()
        });
        assert_eq!(record.id, Some(RecordId::from(1)));
    }

    #[test]
    fn draft_splits_name_at_first_space() {
        let record = Record::new("Mary Ann Evans", "m@e.org", "Letters");
        let draft = RecordDraft::from_record(&record);
        assert_eq!(draft.first_name, "Mary");
        assert_eq!(draft.last_name, "Ann Evans");
        assert_eq!(draft.to_record().name, "Mary Ann Evans");
    }

    #[test]
    fn draft_without_last_name_has_no_trailing_space() {
        let draft = RecordDraft {
            first_name: "Cher".into(),
            ..Default::default()
        };
        assert_eq!(draft.full_name(), "Cher");
    }

    #[test]
    fn id_accepts_numbers_and_strings() {
        let from_number: RecordId = serde_json::from_str("11").unwrap();
        let from_text: RecordId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(from_number, RecordId::new("11"));
        assert_eq!(from_text.as_str(), "abc");
    }

    #[test]
    fn id_accepts_negative_and_fractional_numbers() {
        let negative: RecordId = serde_json::from_str("-3").unwrap();
        let fractional: RecordId = serde_json::from_str("1.5").unwrap();
        assert_eq!(negative.as_str(), "-3");
        assert_eq!(fractional.as_str(), "1.5");

        let ids: Vec<RecordId> = serde_json::from_str(r#"[1, -2, 2.5, "x"]"#).unwrap();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn blank_draft_id_is_not_existing() {
        let draft = RecordDraft {
            id: Some(RecordId::new("")),
            ..Default::default()
        };
        assert!(draft.existing_id().is_none());
    }
}
