//! JSON shapes exchanged with the remote resource.
//!
//! The resource nests the department under `company.name`. Requests carry both
//! that shape and the flat editor fields; responses are read leniently since
//! create and update echoes are frequently partial.

use crate::model::{Record, RecordDraft, RecordId, RecordPatch};
use serde::{Deserialize, Serialize};

/// Header carrying the collection size on list responses.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CompanyDto {
    #[serde(default)]
    pub name: Option<String>,
}

/// A user as the resource represents it. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<CompanyDto>,
    #[serde(default)]
    pub department: Option<String>,
}

impl UserDto {
    fn department(&self) -> Option<String> {
        self.company
            .as_ref()
            .and_then(|company| company.name.clone())
            .or_else(|| self.department.clone())
    }

    pub fn into_record(self) -> Record {
        let department = self.department().unwrap_or_default();
        Record {
            id: self.id,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            department,
        }
    }

    pub fn into_patch(self) -> RecordPatch {
        let department = self.department();
        RecordPatch {
            id: self.id,
            name: self.name,
            email: self.email,
            department,
        }
    }
}

/// Body sent on create and update.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub company: CompanyDto,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

impl From<&RecordDraft> for UserBody {
    fn from(draft: &RecordDraft) -> Self {
        Self {
            id: draft.existing_id().cloned(),
            name: draft.full_name(),
            email: draft.email.clone(),
            company: CompanyDto {
                name: Some(draft.department.clone()),
            },
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            department: draft.department.clone(),
        }
    }
}

/// Parses an echo body; an empty body is an empty patch.
pub fn parse_echo(body: &[u8]) -> Result<RecordPatch, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RecordPatch::default());
    }
    serde_json::from_slice::<UserDto>(body).map(UserDto::into_patch)
}

/// Reads the collection size from the header value, if it is a number.
pub fn parse_total_count(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_entry_reads_company_name_as_department() {
        let json = r#"{
            "id": 3,
            "name": "Clementine Bauch",
            "username": "Samantha",
            "email": "Nathan@yesenia.net",
            "company": { "name": "Romaguera-Jacobson", "bs": "e-enable" }
        }"#;
        let record = serde_json::from_str::<UserDto>(json).unwrap().into_record();
        assert_eq!(record.id, Some(RecordId::from(3)));
        assert_eq!(record.department, "Romaguera-Jacobson");
    }

    #[test]
    fn missing_company_renders_empty_department() {
        let record = serde_json::from_str::<UserDto>(r#"{"id":1,"name":"A","email":"a@b.c"}"#)
            .unwrap()
            .into_record();
        assert_eq!(record.department, "");
    }

    #[test]
    fn id_only_echo_is_a_sparse_patch() {
        let patch = parse_echo(br#"{"id": 11}"#).unwrap();
        assert_eq!(patch.id, Some(RecordId::from(11)));
        assert!(patch.name.is_none());
        assert!(patch.department.is_none());
    }

    #[test]
    fn empty_echo_is_empty_patch() {
        assert_eq!(parse_echo(b"").unwrap(), RecordPatch::default());
        assert_eq!(parse_echo(b"{}").unwrap(), RecordPatch::default());
    }

    #[test]
    fn body_nests_department_under_company() {
        let draft = RecordDraft {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@engine.org".into(),
            department: "Analytics".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(UserBody::from(&draft)).unwrap();
        assert_eq!(body["name"], "Ada Lovelace");
        assert_eq!(body["company"]["name"], "Analytics");
        assert_eq!(body["firstName"], "Ada");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn total_count_header_must_be_numeric() {
        assert_eq!(parse_total_count(Some("10")), Some(10));
        assert_eq!(parse_total_count(Some("lots")), None);
        assert_eq!(parse_total_count(None), None);
    }
}
