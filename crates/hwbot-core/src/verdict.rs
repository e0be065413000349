use crate::error::Outcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const NAME_KEY: &str = "homework_name";
pub const STATUS_KEY: &str = "status";

// ---------------------------------------------------------------------------
// VerdictTable
// ---------------------------------------------------------------------------

/// Closed mapping from a review status code to the sentence sent for it.
///
/// Codes outside the table are reported as [`Outcome::UndocumentedStatus`];
/// there is no fallback verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerdictTable(BTreeMap<String, String>);

impl VerdictTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(code, text)| (code.into(), text.into()))
                .collect(),
        )
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Turn the most recent homework record into the notification text.
    pub fn interpret(&self, record: &Value) -> Result<String, Outcome> {
        let name = record
            .get(NAME_KEY)
            .and_then(Value::as_str)
            .ok_or(Outcome::MissingHomeworkName)?;
        let status = record.get(STATUS_KEY).ok_or(Outcome::MissingStatusField)?;

        let verdict = status
            .as_str()
            .and_then(|code| self.get(code))
            .ok_or_else(|| Outcome::UndocumentedStatus(status_code(status)))?;

        Ok(format!("Changed review status for \"{name}\". {verdict}"))
    }
}

impl Default for VerdictTable {
    fn default() -> Self {
        Self::new([
            (
                "approved",
                "The work has been reviewed: the reviewer liked everything. Hooray!",
            ),
            ("reviewing", "The work has been taken for review."),
            (
                "rejected",
                "The work has been reviewed: the reviewer has comments.",
            ),
        ])
    }
}

fn status_code(status: &Value) -> String {
    match status {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> VerdictTable {
        VerdictTable::new([("approved", "All good!")])
    }

    #[test]
    fn formats_name_and_verdict() {
        let text = table()
            .interpret(&json!({"homework_name": "hw1", "status": "approved"}))
            .unwrap();
        assert_eq!(text, "Changed review status for \"hw1\". All good!");
    }

    #[test]
    fn missing_name() {
        let err = table().interpret(&json!({"status": "approved"})).unwrap_err();
        assert_eq!(err, Outcome::MissingHomeworkName);
    }

    #[test]
    fn non_object_record_has_no_name() {
        let err = table().interpret(&json!("hw1")).unwrap_err();
        assert_eq!(err, Outcome::MissingHomeworkName);
    }

    #[test]
    fn missing_status() {
        let err = table()
            .interpret(&json!({"homework_name": "hw1"}))
            .unwrap_err();
        assert_eq!(err, Outcome::MissingStatusField);
    }

    #[test]
    fn unknown_codes_are_undocumented() {
        for code in ["weird", "reviewing", "APPROVED", ""] {
            let err = table()
                .interpret(&json!({"homework_name": "hw1", "status": code}))
                .unwrap_err();
            assert_eq!(err, Outcome::UndocumentedStatus(code.to_string()));
        }
    }

    #[test]
    fn non_string_status_is_undocumented() {
        let err = table()
            .interpret(&json!({"homework_name": "hw1", "status": 7}))
            .unwrap_err();
        assert_eq!(err, Outcome::UndocumentedStatus("7".into()));
    }

    #[test]
    fn default_table_covers_the_three_review_states() {
        let t = VerdictTable::default();
        assert_eq!(t.len(), 3);
        for code in ["approved", "reviewing", "rejected"] {
            assert!(t.get(code).is_some(), "{code} missing");
        }
    }

    #[test]
    fn yaml_is_a_plain_mapping() {
        let t: VerdictTable = serde_yaml::from_str("approved: ok\nrejected: no\n").unwrap();
        assert_eq!(t.get("approved"), Some("ok"));
        assert_eq!(t.get("rejected"), Some("no"));
        assert_eq!(t.get("reviewing"), None);
    }
}
