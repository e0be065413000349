use crate::error::{json_kind, Outcome};
use serde_json::Value;

pub const RECORDS_KEY: &str = "homeworks";
pub const TIMESTAMP_KEY: &str = "current_date";

/// A response that passed shape validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// The most recent homework record (index 0 of `homeworks`).
    pub record: Value,
    /// Server time to use as the next `from_date`.
    pub server_timestamp: i64,
}

/// Validate a raw API response and pick out the most recent record.
///
/// An empty `homeworks` list is reported as [`Outcome::NoNewRecords`], which
/// is silent; every other failure here means the remote contract changed.
pub fn classify(raw: &Value) -> Result<Classified, Outcome> {
    let Some(body) = raw.as_object() else {
        return Err(Outcome::MalformedResponse {
            found: json_kind(raw),
        });
    };

    let records = body.get(RECORDS_KEY).ok_or(Outcome::MissingRecordsKey)?;
    let timestamp = body.get(TIMESTAMP_KEY).ok_or(Outcome::MissingTimestamp)?;

    let server_timestamp = timestamp.as_i64().ok_or(Outcome::InvalidTimestamp {
        found: json_kind(timestamp),
    })?;

    let Some(records) = records.as_array() else {
        return Err(Outcome::RecordsNotASequence {
            found: json_kind(records),
        });
    };

    match records.first() {
        Some(record) => Ok(Classified {
            record: record.clone(),
            server_timestamp,
        }),
        None => Err(Outcome::NoNewRecords),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn picks_the_first_record() {
        let raw = json!({
            "homeworks": [
                {"homework_name": "hw2", "status": "reviewing"},
                {"homework_name": "hw1", "status": "approved"}
            ],
            "current_date": 1700000000
        });
        let c = classify(&raw).unwrap();
        assert_eq!(c.record["homework_name"], "hw2");
        assert_eq!(c.server_timestamp, 1700000000);
    }

    #[test]
    fn non_object_is_malformed() {
        assert_eq!(
            classify(&json!([1, 2])).unwrap_err(),
            Outcome::MalformedResponse { found: "list" }
        );
        assert_eq!(
            classify(&Value::Null).unwrap_err(),
            Outcome::MalformedResponse { found: "null" }
        );
    }

    #[test]
    fn missing_records_key_never_yields_a_record() {
        for raw in [
            json!({"current_date": 1}),
            json!({}),
            json!({"homework": [{"status": "approved"}], "current_date": 1}),
        ] {
            assert_eq!(classify(&raw).unwrap_err(), Outcome::MissingRecordsKey);
        }
    }

    #[test]
    fn missing_timestamp() {
        let raw = json!({"homeworks": [{"homework_name": "hw1", "status": "approved"}]});
        assert_eq!(classify(&raw).unwrap_err(), Outcome::MissingTimestamp);
    }

    #[test]
    fn missing_timestamp_is_not_confused_with_no_records() {
        let raw = json!({"homeworks": []});
        assert_eq!(classify(&raw).unwrap_err(), Outcome::MissingTimestamp);
    }

    #[test]
    fn non_integer_timestamp() {
        let raw = json!({"homeworks": [], "current_date": "yesterday"});
        assert_eq!(
            classify(&raw).unwrap_err(),
            Outcome::InvalidTimestamp { found: "string" }
        );
    }

    #[test]
    fn records_must_be_a_list() {
        let raw = json!({"homeworks": {"homework_name": "hw1"}, "current_date": 1});
        assert_eq!(
            classify(&raw).unwrap_err(),
            Outcome::RecordsNotASequence { found: "object" }
        );
    }

    #[test]
    fn empty_list_means_no_new_records() {
        let raw = json!({"homeworks": [], "current_date": 1000});
        assert_eq!(classify(&raw).unwrap_err(), Outcome::NoNewRecords);
    }
}
