//! Game records returned by the history and leaderboard endpoints.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::lenient_id;
use crate::{BoardId, GameId, ProtocolError, ScoreDetail, SessionStatus};

/// Timestamp layouts the backend is known to emit without a zone.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// A saved game as the backend reports it, with `custom` decoded.
///
/// `board_id`, `created_at` and the score detail are what the client
/// interprets; every other column is carried in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<GameId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub board_id: Option<BoardId>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub custom: ScoreDetail,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameRecord {
    /// Decodes one raw record.
    ///
    /// The `custom` column normally arrives as JSON *text* and is parsed
    /// here; an already-structured object is accepted as well.
    ///
    /// # Errors
    /// - [`ProtocolError::InvalidMessage`] if `custom` is missing or null
    /// - [`ProtocolError::Decode`] if `custom` or the record is malformed
    pub fn decode(mut raw: Map<String, Value>) -> Result<Self, ProtocolError> {
        let custom = match raw.remove("custom") {
            Some(Value::String(text)) => {
                serde_json::from_str::<ScoreDetail>(&text).map_err(ProtocolError::Decode)?
            }
            Some(value @ Value::Object(_)) => {
                serde_json::from_value::<ScoreDetail>(value).map_err(ProtocolError::Decode)?
            }
            Some(Value::Null) | None => {
                return Err(ProtocolError::InvalidMessage(
                    "record has no custom payload".into(),
                ));
            }
            Some(other) => {
                return Err(ProtocolError::InvalidMessage(format!(
                    "custom payload has unexpected type: {other}"
                )));
            }
        };
        let custom = serde_json::to_value(custom).map_err(ProtocolError::Encode)?;
        raw.insert("custom".into(), custom);
        serde_json::from_value(Value::Object(raw)).map_err(ProtocolError::Decode)
    }

    /// `created_at` as epoch milliseconds, if it parses.
    ///
    /// RFC 3339 timestamps carry their own zone; zone-less ones
    /// (`2024-05-01 10:00:00`) are read as local time.
    pub fn created_at_millis(&self) -> Option<i64> {
        self.created_at.as_deref().and_then(parse_timestamp_millis)
    }

    /// Elapsed play time as reported by the backend, in milliseconds.
    pub fn total_time(&self) -> Option<f64> {
        match self.extra.get("total_time")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The backend status code, if it is one this client knows.
    pub fn status(&self) -> Option<SessionStatus> {
        serde_json::from_value(self.extra.get("status")?.clone()).ok()
    }
}

/// Parses a backend timestamp into epoch milliseconds.
pub fn parse_timestamp_millis(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(text, fmt).ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp_millis())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_decode_parses_custom_text() {
        let record = GameRecord::decode(raw(json!({
            "id": 10,
            "board_id": 2,
            "created_at": "2024-05-01 10:00:00",
            "custom": "{\"pairs_found\":6,\"turns\":9,\"score\":1200}",
            "total_time": 4200,
            "nickname": "ana"
        })))
        .unwrap();

        assert_eq!(record.id, Some(GameId(10)));
        assert_eq!(record.board_id, Some(BoardId(2)));
        assert_eq!(record.custom.pairs_found, 6);
        assert_eq!(record.custom.score, 1200);
        assert_eq!(record.total_time(), Some(4200.0));
        assert_eq!(record.extra["nickname"], "ana");
        assert_eq!(record.status(), None);
    }

    #[test]
    fn test_status_reads_backend_code() {
        let record = GameRecord::decode(raw(json!({
            "status": "E",
            "custom": {"pairs_found": 2, "turns": 2, "score": 10}
        })))
        .unwrap();
        assert_eq!(record.status(), Some(SessionStatus::Completed));
    }

    #[test]
    fn test_decode_accepts_structured_custom_and_string_ids() {
        let record = GameRecord::decode(raw(json!({
            "board_id": "3",
            "custom": {"pairs_found": 1, "turns": 1, "score": 85}
        })))
        .unwrap();
        assert_eq!(record.board_id, Some(BoardId(3)));
        assert_eq!(record.custom.turns, 1);
        assert_eq!(record.id, None);
    }

    #[test]
    fn test_decode_rejects_malformed_custom_text() {
        let result = GameRecord::decode(raw(json!({"custom": "{oops"})));
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_missing_custom() {
        let result = GameRecord::decode(raw(json!({"board_id": 1})));
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));

        let result = GameRecord::decode(raw(json!({"custom": null})));
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_parse_timestamp_orders_by_value() {
        let a = parse_timestamp_millis("2024-05-01 09:59:59").unwrap();
        let b = parse_timestamp_millis("2024-05-01 10:00:00").unwrap();
        assert_eq!(b - a, 1000);
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        assert_eq!(parse_timestamp_millis("1970-01-01T00:00:01Z"), Some(1000));
        assert_eq!(
            parse_timestamp_millis("1970-01-01T00:00:01.500000Z"),
            Some(1500)
        );
    }

    #[test]
    fn test_parse_timestamp_garbage_is_none() {
        assert_eq!(parse_timestamp_millis("yesterday"), None);
    }
}
