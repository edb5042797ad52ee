//! Message envelope exchanged with the game master.

use serde::{Deserialize, Serialize, ser::Error as _};
use serde_json::Value;

use super::concern::Concern;

/// Topic of an outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Handshake asking the server to push the current state
    ProposeState,
    /// User action
    Command,
}

/// Handshake message type
pub const INIT_TYPE: &str = "init";

/// Type of a pushed state snapshot
pub const STATE_TYPE: &str = "state";

/// Type of a pushed configuration snapshot
pub const CONFIG_TYPE: &str = "config";

/// Envelope sent to the game master.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub topic: Topic,
    #[serde(rename = "type")]
    pub kind: String,
    pub concerns: Concern,
    pub data: Value,
}

impl OutboundMessage {
    /// `{topic: propose_state, type: init, concerns, data: null}`
    pub fn init(concern: Concern) -> Self {
        Self {
            topic: Topic::ProposeState,
            kind: INIT_TYPE.to_string(),
            concerns: concern,
            data: Value::Null,
        }
    }

    /// Wrap a `{type, data}` tagged command into a command envelope.
    ///
    /// # Errors
    ///
    /// Fails when the command does not serialize to an object with a string
    /// `type` field.
    pub fn command<C: Serialize>(concern: Concern, command: &C) -> Result<Self, serde_json::Error> {
        let Value::Object(mut fields) = serde_json::to_value(command)? else {
            return Err(serde_json::Error::custom("command must serialize to an object"));
        };
        let kind = match fields.remove("type") {
            Some(Value::String(kind)) => kind,
            _ => return Err(serde_json::Error::custom("command has no string `type` tag")),
        };
        let data = fields.remove("data").unwrap_or(Value::Null);

        Ok(Self {
            topic: Topic::Command,
            kind,
            concerns: concern,
            data,
        })
    }

    pub fn is_init(&self) -> bool {
        self.topic == Topic::ProposeState && self.kind == INIT_TYPE
    }
}

/// Envelope pushed by the game master.
///
/// `concerns` stays a raw string so that messages for concerns this build
/// does not know still parse and can be ignored by the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub concerns: String,
    #[serde(default)]
    pub data: Value,
}

impl InboundMessage {
    /// Snapshot message for a known concern, as the server would send it.
    pub fn snapshot(concern: Concern, data: Value) -> Self {
        Self {
            topic: None,
            kind: Some(concern.snapshot_type().to_string()),
            concerns: concern.wire_tag().to_string(),
            data,
        }
    }

    /// The concern this message targets, `None` for unknown tags.
    pub fn concern(&self) -> Option<Concern> {
        Concern::classify(&self.concerns, self.kind.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        command::{SonarCommand, TravelCommand},
        value_object::{Direction, Owner},
    };
    use serde_json::json;

    #[test]
    fn test_init_envelope_wire_format() {
        // テスト項目: init メッセージは propose_state / init / data null になる
        // when (操作):
        let message = OutboundMessage::init(Concern::Sonar);

        // then (期待する結果):
        assert!(message.is_init());
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"topic": "propose_state", "type": "init", "concerns": "sonar", "data": null})
        );
    }

    #[test]
    fn test_command_envelope_wire_format() {
        // テスト項目: コマンドは topic command の封筒に包まれる
        // given (前提条件):
        let command = SonarCommand::Move {
            owner: Owner::Players,
            direction: Direction::North,
        };

        // when (操作):
        let message = OutboundMessage::command(Concern::Sonar, &command).unwrap();

        // then (期待する結果):
        assert!(!message.is_init());
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "topic": "command",
                "type": "move",
                "concerns": "sonar",
                "data": {"owner": "players", "direction": "north"}
            })
        );
    }

    #[test]
    fn test_command_envelope_unit_variant_has_null_data() {
        // テスト項目: データなしのコマンドは data が null になる
        // when (操作):
        let message = OutboundMessage::command(Concern::Sonar, &SonarCommand::EndBattle).unwrap();

        // then (期待する結果):
        assert_eq!(message.kind, "end_battle");
        assert_eq!(message.data, Value::Null);
    }

    #[test]
    fn test_command_envelope_rejects_untagged_value() {
        // テスト項目: type タグを持たない値はコマンドとして包めない
        // then (期待する結果):
        assert!(OutboundMessage::command(Concern::Travel, &"takeoff").is_err());
        assert!(OutboundMessage::command(Concern::Travel, &json!({"data": 1})).is_err());
        assert!(
            OutboundMessage::command(Concern::Travel, &TravelCommand::Takeoff("mars".into()))
                .is_ok()
        );
    }

    #[test]
    fn test_inbound_unknown_concern_still_parses() {
        // テスト項目: 未知の concern を持つメッセージも読み込めるが concern() は None
        // when (操作):
        let message: InboundMessage =
            serde_json::from_str(r#"{"topic": "broadcast_status", "concerns": "lights", "data": {}}"#)
                .unwrap();

        // then (期待する結果):
        assert_eq!(message.concern(), None);
        assert_eq!(message.topic.as_deref(), Some("broadcast_status"));
    }

    #[test]
    fn test_inbound_without_concerns_is_malformed() {
        // テスト項目: concerns を持たないメッセージは不正として扱われる
        // then (期待する結果):
        assert!(serde_json::from_str::<InboundMessage>(r#"{"data": {}}"#).is_err());
    }
}
