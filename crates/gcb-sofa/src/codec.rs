//! SOFA envelope codec.
//!
//! Every frame on the chat-service socket is a JSON envelope carrying the
//! sender's profile and a SOFA payload string, `SOFA::<Kind>:<json>`. Kinds
//! the bot does not understand decode to [`IncomingEvent::Unknown`] rather
//! than an error, so the service can answer them.

use serde::{Deserialize, Serialize};

use gcb_core::{
    domain::{Address, UserProfile},
    messaging::types::{
        IncomingCommand, IncomingEvent, IncomingMessage, IncomingPayment, PaymentStatus,
        SessionInit, SofaMessage, UnknownEvent,
    },
    Error, Result,
};

const SOFA_PREFIX: &str = "SOFA::";

#[derive(Debug, Deserialize)]
struct InboundFrame {
    sender: WireProfile,
    sofa: String,
}

#[derive(Debug, Deserialize)]
struct WireProfile {
    address: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_app: bool,
}

impl From<WireProfile> for UserProfile {
    fn from(wire: WireProfile) -> Self {
        UserProfile {
            address: Address(wire.address),
            username: wire.username,
            name: wire.name,
            is_app: wire.is_app,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    body: String,
}

#[derive(Debug, Deserialize)]
struct CommandPayload {
    value: String,
}

#[derive(Debug, Deserialize)]
struct PaymentPayload {
    status: PaymentStatus,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutboundFrame<'a> {
    recipient: &'a str,
    sofa: String,
}

/// Decode one inbound socket frame into a core event.
pub fn decode_event(frame: &str) -> Result<IncomingEvent> {
    let frame: InboundFrame = serde_json::from_str(frame)?;
    let (kind, payload) = split_sofa(&frame.sofa)?;
    let user = UserProfile::from(frame.sender);

    let event = match kind {
        "Init" => IncomingEvent::Init(SessionInit { user }),
        "Message" => {
            let payload: MessagePayload = serde_json::from_str(payload)?;
            IncomingEvent::Message(IncomingMessage {
                user,
                body: payload.body,
            })
        }
        "Command" => {
            let payload: CommandPayload = serde_json::from_str(payload)?;
            IncomingEvent::Command(IncomingCommand {
                user,
                value: payload.value,
            })
        }
        "Payment" => {
            let payload: PaymentPayload = serde_json::from_str(payload)?;
            IncomingEvent::Payment(IncomingPayment {
                user,
                status: payload.status,
                value: payload.value,
            })
        }
        other => IncomingEvent::Unknown(UnknownEvent {
            user,
            kind: other.to_string(),
        }),
    };
    Ok(event)
}

/// Encode an outbound message as a socket frame addressed to one user.
pub fn encode_message(to: &Address, message: &SofaMessage) -> Result<String> {
    let sofa = format!("SOFA::Message:{}", serde_json::to_string(message)?);
    Ok(serde_json::to_string(&OutboundFrame {
        recipient: &to.0,
        sofa,
    })?)
}

fn split_sofa(sofa: &str) -> Result<(&str, &str)> {
    let rest = sofa
        .strip_prefix(SOFA_PREFIX)
        .ok_or_else(|| Error::Messaging(format!("not a SOFA payload: {sofa}")))?;
    rest.split_once(':')
        .ok_or_else(|| Error::Messaging(format!("SOFA payload without a body: {sofa}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcb_core::messaging::types::Control;

    fn frame(sofa: &str) -> String {
        serde_json::json!({
            "sender": {"address": "0xa", "username": "ada", "name": "Ada", "is_app": false},
            "sofa": sofa,
        })
        .to_string()
    }

    #[test]
    fn decodes_messages() {
        let event = decode_event(&frame(r#"SOFA::Message:{"body":"hello"}"#)).unwrap();
        let IncomingEvent::Message(message) = event else {
            panic!("expected a message event");
        };
        assert_eq!(message.body, "hello");
        assert_eq!(message.user.address.0, "0xa");
        assert_eq!(message.user.username.as_deref(), Some("ada"));
    }

    #[test]
    fn decodes_commands_by_value() {
        let event =
            decode_event(&frame(r#"SOFA::Command:{"body":"Join Chat","value":"join"}"#)).unwrap();
        let IncomingEvent::Command(command) = event else {
            panic!("expected a command event");
        };
        assert_eq!(command.value, "join");
    }

    #[test]
    fn decodes_payments_with_status() {
        let event = decode_event(&frame(
            r#"SOFA::Payment:{"status":"confirmed","value":"0xde0b6b3a7640000"}"#,
        ))
        .unwrap();
        let IncomingEvent::Payment(payment) = event else {
            panic!("expected a payment event");
        };
        assert_eq!(payment.status, PaymentStatus::Confirmed);
        assert_eq!(payment.value.as_deref(), Some("0xde0b6b3a7640000"));
    }

    #[test]
    fn decodes_init_and_unknown_kinds() {
        assert!(matches!(
            decode_event(&frame("SOFA::Init:{}")).unwrap(),
            IncomingEvent::Init(_)
        ));

        let event = decode_event(&frame("SOFA::PaymentRequest:{}")).unwrap();
        let IncomingEvent::Unknown(unknown) = event else {
            panic!("expected an unknown event");
        };
        assert_eq!(unknown.kind, "PaymentRequest");
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(decode_event("not json").is_err());
        assert!(decode_event(&frame("Message:{}")).is_err());
        assert!(decode_event(&frame("SOFA::Message")).is_err());
        assert!(decode_event(&frame(r#"SOFA::Command:{"body":"no value"}"#)).is_err());
    }

    #[test]
    fn encodes_addressed_message_frames() {
        let message = SofaMessage::with_controls("hi", vec![Control::button("Stats", "stats")]);
        let frame = encode_message(&Address("0xb".to_string()), &message).unwrap();

        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["recipient"], "0xb");
        let sofa = value["sofa"].as_str().unwrap();
        let body = sofa.strip_prefix("SOFA::Message:").unwrap();
        let decoded: SofaMessage = serde_json::from_str(body).unwrap();
        assert_eq!(decoded, message);
    }
}
