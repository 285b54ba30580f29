use serde::{Deserialize, Serialize};

use crate::domain::UserProfile;

/// Inbound session events delivered by the chat service.
///
/// Service-specific wire details live in the adapter; by the time an event
/// reaches the core it carries the sender's profile and the typed payload.
#[derive(Clone, Debug)]
pub enum IncomingEvent {
    Init(SessionInit),
    Message(IncomingMessage),
    Command(IncomingCommand),
    Payment(IncomingPayment),
    Unknown(UnknownEvent),
}

impl IncomingEvent {
    pub fn user(&self) -> &UserProfile {
        match self {
            IncomingEvent::Init(e) => &e.user,
            IncomingEvent::Message(e) => &e.user,
            IncomingEvent::Command(e) => &e.user,
            IncomingEvent::Payment(e) => &e.user,
            IncomingEvent::Unknown(e) => &e.user,
        }
    }
}

/// A user (re)opened a session with the bot.
#[derive(Clone, Debug)]
pub struct SessionInit {
    pub user: UserProfile,
}

#[derive(Clone, Debug)]
pub struct IncomingMessage {
    pub user: UserProfile,
    pub body: String,
}

/// A control button press; `value` is the button's value, e.g. `join`.
#[derive(Clone, Debug)]
pub struct IncomingCommand {
    pub user: UserProfile,
    pub value: String,
}

#[derive(Clone, Debug)]
pub struct IncomingPayment {
    pub user: UserProfile,
    pub status: PaymentStatus,
    /// Amount in the platform's wire encoding, when present.
    pub value: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unconfirmed,
    Confirmed,
    Error,
}

/// An event kind the bot does not understand.
#[derive(Clone, Debug)]
pub struct UnknownEvent {
    pub user: UserProfile,
    pub kind: String,
}

/// Outbound message payload: text plus the control buttons to show.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SofaMessage {
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<Control>,
    #[serde(
        default,
        rename = "showKeyboard",
        skip_serializing_if = "Option::is_none"
    )]
    pub show_keyboard: Option<bool>,
}

impl SofaMessage {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            controls: Vec::new(),
            show_keyboard: None,
        }
    }

    pub fn with_controls(body: impl Into<String>, controls: Vec<Control>) -> Self {
        Self {
            body: body.into(),
            controls,
            show_keyboard: None,
        }
    }
}

/// UI control: a button with a command value, or a labelled group of controls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Control {
    Button { label: String, value: String },
    Group { label: String, controls: Vec<Control> },
}

impl Control {
    pub fn button(label: impl Into<String>, value: impl Into<String>) -> Self {
        Control::Button {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn group(label: impl Into<String>, controls: Vec<Control>) -> Self {
        Control::Group {
            label: label.into(),
            controls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_serialize_with_lowercase_type_tag() {
        let control = Control::group("FAQ", vec![Control::button("About", "faq:about")]);
        let json = serde_json::to_value(&control).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "group",
                "label": "FAQ",
                "controls": [{"type": "button", "label": "About", "value": "faq:about"}]
            })
        );
    }

    #[test]
    fn message_omits_empty_controls() {
        let json = serde_json::to_string(&SofaMessage::text("hi")).unwrap();
        assert_eq!(json, r#"{"body":"hi"}"#);
    }

    #[test]
    fn payment_status_decodes_lowercase() {
        let status: PaymentStatus = serde_json::from_str(r#""confirmed""#).unwrap();
        assert_eq!(status, PaymentStatus::Confirmed);
    }
}
