//! FAQ content and the control sets shown under every reply.

use crate::messaging::types::Control;

pub struct FaqEntry {
    /// Command value carried by the button, e.g. `faq:about`.
    pub key: &'static str,
    pub label: &'static str,
    pub message: &'static str,
}

pub static FAQ: &[FaqEntry] = &[
    FaqEntry {
        key: "faq:about",
        label: "About",
        message: "Group chat is a bot that emulates a group chat by forwarding any \
message it receives to all the users who have joined the chat.\n\n\
It was built as a fun experiment to give people a place to hang out while the \
community is growing.",
    },
    FaqEntry {
        key: "faq:rooms",
        label: "Can I have a private group chat?",
        message: "With this bot, no. Until group chats are available natively, the bot \
is open source so you can deploy your own copy and tell all your friends to \
join! See the Source Code section.",
    },
    FaqEntry {
        key: "faq:payment",
        label: "Where do payments go?",
        message: "Since this is simply a bot, any payment sent to the group goes to the \
bot itself. Anything sent to the bot counts as a donation \u{1F4B0} \u{1F60D}",
    },
    FaqEntry {
        key: "faq:sourcecode",
        label: "Can I see the source code?",
        message: "Yup! The bot is open source; ask in the chat for the repository link.",
    },
    FaqEntry {
        key: "faq:suggestions",
        label: "I have a suggestion...",
        message: "Great! Just post it into the chat, it will be seen there.\n\
Alternatively you can make the change yourself and send a pull request (see \
the Source Code section).",
    },
    FaqEntry {
        key: "faq:who",
        label: "Who made this?",
        message: "The bot operator \u{1F605} \u{1F605} \u{1F605}",
    },
];

pub fn lookup(key: &str) -> Option<&'static FaqEntry> {
    FAQ.iter().find(|entry| entry.key == key)
}

/// The FAQ submenu: one button per entry.
pub fn faq_menu() -> Control {
    Control::group(
        "FAQ",
        FAQ.iter()
            .map(|entry| Control::button(entry.label, entry.key))
            .collect(),
    )
}

/// Controls shown to users who have not joined (or have left) the chat.
pub fn unregistered_controls() -> Vec<Control> {
    vec![Control::button("Join Chat", "join"), faq_menu()]
}

/// Controls shown to joined users.
pub fn registered_controls() -> Vec<Control> {
    vec![
        Control::button("Leave Chat", "leave"),
        Control::button("Stats", "stats"),
        faq_menu(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_known_keys_only() {
        assert!(lookup("faq:about").is_some());
        assert!(lookup("faq:rooms").is_some());
        assert!(lookup("join").is_none());
        assert!(lookup("faq:nope").is_none());
    }

    #[test]
    fn menu_has_one_button_per_entry() {
        let Control::Group { label, controls } = faq_menu() else {
            panic!("menu must be a group");
        };
        assert_eq!(label, "FAQ");
        assert_eq!(controls.len(), FAQ.len());
        assert!(controls
            .iter()
            .all(|c| matches!(c, Control::Button { .. })));
    }

    #[test]
    fn control_sets_match_registration_state() {
        let unregistered = unregistered_controls();
        assert!(matches!(
            &unregistered[0],
            Control::Button { value, .. } if value == "join"
        ));

        let registered = registered_controls();
        assert!(matches!(
            &registered[0],
            Control::Button { value, .. } if value == "leave"
        ));
        assert!(matches!(
            &registered[1],
            Control::Button { value, .. } if value == "stats"
        ));
    }
}
