//! Group-chat application service: event dispatch and message fan-out.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use crate::{
    domain::{Address, RegisteredUser, UserProfile},
    faq,
    messaging::{
        port::MessagingPort,
        types::{Control, IncomingEvent, PaymentStatus, SofaMessage},
    },
    users::UserDirectory,
    Result,
};

/// The relay service.
///
/// Holds the roster and the messaging port; each inbound event is handled
/// independently. Failures are logged and the interaction is left
/// unanswered; there is no user-facing error path.
pub struct GroupChat {
    users: Arc<dyn UserDirectory>,
    messenger: Arc<dyn MessagingPort>,
    bot_address: Option<Address>,
}

impl GroupChat {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        messenger: Arc<dyn MessagingPort>,
        bot_address: Option<Address>,
    ) -> Self {
        Self {
            users,
            messenger,
            bot_address,
        }
    }

    pub async fn on_event(&self, event: IncomingEvent) {
        if event.user().is_app {
            return;
        }

        let outcome = match &event {
            IncomingEvent::Init(e) => self.handle_init(&e.user).await,
            IncomingEvent::Message(e) => self.handle_message(&e.user, &e.body).await,
            IncomingEvent::Command(e) => self.handle_command(&e.user, &e.value).await,
            IncomingEvent::Payment(e) => self.handle_payment(&e.user, e.status).await,
            IncomingEvent::Unknown(e) => self.handle_unknown(&e.user, &e.kind).await,
        };

        if let Err(e) = outcome {
            error!("event from {} failed: {e}", event.user().address);
        }
    }

    /// Welcome message with the user-count headline and state-matched controls.
    async fn handle_init(&self, user: &UserProfile) -> Result<()> {
        let known = self.users.load(&user.address).await?;
        let count = self.users.active_count().await?;

        let mut body =
            format!("\u{1F44B} Welcome to Group chat!\nThere are currently {count} users chatting");
        let controls = if is_registered(known.as_ref()) {
            body.push_str(", have fun!");
            faq::registered_controls()
        } else {
            body.push_str(", click \"Join Chat\" to join in the fun!");
            faq::unregistered_controls()
        };

        self.messenger
            .send(&user.address, &SofaMessage::with_controls(body, controls))
            .await
    }

    async fn handle_message(&self, user: &UserProfile, body: &str) -> Result<()> {
        let known = self.users.load(&user.address).await?;
        let Some(record) = known.filter(|u| u.registered) else {
            // Not joined yet; show the welcome flow instead of relaying.
            return self.handle_init(user).await;
        };

        let now = Utc::now().naive_utc();
        if record.banned_at(now) {
            let until = record.ban_release_date.unwrap_or(now);
            return self
                .messenger
                .send(
                    &user.address,
                    &SofaMessage::with_controls(
                        format!("\u{1F621} You've been banned until {until}"),
                        faq::registered_controls(),
                    ),
                )
                .await;
        }

        self.relay(user, body).await
    }

    async fn handle_command(&self, user: &UserProfile, value: &str) -> Result<()> {
        match value {
            "join" => {
                self.users.set_registered(&user.address, true).await?;
                self.messenger
                    .send(
                        &user.address,
                        &SofaMessage::with_controls(
                            "\u{1F389} You've joined the chat, have fun!",
                            faq::registered_controls(),
                        ),
                    )
                    .await
            }
            "leave" => {
                self.users.set_registered(&user.address, false).await?;
                self.messenger
                    .send(
                        &user.address,
                        &SofaMessage::with_controls(
                            "\u{1F6AA} You've left the chat, come back any time!",
                            faq::unregistered_controls(),
                        ),
                    )
                    .await
            }
            "stats" => {
                let count = self.users.active_count().await?;
                self.messenger
                    .send(
                        &user.address,
                        &SofaMessage::with_controls(
                            format!("\u{1F4A1} There are currently {count} users chatting"),
                            faq::registered_controls(),
                        ),
                    )
                    .await
            }
            value => {
                let Some(entry) = faq::lookup(value) else {
                    debug!("ignoring unknown command {value} from {}", user.address);
                    return Ok(());
                };
                let controls = self.controls_for(&user.address).await?;
                self.messenger
                    .send(
                        &user.address,
                        &SofaMessage::with_controls(entry.message, controls),
                    )
                    .await
            }
        }
    }

    /// Payments to the bot are donations; thank once, on confirmation.
    async fn handle_payment(&self, user: &UserProfile, status: PaymentStatus) -> Result<()> {
        if status != PaymentStatus::Confirmed {
            debug!("ignoring {status:?} payment from {}", user.address);
            return Ok(());
        }
        let controls = self.controls_for(&user.address).await?;
        self.messenger
            .send(
                &user.address,
                &SofaMessage::with_controls("\u{1F4B0} Thanks for the donation!", controls),
            )
            .await
    }

    async fn handle_unknown(&self, user: &UserProfile, kind: &str) -> Result<()> {
        debug!("unsupported event kind {kind} from {}", user.address);
        let controls = self.controls_for(&user.address).await?;
        self.messenger
            .send(
                &user.address,
                &SofaMessage::with_controls("\u{1F6AB} That's not allowed!", controls),
            )
            .await
    }

    /// Forward a user's message to every other registered user.
    ///
    /// Delivery failures are per-recipient: one unreachable user does not
    /// stop the fan-out.
    async fn relay(&self, from: &UserProfile, body: &str) -> Result<()> {
        self.users.bump_messages_sent(&from.address).await?;
        self.users.record_message(&from.address, body).await?;

        let message = SofaMessage::with_controls(
            format!("\u{1F4AC} {}\n{body}", from.display_label()),
            faq::registered_controls(),
        );

        for to in self.users.registered_addresses().await? {
            if to == from.address || self.bot_address.as_ref() == Some(&to) {
                continue;
            }
            if let Err(e) = self.messenger.send(&to, &message).await {
                error!("relay to {to} failed: {e}");
            }
        }
        Ok(())
    }

    async fn controls_for(&self, address: &Address) -> Result<Vec<Control>> {
        let known = self.users.load(address).await?;
        Ok(if is_registered(known.as_ref()) {
            faq::registered_controls()
        } else {
            faq::unregistered_controls()
        })
    }
}

fn is_registered(user: Option<&RegisteredUser>) -> bool {
    user.map(|u| u.registered).unwrap_or(false)
}
