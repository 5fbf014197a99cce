//! Routes inbound chat messages to the confirmation gate and auth flow.

use std::sync::Arc;

use anyhow::Result;
use vrc_bind_api::VrcAuthApi;

mod auth_flow;
mod binding_command_helpers;
mod binding_render_helpers;
mod confirmation_gate;
mod user_store;

pub use auth_flow::{AuthFlow, PendingTwoFactor};
pub use confirmation_gate::{ConfirmationGate, FollowUpOutcome, PendingConfirmation};
pub use user_store::{UserRecord, UserStore};

use binding_command_helpers::{parse_binding_command, render_help};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A chat message as delivered by the host transport.
pub struct InboundMessage {
    pub user_id: String,
    /// Set for group/channel messages, `None` for private chats.
    pub channel_id: Option<String>,
    pub content: String,
}

impl InboundMessage {
    pub fn private(user_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            channel_id: None,
            content: content.into(),
        }
    }

    pub fn group(
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            channel_id: Some(channel_id.into()),
            content: content.into(),
        }
    }

    pub fn is_group_context(&self) -> bool {
        self.channel_id
            .as_deref()
            .is_some_and(|channel| !channel.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Commands understood by the binding runtime.
pub enum BindingCommand {
    Login { username: String, password: String },
    TwoFactor { code: String },
    Profile,
    Help,
    Invalid { message: String },
}

/// Owns the gate and the auth flow for the lifetime of the host service.
pub struct BindingRuntime {
    gate: ConfirmationGate,
    flow: AuthFlow,
}

impl BindingRuntime {
    pub fn new(api: Arc<dyn VrcAuthApi>, store: UserStore) -> Self {
        Self {
            gate: ConfirmationGate::new(),
            flow: AuthFlow::new(api, store),
        }
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    pub fn flow(&self) -> &AuthFlow {
        &self.flow
    }

    /// Handles one message. `Ok(None)` means the message was not consumed.
    pub async fn handle_message(&mut self, message: &InboundMessage) -> Result<Option<String>> {
        let user_id = message.user_id.as_str();
        if let Some(command) = parse_binding_command(&message.content) {
            let reply = self.execute_command(message, command).await?;
            return Ok(Some(reply));
        }

        match self
            .gate
            .on_follow_up(&mut self.flow, user_id, &message.content)
            .await?
        {
            FollowUpOutcome::Reply(reply) => Ok(Some(reply)),
            FollowUpOutcome::Passthrough => Ok(None),
        }
    }

    async fn execute_command(
        &mut self,
        message: &InboundMessage,
        command: BindingCommand,
    ) -> Result<String> {
        let user_id = message.user_id.as_str();
        match command {
            BindingCommand::Login { username, password } => {
                self.gate
                    .request_login(
                        &mut self.flow,
                        user_id,
                        message.is_group_context(),
                        &username,
                        &password,
                    )
                    .await
            }
            BindingCommand::TwoFactor { code } => self.flow.submit_two_factor(user_id, &code).await,
            BindingCommand::Profile => self.flow.get_profile(user_id).await,
            BindingCommand::Help => Ok(render_help()),
            BindingCommand::Invalid { message } => Ok(message),
        }
    }
}
