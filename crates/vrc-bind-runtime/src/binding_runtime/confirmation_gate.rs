//! Holds group-chat logins until the requester answers Yes or No.

use std::collections::HashMap;

use anyhow::Result;
use vrc_bind_api::VrcCredentials;

use super::{
    auth_flow::AuthFlow,
    binding_render_helpers::{GROUP_LOGIN_WARNING, LOGIN_CANCELLED},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A login parked until the requester confirms it.
pub struct PendingConfirmation {
    pub credentials: VrcCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What the gate did with a non-command message.
pub enum FollowUpOutcome {
    /// Consumed; send this reply.
    Reply(String),
    /// Not consumed; other handlers may process the message.
    Passthrough,
}

#[derive(Debug, Default)]
pub struct ConfirmationGate {
    pending: HashMap<String, PendingConfirmation>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_for(&self, requester_id: &str) -> Option<&PendingConfirmation> {
        self.pending.get(requester_id)
    }

    /// Private chats log in immediately; group chats park the credentials
    /// (replacing any earlier unanswered request) and ask for confirmation.
    pub async fn request_login(
        &mut self,
        flow: &mut AuthFlow,
        requester_id: &str,
        is_group_context: bool,
        username: &str,
        password: &str,
    ) -> Result<String> {
        if !is_group_context {
            return flow.login(requester_id, username, password).await;
        }

        let replaced = self
            .pending
            .insert(
                requester_id.to_string(),
                PendingConfirmation {
                    credentials: VrcCredentials::new(username, password),
                },
            )
            .is_some();
        tracing::info!(
            requester_id,
            replaced,
            "group login parked pending confirmation"
        );
        Ok(GROUP_LOGIN_WARNING.to_string())
    }

    /// Resolves a parked login from a free-text reply.
    pub async fn on_follow_up(
        &mut self,
        flow: &mut AuthFlow,
        requester_id: &str,
        text: &str,
    ) -> Result<FollowUpOutcome> {
        if !self.pending.contains_key(requester_id) {
            return Ok(FollowUpOutcome::Passthrough);
        }

        match text.trim().to_lowercase().as_str() {
            "yes" => {
                let Some(pending) = self.pending.remove(requester_id) else {
                    return Ok(FollowUpOutcome::Passthrough);
                };
                tracing::info!(requester_id, "group login confirmed");
                let reply = flow
                    .login(
                        requester_id,
                        &pending.credentials.username,
                        &pending.credentials.password,
                    )
                    .await?;
                Ok(FollowUpOutcome::Reply(reply))
            }
            "no" => {
                self.pending.remove(requester_id);
                tracing::info!(requester_id, "group login cancelled");
                Ok(FollowUpOutcome::Reply(LOGIN_CANCELLED.to_string()))
            }
            _ => {
                tracing::debug!(requester_id, "unrecognized reply while login is pending");
                Ok(FollowUpOutcome::Passthrough)
            }
        }
    }
}
