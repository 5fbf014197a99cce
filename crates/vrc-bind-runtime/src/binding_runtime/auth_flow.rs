//! Password → optional 2FA → persisted session, per requester.

use std::{collections::HashMap, sync::Arc};

use anyhow::{Context, Result};
use vrc_bind_api::{LoginOutcome, VrcAuthApi, VrcCredentials};

use super::{
    binding_render_helpers::{
        render_login_failure, render_profile, render_profile_failure, render_two_factor_failure,
        LOGIN_SUCCEEDED, PROFILE_WITHOUT_BINDING, TWO_FACTOR_PROMPT, TWO_FACTOR_SUCCEEDED,
        TWO_FACTOR_WITHOUT_LOGIN,
    },
    user_store::{UserRecord, UserStore},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Credentials held between the password step and the second factor.
pub struct PendingTwoFactor {
    pub credentials: VrcCredentials,
}

/// Drives VRChat authentication and owns the binding store.
pub struct AuthFlow {
    api: Arc<dyn VrcAuthApi>,
    store: UserStore,
    pending_two_factor: HashMap<String, PendingTwoFactor>,
}

impl AuthFlow {
    pub fn new(api: Arc<dyn VrcAuthApi>, store: UserStore) -> Self {
        Self {
            api,
            store,
            pending_two_factor: HashMap::new(),
        }
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn pending_two_factor_for(&self, requester_id: &str) -> Option<&PendingTwoFactor> {
        self.pending_two_factor.get(requester_id)
    }

    /// Submits the password. Upstream failures become reply text; only a
    /// failed store write is returned as `Err`.
    pub async fn login(
        &mut self,
        requester_id: &str,
        username: &str,
        password: &str,
    ) -> Result<String> {
        let credentials = VrcCredentials::new(username, password);
        match self.api.login(&credentials).await {
            Ok(LoginOutcome::TwoFactorRequired) => {
                tracing::info!(requester_id, username, "vrchat login awaiting second factor");
                self.pending_two_factor
                    .insert(requester_id.to_string(), PendingTwoFactor { credentials });
                Ok(TWO_FACTOR_PROMPT.to_string())
            }
            Ok(LoginOutcome::Authenticated { cookies }) => {
                self.pending_two_factor.remove(requester_id);
                self.bind(requester_id, username, cookies)?;
                Ok(LOGIN_SUCCEEDED.to_string())
            }
            Err(error) => {
                tracing::warn!(requester_id, username, %error, "vrchat login failed");
                Ok(render_login_failure(&error))
            }
        }
    }

    /// Completes a login that was parked on a second factor.
    pub async fn submit_two_factor(&mut self, requester_id: &str, code: &str) -> Result<String> {
        let Some(pending) = self.pending_two_factor.get(requester_id) else {
            return Ok(TWO_FACTOR_WITHOUT_LOGIN.to_string());
        };
        let credentials = pending.credentials.clone();

        match self.api.verify_two_factor(&credentials, code).await {
            Ok(cookies) => {
                self.pending_two_factor.remove(requester_id);
                self.bind(requester_id, &credentials.username, cookies)?;
                Ok(TWO_FACTOR_SUCCEEDED.to_string())
            }
            Err(error) => {
                tracing::warn!(requester_id, %error, "vrchat two-factor verification failed");
                Ok(render_two_factor_failure(&error))
            }
        }
    }

    /// Looks up the bound account by replaying the stored session.
    pub async fn get_profile(&self, requester_id: &str) -> Result<String> {
        let Some(record) = self.store.get(requester_id) else {
            return Ok(PROFILE_WITHOUT_BINDING.to_string());
        };

        match self.api.current_user(&record.cookies).await {
            Ok(profile) => Ok(render_profile(&profile)),
            Err(error) => {
                tracing::warn!(requester_id, %error, "vrchat profile lookup failed");
                Ok(render_profile_failure(&error))
            }
        }
    }

    fn bind(&mut self, requester_id: &str, username: &str, cookies: Vec<String>) -> Result<()> {
        self.store
            .upsert(UserRecord {
                qq_id: requester_id.to_string(),
                vrc_username: username.to_string(),
                cookies,
            })
            .with_context(|| format!("failed to persist vrchat binding for {requester_id}"))?;
        tracing::info!(requester_id, username, "vrchat account bound");
        Ok(())
    }
}
