//! VRChat HTTP API surface used by the account-binding runtime.
//!
//! `VrcAuthApi` is the seam the runtime depends on; `VrcApiClient` is the
//! reqwest-backed implementation talking to `api.vrchat.cloud`.
mod client;
mod types;

pub use client::{VrcApiClient, VrcApiConfig, DEFAULT_VRC_API_BASE, DEFAULT_VRC_USER_AGENT};
pub use types::{
    session_cookie_header, LoginOutcome, VrcApiError, VrcAuthApi, VrcCredentials, VrcProfile,
};
