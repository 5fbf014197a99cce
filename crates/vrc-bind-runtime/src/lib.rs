//! Chat-side runtime that binds platform users to VRChat accounts.
//!
//! Inbound messages are routed through [`BindingRuntime`]: commands are
//! parsed first, then free text is offered to the confirmation gate.

mod binding_runtime;

pub use binding_runtime::{
    AuthFlow, BindingCommand, BindingRuntime, ConfirmationGate, FollowUpOutcome, InboundMessage,
    PendingConfirmation, PendingTwoFactor, UserRecord, UserStore,
};
