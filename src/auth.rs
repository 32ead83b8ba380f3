//! Token model, redacted secrets, and the host-supplied authorization handoff capability.

pub mod handoff;
pub mod token;

pub use handoff::*;
pub use token::{record::*, secret::*};
