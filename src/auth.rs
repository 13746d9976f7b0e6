//! Service identity descriptors and redacted credential material.

pub mod identity;
pub mod secret;

pub use identity::*;
pub use secret::*;
