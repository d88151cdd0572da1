//! # Domain Layer
//!
//! Pure cryptographic and message-construction logic with no I/O dependencies.

pub mod ecdsa;
pub mod entities;
pub mod errors;
pub mod messages;
