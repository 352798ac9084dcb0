//! `tdsim-message` — the four wire message kinds exchanged between nodes.
//!
//! # Crate layout
//!
//! | Module    | Contents                                    |
//! |-----------|----------------------------------------------|
//! | [`vote`]  | `Vote` (`Active` / `Finished`)               |
//! | [`message`] | `Message` enum, `MessageHeader`            |
//!
//! # Design
//!
//! The original system tags messages with a runtime type enum and a generic
//! `object` payload, dispatched with an `if/elif` chain and a fatal
//! `sys.exit` on an unrecognised tag. Here the four kinds are a single
//! exhaustive Rust sum type: the compiler guarantees every variant is
//! handled at every match site, so there is no "unrecognised message type"
//! code path left to guard against (see `tdsim-core::TdError::UnknownNode`
//! for the Rust-native analogue of that failure mode — an unknown
//! *destination*, not an unknown *message kind*).

pub mod message;
pub mod vote;


pub use message::{Message, MessageHeader};
pub use vote::Vote;
