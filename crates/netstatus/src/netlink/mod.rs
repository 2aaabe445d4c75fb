//! Netlink route transport and message decoding.

pub mod builder;
pub mod connection;
pub mod error;
pub mod family;
pub mod message;
pub mod messages;
pub mod parse;
pub mod socket;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use connection::{Connection, RtnlDump};
pub use error::{Error, Result};
pub use family::AddressFamily;
