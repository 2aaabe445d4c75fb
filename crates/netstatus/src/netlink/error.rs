//! Error types for status queries.

use std::io;

/// Result type for status queries.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while querying and decoding network state.
///
/// Only failures are represented here. Lookups that simply find nothing
/// (a missing LLDP log, an unknown OUI, an unresolved gateway) are reported
/// through `Option` or [`VendorLookup`](crate::oui::VendorLookup) instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket or file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Kernel returned an error code.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Message was truncated.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected message length.
        expected: usize,
        /// Actual bytes received.
        actual: usize,
    },

    /// Invalid message format.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// A message lacks an attribute it must carry.
    #[error("{message} message without {attribute}")]
    MissingAttribute {
        /// Message kind (e.g. "RTM_NEWLINK").
        message: &'static str,
        /// Missing attribute name.
        attribute: &'static str,
    },

    /// Parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Interface not found.
    #[error("interface not found: {name}")]
    InterfaceNotFound {
        /// The interface name or index that was not found.
        name: String,
    },

    /// Hardware database could not be used.
    #[error("hardware database: {0}")]
    Hwdb(String),
}

impl Error {
    /// Create a kernel error from an errno value.
    pub fn from_errno(errno: i32) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Kernel {
            errno: -errno,
            message,
        }
    }

    /// Check if this is a "not found" error (ENOENT, ENODEV, etc.).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } => matches!(*errno, 2 | 19), // ENOENT=2, ENODEV=19
            Self::Io(e) => e.kind() == io::ErrorKind::NotFound,
            Self::InterfaceNotFound { .. } => true,
            _ => false,
        }
    }

    /// Check if this error came from decoding kernel data rather than from
    /// the transport.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::InvalidMessage(_)
                | Self::MissingAttribute { .. }
                | Self::Parse(_)
        )
    }
}
