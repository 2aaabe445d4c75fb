//! networkctl verb implementations.

pub mod list;
pub mod lldp;
pub mod status;
