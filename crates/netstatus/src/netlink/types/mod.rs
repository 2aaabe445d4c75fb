//! Fixed-size family headers of rtnetlink messages.

pub mod addr;
pub mod link;
pub mod neigh;
pub mod route;
