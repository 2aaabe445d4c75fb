//! Strongly-typed rtnetlink messages.

mod address;
mod link;
mod neighbor;
mod route;

pub use address::AddressMessage;
pub use link::LinkMessage;
pub use neighbor::NeighborMessage;
pub use route::RouteMessage;
