pub mod socket;

pub use socket::{routes, socket_entry};
