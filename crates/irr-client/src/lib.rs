//! irr-client: boundary client library.
//!
//! Speaks the polled variable protocol from the client side: discover the
//! topology, read status variables, and request runs by writing command
//! fields and flipping the edge-triggered flags the server clears.

pub mod client;
pub mod error;

pub use client::BoundaryClient;
pub use error::{ClientError, ClientResult};
