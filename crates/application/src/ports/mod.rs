//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness core and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer.

#[cfg(test)]
pub(crate) mod mock_transport;
mod transport;

pub use transport::{Transport, TransportError};
