//! Kubewatch Library
//!
//! Normalized Kubernetes lifecycle events, the handler contract, and the
//! AWS EventBridge sink. The `kubewatch` binary wires these together behind
//! a small CLI.
//! Tests are included in the module files and under `tests/`.

pub mod cli;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod event;
pub mod handler;
pub mod observability;
pub mod server;
pub mod source;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use dispatcher::Dispatcher;
pub use event::{Event, Reason};
pub use handler::{DeliveryOutcome, Handler, HandlerError, HandlerKind};
