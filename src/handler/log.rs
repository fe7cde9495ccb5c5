//! # Log Handler
//!
//! The default sink: writes each event message to the log.

use super::{DeliveryOutcome, Handler, HandlerError};
use crate::config::Config;
use crate::event::Event;
use crate::observability::metrics;
use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandler;

#[async_trait]
impl Handler for LogHandler {
    fn name(&self) -> &'static str {
        "default"
    }

    async fn init(&mut self, _config: &Config) -> Result<(), HandlerError> {
        Ok(())
    }

    async fn handle(&self, event: &Event) {
        info!(
            kind = %event.kind,
            namespace = %event.namespace,
            name = %event.name,
            reason = %event.reason,
            "{}",
            event.message()
        );
        metrics::record_handler_outcome(self.name(), DeliveryOutcome::Delivered.as_str());
    }
}
