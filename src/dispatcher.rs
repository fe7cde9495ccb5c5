//! # Dispatcher
//!
//! Fans events out to the configured handlers.
//!
//! Every event is delivered to every handler concurrently. There is no
//! ordering guarantee between events and no throttling: each handler bounds
//! its own work with its own timeout.

use crate::event::Event;
use crate::handler::Handler;
use crate::observability::metrics;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct Dispatcher {
    handlers: Arc<[Arc<dyn Handler>]>,
}

impl Dispatcher {
    /// Create a dispatcher over initialized handlers
    #[must_use]
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self {
            handlers: handlers.into(),
        }
    }

    #[must_use]
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Deliver one event to every handler
    ///
    /// Each handler runs in its own task, so one that panics does not keep
    /// the others from seeing the event.
    pub async fn dispatch(&self, event: &Event) {
        metrics::increment_events_received();
        debug!(
            kind = %event.kind,
            name = %event.name,
            reason = %event.reason,
            handlers = self.handlers.len(),
            "Dispatching event"
        );

        let event = Arc::new(event.clone());
        let mut tasks = JoinSet::new();
        self.spawn_handlers(&mut tasks, &event);
        while let Some(joined) = tasks.join_next().await {
            log_join_error(joined);
        }
    }

    fn spawn_handlers(&self, tasks: &mut JoinSet<()>, event: &Arc<Event>) {
        for handler in self.handlers.iter() {
            let handler = Arc::clone(handler);
            let event = Arc::clone(event);
            tasks.spawn(async move { handler.handle(&event).await });
        }
    }

    /// Consume `events` until the channel closes
    ///
    /// Every (event, handler) pair runs in its own task, so a handler that
    /// panics affects neither the other handlers nor later events. Returns
    /// the number of events dispatched.
    pub async fn run(&self, mut events: mpsc::Receiver<Event>) -> usize {
        let mut tasks = JoinSet::new();
        let mut dispatched = 0usize;

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    metrics::increment_events_received();
                    self.spawn_handlers(&mut tasks, &Arc::new(event));
                    dispatched += 1;
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    log_join_error(joined);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            log_join_error(joined);
        }

        info!(dispatched, "Event stream closed");
        dispatched
    }
}

fn log_join_error(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!("Event dispatch task failed: {}", e);
    }
}
