//! # Event Source
//!
//! Reads newline-delimited JSON events and feeds them to the dispatcher.
//!
//! Cluster watching happens upstream; `kubewatch run` consumes the resulting
//! event stream from a file or stdin, one JSON [`Event`] per line. Blank lines
//! are skipped and lines that do not parse are logged and dropped.

use crate::event::Event;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Counters for one pass over an input stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub forwarded: usize,
    pub malformed: usize,
}

/// Parse one line, `Ok(None)` for a blank line
pub fn parse_line(line: &str) -> Result<Option<Event>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Forward every event read from `reader` into `tx`
///
/// Stops at end of input, or early when the receiving side is gone.
pub async fn forward_events<R>(reader: R, tx: mpsc::Sender<Event>) -> Result<ReadStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = ReadStats::default();
    let mut line_no = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read event stream")?
    {
        line_no += 1;
        match parse_line(&line) {
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    debug!("Event receiver closed, stopping input");
                    break;
                }
                stats.forwarded += 1;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(line = line_no, "Skipping malformed event: {}", e);
                stats.malformed += 1;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Reason;

    #[test]
    fn test_parse_line() {
        assert!(parse_line("   ").unwrap().is_none());
        let event = parse_line(r#"{"kind":"Pod","name":"web-1","reason":"Created"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(event.kind, "Pod");
        assert_eq!(event.reason, Reason::Created);
        assert!(parse_line("{not json").is_err());
    }

    #[tokio::test]
    async fn test_forward_skips_bad_lines() {
        let input = "{\"kind\":\"Pod\",\"name\":\"a\"}\n\nnope\n{\"kind\":\"Node\",\"name\":\"b\"}\n";
        let (tx, mut rx) = mpsc::channel(8);

        let stats = forward_events(input.as_bytes(), tx).await.unwrap();
        assert_eq!(
            stats,
            ReadStats {
                forwarded: 2,
                malformed: 1
            }
        );
        assert_eq!(rx.recv().await.unwrap().name, "a");
        assert_eq!(rx.recv().await.unwrap().name, "b");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_forward_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let stats = forward_events("{\"name\":\"a\"}\n".as_bytes(), tx).await.unwrap();
        assert_eq!(stats.forwarded, 0);
    }
}
