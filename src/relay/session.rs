use std::time::Duration;

use async_stream::stream;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use log::{debug, error, info};
use tokio::time::{timeout_at, Instant};

use crate::error::RelayError;
use crate::upstream::ByteStream;

/// One in-flight relay. Owns the upstream body; dropping the session (or the
/// stream it turns into) closes the upstream connection.
pub struct StreamSession {
    upstream: ByteStream,
    idle_timeout: Duration,
    total_timeout: Duration,
    deadline: Instant,
}

impl StreamSession {
    /// Session whose total budget starts now.
    pub fn new(upstream: ByteStream, idle_timeout: Duration, total_timeout: Duration) -> Self {
        Self::with_deadline(
            upstream,
            idle_timeout,
            total_timeout,
            Instant::now() + total_timeout,
        )
    }

    /// Session that must finish by `deadline`, which already covers the time
    /// spent connecting. `total_timeout` is only reported in the error.
    pub fn with_deadline(
        upstream: ByteStream,
        idle_timeout: Duration,
        total_timeout: Duration,
        deadline: Instant,
    ) -> Self {
        Self {
            upstream,
            idle_timeout,
            total_timeout,
            deadline,
        }
    }

    /// Forward upstream chunks verbatim and in order. A chunk is pulled from
    /// upstream only when the consumer polls for the next one.
    ///
    /// After an error item the stream ends; the caller can only close the
    /// connection at that point.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, RelayError>> + Send + 'static {
        let StreamSession {
            mut upstream,
            idle_timeout,
            total_timeout,
            deadline,
        } = self;
        let mut tracker = SessionTracker::default();

        stream! {
            loop {
                let wait_until = (Instant::now() + idle_timeout).min(deadline);
                match timeout_at(wait_until, upstream.next()).await {
                    Ok(Some(Ok(chunk))) => {
                        tracker.forwarded(chunk.len());
                        yield Ok(chunk);
                    }
                    Ok(Some(Err(err))) => {
                        tracker.failed(&err);
                        yield Err(err);
                        break;
                    }
                    Ok(None) => {
                        tracker.completed();
                        break;
                    }
                    Err(_) => {
                        let err = if Instant::now() >= deadline {
                            RelayError::DeadlineExceeded(total_timeout)
                        } else {
                            RelayError::IdleTimeout(idle_timeout)
                        };
                        tracker.failed(&err);
                        yield Err(err);
                        break;
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Streaming,
    Done,
    Error,
}

/// Logs the end of a session. Dropped while still streaming means the
/// inbound side went away.
#[derive(Default)]
struct SessionTracker {
    phase: Phase,
    chunks: usize,
    bytes: usize,
}

impl SessionTracker {
    fn forwarded(&mut self, len: usize) {
        self.chunks += 1;
        self.bytes += len;
    }

    fn completed(&mut self) {
        self.phase = Phase::Done;
        debug!(
            "Relay done: {} chunks, {} bytes forwarded",
            self.chunks, self.bytes
        );
    }

    fn failed(&mut self, err: &RelayError) {
        self.phase = Phase::Error;
        error!(
            "Relay stream aborted after {} chunks ({} bytes): {}",
            self.chunks, self.bytes, err
        );
    }
}

impl Drop for SessionTracker {
    fn drop(&mut self) {
        if self.phase == Phase::Streaming {
            info!(
                "Client went away after {} chunks; closing upstream connection",
                self.chunks
            );
        }
    }
}
