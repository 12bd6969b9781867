//! Per-run context used by the compiled graph: optional stream sender and modes.

use std::collections::HashSet;
use std::fmt::Debug;

use tokio::sync::mpsc;

use crate::stream::{StreamEvent, StreamMode};

/// Streaming side channel of one graph run. `invoke` runs with an empty context.
pub(crate) struct RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub(crate) stream_tx: Option<mpsc::Sender<StreamEvent<S>>>,
    pub(crate) stream_mode: HashSet<StreamMode>,
}

impl<S> RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub(crate) fn silent() -> Self {
        Self {
            stream_tx: None,
            stream_mode: HashSet::new(),
        }
    }

    pub(crate) fn streaming(tx: mpsc::Sender<StreamEvent<S>>, modes: HashSet<StreamMode>) -> Self {
        Self {
            stream_tx: Some(tx),
            stream_mode: modes,
        }
    }

    /// Sends `event` when `mode` is enabled. A dropped receiver is ignored: the run
    /// continues and its result is still returned through the join handle.
    pub(crate) async fn emit(&self, mode: StreamMode, event: impl FnOnce() -> StreamEvent<S>) {
        if let Some(tx) = &self.stream_tx {
            if self.stream_mode.contains(&mode) {
                let _ = tx.send(event()).await;
            }
        }
    }
}
