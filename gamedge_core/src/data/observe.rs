//! Live local-store queries
//!
//! Stores bump a [`ChangeNotifier`] after every write. [`observe`] turns a
//! query into a stream that runs once immediately and again after each change,
//! skipping results equal to the previous emission.

use crate::Result;
use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Write-side of a store's change signal
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: Arc<watch::Sender<u64>>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Signal that the store's contents changed
    pub fn notify(&self) {
        self.sender.send_modify(|version| *version = version.wrapping_add(1));
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }
}

/// Re-run `query` whenever any of `triggers` fires
pub fn observe<T, F, Fut>(
    triggers: Vec<watch::Receiver<u64>>,
    query: F,
) -> BoxStream<'static, Result<T>>
where
    T: PartialEq + Clone + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let changes = stream::select_all(triggers.into_iter().map(WatchStream::from_changes));
    let ticks = stream::once(async {})
        .chain(changes.map(|_| ()))
        .boxed();

    stream::unfold(
        (ticks, query, None::<T>),
        |(mut ticks, mut query, mut last)| async move {
            loop {
                ticks.next().await?;
                match query().await {
                    Ok(value) if last.as_ref() == Some(&value) => continue,
                    Ok(value) => {
                        last = Some(value.clone());
                        return Some((Ok(value), (ticks, query, last)));
                    }
                    Err(e) => return Some((Err(e), (ticks, query, last))),
                }
            }
        },
    )
    .boxed()
}
