//! Loading indicator for store fetches
//!
//! A spinner bound to a store's `loading` flag: it appears when the flag is
//! raised and disappears when it drops, so cache hits (which never raise the
//! flag) print no spinner at all.
//!
//! # Examples
//!
//! ```rust,no_run
//! use console_store::app::{AdminStore, QueryParams};
//! use console_store::cli::LoadingIndicator;
//!
//! # async fn example(store: &AdminStore) -> Result<(), Box<dyn std::error::Error>> {
//! let indicator = LoadingIndicator::spawn(
//!     store.users().subscribe(),
//!     |state| state.loading,
//!     "Loading users...",
//! );
//! let page = store.fetch_users(QueryParams::new()).await;
//! indicator.finish().await;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

const TICK_INTERVAL: Duration = Duration::from_millis(120);
const TICK_STRINGS: &[&str] = &["◐", "◓", "◑", "◒", "●"];

/// Build the spinner used for every loading state
pub fn loading_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICK_STRINGS),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(TICK_INTERVAL);
    spinner
}

/// Background task mirroring a `loading` flag as a spinner
#[derive(Debug)]
pub struct LoadingIndicator {
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl LoadingIndicator {
    /// Watch `rx` and show a spinner while `is_loading` holds
    pub fn spawn<S>(
        mut rx: watch::Receiver<S>,
        is_loading: fn(&S) -> bool,
        message: impl Into<String>,
    ) -> Self
    where
        S: Send + Sync + 'static,
    {
        let message = message.into();
        let (stop, mut stopped) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut spinner: Option<ProgressBar> = None;
            loop {
                let loading = is_loading(&rx.borrow_and_update());
                if loading && spinner.is_none() {
                    spinner = Some(loading_spinner(message.clone()));
                } else if !loading {
                    if let Some(active) = spinner.take() {
                        active.finish_and_clear();
                    }
                }

                tokio::select! {
                    _ = &mut stopped => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }

            if let Some(active) = spinner {
                active.finish_and_clear();
            }
            debug!("Loading indicator stopped");
        });

        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// An indicator that never shows anything (quiet mode)
    pub fn disabled() -> Self {
        Self {
            stop: None,
            handle: None,
        }
    }

    /// Spawn unless `quiet`
    pub fn spawn_unless<S>(
        quiet: bool,
        rx: watch::Receiver<S>,
        is_loading: fn(&S) -> bool,
        message: impl Into<String>,
    ) -> Self
    where
        S: Send + Sync + 'static,
    {
        if quiet {
            Self::disabled()
        } else {
            Self::spawn(rx, is_loading, message)
        }
    }

    /// Stop watching and clear the spinner
    pub async fn finish(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}
