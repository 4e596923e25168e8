//! File watching with per-rule rebuild workers.
//!
//! ```text
//! notify ──► dispatcher thread ──► Debouncer ──► match rules ──► worker per rule
//!               │                                                  │
//!               └─ WatchRoots (attach / re-attach)                 └─ WatchRule::handle
//! ```
//!
//! Each rule owns one worker thread, so a slow style pass never delays a
//! script rebuild. Batches that queue up while a rebuild runs are merged
//! into a single follow-up rebuild.

mod debouncer;
mod roots;
mod rule;
mod rules;
mod types;

pub use rule::{RebuildAction, WatchRule};
pub use rules::{WatchContext, standard_rules};

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, select, unbounded};
use notify::{RecommendedWatcher, RecursiveMode};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::{is_shutdown, register_watch, unregister_watch};
use crate::log;
use crate::utils::plural::plural_count;
use debouncer::Debouncer;
use roots::WatchRoots;
use types::ChangeKind;

/// How often the foreground wait loop re-checks the shutdown flag.
const SHUTDOWN_POLL: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),

    #[error("invalid watch pattern: {0}")]
    Pattern(#[from] ignore::Error),

    #[error("failed to spawn watch thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Build the standard rules and watch until shutdown, or detach.
pub fn watch_assets(ctx: &WatchContext, background: bool) -> Result<(), WatchError> {
    let rules = standard_rules(ctx)?;
    log!("watch"; "starting asset watcher ({})", plural_count(rules.len(), "rule"));

    let observer = Observer::start(rules)?;
    if background {
        log!("watch"; "watching in background");
        observer.detach();
    } else {
        log!("watch"; "watching for changes, press Ctrl+C to stop");
        observer.wait_for_shutdown();
        log!("watch"; "stopped asset watcher");
    }
    Ok(())
}

/// A running watch session.
pub struct Observer {
    stop_tx: Sender<()>,
    dispatcher: Option<JoinHandle<()>>,
}

impl Observer {
    /// Attach every rule root and start dispatching.
    ///
    /// Roots that do not exist yet are attached once they appear.
    pub fn start(rules: Vec<WatchRule>) -> Result<Self, WatchError> {
        let (event_tx, event_rx) = unbounded();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let _ = event_tx.send(res);
        })?;

        let mut roots = WatchRoots::new(rules.iter().flat_map(|rule| {
            let mode = if rule.recursive {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            rule.roots.iter().map(move |root| (root.clone(), mode))
        }));
        roots.attach_existing(&mut watcher)?;
        for (root, _) in roots.desired() {
            crate::debug!("watch"; "watching {}", root.display());
        }

        let workers = Workers::spawn(rules)?;
        let (stop_tx, stop_rx) = unbounded();
        let dispatcher = thread::Builder::new()
            .name("watch-dispatch".into())
            .spawn(move || dispatch_loop(watcher, roots, event_rx, stop_rx, workers))
            .map_err(WatchError::Spawn)?;

        Ok(Self {
            stop_tx,
            dispatcher: Some(dispatcher),
        })
    }

    /// Block until Ctrl+C, then stop.
    pub fn wait_for_shutdown(self) {
        let signal = register_watch();
        loop {
            match signal.recv_timeout(SHUTDOWN_POLL) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    if is_shutdown() {
                        break;
                    }
                    if self.dispatcher.as_ref().is_none_or(|d| d.is_finished()) {
                        log!("error"; "watch dispatcher exited unexpectedly");
                        break;
                    }
                }
            }
        }
        unregister_watch();
        self.stop();
    }

    /// Stop dispatching and wait for in-flight rebuilds to finish.
    ///
    /// Queued batches that have not started are dropped.
    pub fn stop(mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.dispatcher.take() {
            let _ = handle.join();
        }
    }

    /// Leave the session running for the rest of the process.
    pub fn detach(self) {
        std::mem::forget(self);
    }
}

fn dispatch_loop(
    mut watcher: RecommendedWatcher,
    mut roots: WatchRoots,
    event_rx: Receiver<notify::Result<notify::Event>>,
    stop_rx: Receiver<()>,
    workers: Workers,
) {
    let mut debouncer = Debouncer::new();

    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(event_rx) -> msg => match msg {
                Ok(Ok(event)) => debouncer.add_event(&event),
                Ok(Err(e)) => log!("watch"; "notify error: {}", e),
                Err(_) => break,
            },
            default(debouncer.sleep_duration()) => {
                roots.maintain(&mut watcher);
                if let Some(changes) = debouncer.take_if_ready() {
                    workers.dispatch(&changes);
                }
            }
        }
    }

    drop(watcher);
    workers.shutdown();
}

/// One worker thread per rule, fed with matched path batches.
struct Workers {
    rules: Vec<Arc<WatchRule>>,
    senders: Vec<Sender<Vec<PathBuf>>>,
    handles: Vec<JoinHandle<()>>,
    stopping: Arc<AtomicBool>,
}

impl Workers {
    fn spawn(rules: Vec<WatchRule>) -> Result<Self, WatchError> {
        let stopping = Arc::new(AtomicBool::new(false));
        let mut workers = Self {
            rules: Vec::with_capacity(rules.len()),
            senders: Vec::with_capacity(rules.len()),
            handles: Vec::with_capacity(rules.len()),
            stopping: Arc::clone(&stopping),
        };

        for rule in rules {
            let rule = Arc::new(rule);
            let (tx, rx) = unbounded::<Vec<PathBuf>>();
            let worker_rule = Arc::clone(&rule);
            let worker_stopping = Arc::clone(&stopping);
            let handle = thread::Builder::new()
                .name(format!("watch-{}", rule.name))
                .spawn(move || worker_loop(&worker_rule, &rx, &worker_stopping))
                .map_err(WatchError::Spawn)?;

            workers.rules.push(rule);
            workers.senders.push(tx);
            workers.handles.push(handle);
        }

        Ok(workers)
    }

    /// Route a debounced change set to every matching rule.
    ///
    /// Returns how many rules received work.
    fn dispatch(&self, changes: &FxHashMap<PathBuf, ChangeKind>) -> usize {
        let mut paths: Vec<&PathBuf> = changes
            .iter()
            .filter(|(_, kind)| kind.triggers_rebuild())
            .map(|(path, _)| path)
            .collect();
        paths.sort();

        let mut notified = 0;
        for (rule, tx) in self.rules.iter().zip(&self.senders) {
            let matched: Vec<PathBuf> = paths
                .iter()
                .filter(|path| rule.matches(path))
                .map(|path| (*path).clone())
                .collect();
            if matched.is_empty() {
                continue;
            }
            if tx.send(matched).is_ok() {
                notified += 1;
            }
        }
        notified
    }

    /// Drop pending work and join every worker.
    fn shutdown(self) {
        self.stopping.store(true, Ordering::SeqCst);
        drop(self.senders);
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

fn worker_loop(rule: &WatchRule, rx: &Receiver<Vec<PathBuf>>, stopping: &AtomicBool) {
    while let Ok(mut batch) = rx.recv() {
        // Merge whatever piled up during the previous rebuild
        while let Ok(more) = rx.try_recv() {
            for path in more {
                if !batch.contains(&path) {
                    batch.push(path);
                }
            }
        }

        if stopping.load(Ordering::SeqCst) || is_shutdown() {
            break;
        }
        rule.handle(&batch);
    }
}
