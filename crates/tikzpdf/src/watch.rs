//! Polling file watcher for watch mode.
//!
//! The watcher compares modification times on a fixed interval and calls
//! back once per poll in which any watched file changed. It runs on the
//! calling thread; a [`StopSignal`] ends the loop between polls.

use std::{
    fs, io,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, SystemTime},
};

use log::{debug, info, warn};

use crate::config::WatchConfig;

/// First delay before looking up a missing file again; doubles per retry.
const INITIAL_BACKOFF: Duration = Duration::from_millis(10);

/// Cloneable flag that stops a running [`Watcher`].
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct WatchedFile {
    path: PathBuf,
    stamp: Option<SystemTime>,
    missing: bool,
}

/// Watches files for modification.
#[derive(Debug)]
pub struct Watcher {
    files: Vec<WatchedFile>,
    interval: Duration,
    missing_retries: u32,
    stop: StopSignal,
}

impl Watcher {
    /// Watch `files`, taking their current modification times as baseline.
    pub fn new(files: Vec<PathBuf>, config: &WatchConfig) -> Self {
        let mut watcher = Self {
            files: Vec::with_capacity(files.len()),
            interval: config.interval(),
            missing_retries: config.missing_retries(),
            stop: StopSignal::new(),
        };

        for path in files {
            let stamp = modified(&path).ok();
            watcher.files.push(WatchedFile {
                path,
                stamp,
                missing: stamp.is_none(),
            });
        }
        watcher
    }

    /// A handle that stops [`Watcher::watch`].
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Check every file once. Returns `true` if any of them changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        for index in 0..self.files.len() {
            let stamp = self.lookup(index);
            let file = &mut self.files[index];

            match stamp {
                Some(stamp) => {
                    if file.missing {
                        info!(path = file.path.display().to_string(); "Watched file is back");
                        file.missing = false;
                    }
                    if file.stamp != Some(stamp) {
                        debug!(path = file.path.display().to_string(); "Change detected");
                        file.stamp = Some(stamp);
                        changed = true;
                    }
                }
                None => {
                    if !file.missing {
                        warn!(path = file.path.display().to_string(); "Watched file is missing");
                        file.missing = true;
                    }
                }
            }
        }
        changed
    }

    /// Poll until stopped, calling `on_change` after each poll that saw a
    /// change.
    pub fn watch<F: FnMut()>(&mut self, mut on_change: F) {
        info!(files = self.files.len(), interval_ms = self.interval.as_millis() as u64; "Watching for changes");
        while !self.stop.is_stopped() {
            thread::sleep(self.interval);
            if self.stop.is_stopped() {
                break;
            }
            if self.poll() {
                on_change();
            }
        }
        info!("Stopped watching");
    }

    /// Modification time of file `index`, retrying with backoff while it is
    /// missing. Editors that save by replacing a file leave a short gap.
    fn lookup(&self, index: usize) -> Option<SystemTime> {
        let path = &self.files[index].path;
        let mut backoff = INITIAL_BACKOFF;

        for attempt in 0..=self.missing_retries {
            match modified(path) {
                Ok(stamp) => return Some(stamp),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    if attempt < self.missing_retries {
                        thread::sleep(backoff);
                        backoff *= 2;
                    }
                }
                Err(err) => {
                    debug!(path = path.display().to_string(), error = err.to_string(); "Cannot read modification time");
                    return None;
                }
            }
        }
        None
    }
}

fn modified(path: &std::path::Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}
