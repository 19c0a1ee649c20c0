//! Regenerate whenever the input document changes.
//!
//! Generation runs on a worker thread, one run at a time. Changes that
//! arrive during a run are collapsed into a single follow-up run.

use crate::error::CliError;
use crate::generate::{Settings, run_once};
use crate::loader::InputSource;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::{Sender, channel};
use tracing::{debug, error, info, warn};

/// Regeneration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pending {
    #[default]
    Idle,
    Running,
    /// A change arrived while running; run again when done.
    RunningWithPending,
}

impl Pending {
    /// A change was seen. Returns whether a run should start now.
    pub fn request(&mut self) -> bool {
        match self {
            Pending::Idle => {
                *self = Pending::Running;
                true
            }
            Pending::Running | Pending::RunningWithPending => {
                *self = Pending::RunningWithPending;
                false
            }
        }
    }

    /// The current run finished. Returns whether another should start.
    pub fn finish(&mut self) -> bool {
        match self {
            Pending::RunningWithPending => {
                *self = Pending::Running;
                true
            }
            Pending::Running | Pending::Idle => {
                *self = Pending::Idle;
                false
            }
        }
    }
}

enum Message {
    Changed,
    WatchError(notify::Error),
    Finished(Result<(), CliError>),
}

/// Whether `event` touches the file at `input`.
fn is_relevant(event: &Event, input: &Path) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == input.file_name())
}

fn spawn_run(settings: &Settings, tx: &Sender<Message>) {
    let settings = settings.clone();
    let tx = tx.clone();
    std::thread::spawn(move || {
        let result = run_once(&settings).map(|_| ());
        let _ = tx.send(Message::Finished(result));
    });
}

/// Watch the input file and regenerate until the process is stopped.
pub fn watch(settings: Settings) -> Result<(), CliError> {
    let InputSource::File(input) = &settings.input else {
        return Err(CliError::WatchStdin);
    };
    let input = input.clone();

    let (tx, rx) = channel();
    let events = tx.clone();
    let target = input.clone();
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        let message = match result {
            Ok(event) if is_relevant(&event, &target) => Message::Changed,
            Ok(_) => return,
            Err(e) => Message::WatchError(e),
        };
        let _ = events.send(message);
    })?;
    // Editors often replace the file, so watch its directory.
    let directory = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    watcher.watch(directory, RecursiveMode::NonRecursive)?;
    info!(input = %input.display(), "watching for changes");

    let mut state = Pending::default();
    let _ = tx.send(Message::Changed);
    for message in rx {
        match message {
            Message::Changed => {
                if state.request() {
                    spawn_run(&settings, &tx);
                } else {
                    debug!("change during generation, queued");
                }
            }
            Message::WatchError(e) => warn!(error = %e, "watch error"),
            Message::Finished(result) => {
                if let Err(e) = result {
                    error!(error = %crate::error_chain(&e), "generation failed");
                }
                if state.finish() {
                    spawn_run(&settings, &tx);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use std::path::PathBuf;

    #[test]
    fn test_changes_during_run_collapse() {
        let mut state = Pending::default();
        assert!(state.request());
        assert!(!state.request());
        assert!(!state.request());
        assert_eq!(state, Pending::RunningWithPending);

        // One follow-up run for all queued changes.
        assert!(state.finish());
        assert_eq!(state, Pending::Running);
        assert!(!state.finish());
        assert_eq!(state, Pending::Idle);
    }

    #[test]
    fn test_idle_finish_is_noop() {
        let mut state = Pending::Idle;
        assert!(!state.finish());
        assert_eq!(state, Pending::Idle);
    }

    #[test]
    fn test_relevant_events() {
        let input = PathBuf::from("/project/openapi.yaml");
        let event = |kind, path: &str| Event::new(kind).add_path(PathBuf::from(path));

        assert!(is_relevant(
            &event(EventKind::Modify(ModifyKind::Any), "/project/openapi.yaml"),
            &input
        ));
        assert!(is_relevant(
            &event(EventKind::Create(CreateKind::File), "/project/openapi.yaml"),
            &input
        ));
        assert!(!is_relevant(
            &event(EventKind::Modify(ModifyKind::Any), "/project/api.ts"),
            &input
        ));
        assert!(!is_relevant(
            &event(EventKind::Remove(RemoveKind::File), "/project/openapi.yaml"),
            &input
        ));
    }

    #[test]
    fn test_watch_rejects_stdin() {
        let settings = Settings {
            input: InputSource::Stdin,
            output: None,
            options: Default::default(),
        };
        assert!(matches!(watch(settings), Err(CliError::WatchStdin)));
    }
}
