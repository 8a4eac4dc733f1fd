use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error};

use crate::{
    debounce::{Debouncer, DEFAULT_QUIET_INTERVAL},
    highlight::{highlight, Segment},
    search::{search, FinderStore, MemberDetails},
};

/// Lifecycle of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FinderState {
    /// No term, nothing shown
    Idle,
    /// Waiting for the input to settle
    Debouncing,
    /// Search was started and has not returned yet
    Fetching,
    /// Results of the current term are committed
    Displayed,
    /// The last search failed, previous results are kept
    Failed,
}

/// A message for the user, shown briefly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Error(String),
    Warning(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinderEvent {
    /// Results for `term` are now on display
    Displayed { term: String, matches: usize },
    Notify(Notification),
}

#[derive(Debug, Clone)]
pub struct FinderConfig {
    pub quiet_interval: Duration,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            quiet_interval: DEFAULT_QUIET_INTERVAL,
        }
    }
}

/// What the result panel shows
#[derive(Debug, Clone, Serialize)]
pub struct FinderView {
    pub term: String,
    pub state: FinderState,
    /// Is the result panel open?
    pub visible: bool,
    pub results: Vec<MemberDetails>,
}

impl FinderView {
    /// Member names split into segments, highlighting the term.
    pub fn highlighted_names(&self) -> Vec<Vec<Segment<'_>>> {
        let term = self.term.trim();
        self.results
            .iter()
            .map(|details| highlight(&details.member.name, term))
            .collect()
    }

    /// The search went through and found nobody.
    pub fn is_no_match(&self) -> bool {
        self.state == FinderState::Displayed && self.results.is_empty()
    }
}

struct Shared {
    term: String,
    /// Bumped on every change of the term. Results are only
    /// committed if the generation they were requested for is
    /// still current.
    generation: u64,
    state: FinderState,
    results: Vec<MemberDetails>,
    open: bool,
}

/// Search-as-you-type over the member roster.
///
/// Every input change restarts the quiet interval. When it
/// elapses with a non blank term, a search runs in the background
/// and its results replace the current ones, unless the term has
/// changed in the meantime. Failures are reported as
/// notifications on the event channel.
pub struct MemberFinder<DB> {
    db: Arc<DB>,
    shared: Arc<Mutex<Shared>>,
    debouncer: Debouncer,
    events: mpsc::UnboundedSender<FinderEvent>,
}

impl<DB> MemberFinder<DB>
where
    DB: FinderStore + 'static,
{
    pub fn new(
        db: Arc<DB>,
        config: FinderConfig,
    ) -> (Self, mpsc::UnboundedReceiver<FinderEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let shared = Shared {
            term: String::new(),
            generation: 0,
            state: FinderState::Idle,
            results: Vec::new(),
            open: false,
        };
        let finder = Self {
            db,
            shared: Arc::new(Mutex::new(shared)),
            debouncer: Debouncer::new(config.quiet_interval),
            events,
        };
        (finder, receiver)
    }

    /// The term was edited.
    pub async fn input(&mut self, term: &str) {
        let generation = {
            let mut shared = self.shared.lock().await;
            shared.term = term.to_string();
            shared.generation += 1;
            shared.open = true;

            if term.trim().is_empty() {
                self.debouncer.cancel();
                shared.state = FinderState::Idle;
                shared.results.clear();
                return;
            }
            shared.state = FinderState::Debouncing;
            shared.generation
        };

        let run = execute(
            self.db.clone(),
            self.shared.clone(),
            self.events.clone(),
            generation,
            term.to_string(),
        );
        self.debouncer.schedule(run);
    }

    /// The input gained focus.
    pub async fn focus(&self) {
        self.shared.lock().await.open = true;
    }

    /// Interaction outside of the finder closes the panel.
    /// Term and results are kept.
    pub async fn dismiss(&self) {
        self.shared.lock().await.open = false;
    }

    /// Clear the term and the results and close the panel.
    pub async fn clear(&mut self) {
        self.debouncer.cancel();
        let mut shared = self.shared.lock().await;
        shared.term.clear();
        shared.generation += 1;
        shared.state = FinderState::Idle;
        shared.results.clear();
        shared.open = false;
    }

    pub async fn view(&self) -> FinderView {
        let shared = self.shared.lock().await;
        FinderView {
            term: shared.term.clone(),
            state: shared.state,
            visible: shared.open && !shared.term.trim().is_empty(),
            results: shared.results.clone(),
        }
    }

    /// Wait until a scheduled search has run and its outcome
    /// was committed. Used when no more input will follow.
    pub async fn settle(&mut self) {
        self.debouncer.settle().await;
    }

    pub async fn state(&self) -> FinderState {
        self.shared.lock().await.state
    }
}

/// Run a search requested for `generation` and commit the
/// results if nothing superseded it.
async fn execute<DB>(
    db: Arc<DB>,
    shared: Arc<Mutex<Shared>>,
    events: mpsc::UnboundedSender<FinderEvent>,
    generation: u64,
    term: String,
) where
    DB: FinderStore,
{
    {
        let mut shared = shared.lock().await;
        if shared.generation != generation {
            return;
        }
        shared.state = FinderState::Fetching;
    }

    let outcome = search(&*db, &term).await;

    let mut shared = shared.lock().await;
    if shared.generation != generation {
        debug!(term = %term, "discarding results of superseded search");
        return;
    }
    // The receiver going away only means nobody listens anymore
    match outcome {
        Ok(found) => {
            if found.dropped > 0 {
                let _ = events.send(FinderEvent::Notify(Notification::Warning(
                    format!("Could not load {} member(s) matching \"{}\"",
                        found.dropped, found.term),
                )));
            }
            shared.state = FinderState::Displayed;
            shared.results = found.members;
            let _ = events.send(FinderEvent::Displayed {
                term: found.term,
                matches: shared.results.len(),
            });
        }
        Err(err) => {
            error!(term = %term, error = %err, "member search failed");
            shared.state = FinderState::Failed;
            let _ = events.send(FinderEvent::Notify(Notification::Error(
                "Error searching members".to_string(),
            )));
        }
    }
}
