//! Analysis session
//!
//! Owns everything a presentation layer observes: the published corpus, the
//! loading and ready flags, the status line and the current selection. Every
//! change is announced on a broadcast channel.
//!
//! An analysis runs as one background task. Starting a new one cancels and
//! awaits the previous task before any state is cleared, so a superseded run
//! can never publish into a fresh session. The corpus is only visible after
//! the run has finished all three phases.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::analysis::{corpus_metrics, CorpusAnalysis};
use crate::config::Config;
use crate::corpus::Corpus;
use crate::error::{ArchlensError, Result};
use crate::indexing::SourceProvider;

/// Capacity of the event channel; slow subscribers see `Lagged`
const EVENT_CAPACITY: usize = 256;

pub const FETCHING_STATUS: &str = "Fetching...";

/// What the user is looking at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// An entity name
    File(String),
    /// A folder path; `""` is the corpus root
    Folder(String),
}

/// State-change notifications, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Cleared,
    AnalysisStarted { source: String },
    AnalysisReady { entities: usize, skipped: usize },
    StatusMessage(String),
    SelectionChanged(Selection),
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub source: String,
    pub entities: usize,
    /// Paths that could not be fetched or decoded
    pub skipped: Vec<String>,
}

/// Point-in-time copy of the observable session state
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub corpus: Option<Arc<Corpus>>,
    pub loading: bool,
    pub ready: bool,
    pub status: String,
    pub selected_file: Option<String>,
    pub selected_folder: Option<String>,
}

struct Shared {
    state: RwLock<SessionSnapshot>,
    events: broadcast::Sender<SessionEvent>,
}

impl Shared {
    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn set_status(&self, status: impl Into<String>) {
        let status = status.into();
        self.state.write().status = status.clone();
        self.emit(SessionEvent::StatusMessage(status));
    }

    /// Surface a run-aborting error as the status line
    fn fail(&self, error: &ArchlensError) {
        self.state.write().loading = false;
        self.set_status(format!("Error: {}", error));
    }
}

struct ActiveRun {
    cancel: CancellationToken,
    handle: JoinHandle<Result<RunSummary>>,
}

/// Explicitly owned analysis context
pub struct AnalysisSession {
    config: Config,
    shared: Arc<Shared>,
    run: Option<ActiveRun>,
    last_summary: Option<RunSummary>,
}

impl AnalysisSession {
    pub fn new(config: Config) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            shared: Arc::new(Shared {
                state: RwLock::new(SessionSnapshot::default()),
                events,
            }),
            run: None,
            last_summary: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    /// Cancel any in-flight run, clear state and spawn a new analysis
    pub async fn start(&mut self, provider: Arc<dyn SourceProvider>) {
        self.cancel_current().await;
        self.reset();

        let source = provider.describe();
        self.shared.state.write().loading = true;
        self.shared.emit(SessionEvent::AnalysisStarted {
            source: source.clone(),
        });

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_analysis(
            provider,
            self.config.clone(),
            Arc::clone(&self.shared),
            cancel.clone(),
        ));

        info!(target: "archlens::session", source = %source, "Analysis started");
        self.run = Some(ActiveRun { cancel, handle });
    }

    /// Await the current run and return its outcome.
    ///
    /// With no run in flight, returns the last successful summary, or
    /// `NotReady` if nothing was ever published.
    pub async fn wait(&mut self) -> Result<RunSummary> {
        let Some(run) = self.run.take() else {
            return self.last_summary.clone().ok_or(ArchlensError::NotReady);
        };

        let outcome = run.handle.await.map_err(|e| ArchlensError::Provider {
            message: format!("analysis task failed: {}", e),
        })?;

        if let Ok(summary) = &outcome {
            self.last_summary = Some(summary.clone());
        }
        outcome
    }

    /// Cancel any run and reset every field
    pub async fn clear(&mut self) {
        self.cancel_current().await;
        self.reset();
    }

    async fn cancel_current(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel.cancel();
            // The outcome of a superseded run is irrelevant
            let _ = run.handle.await;
            debug!(target: "archlens::session", "Previous analysis cancelled");
        }
    }

    fn reset(&mut self) {
        self.last_summary = None;
        *self.shared.state.write() = SessionSnapshot::default();
        self.shared.emit(SessionEvent::Cleared);
    }

    /// The published corpus; `NotReady` until the ready event
    pub fn corpus(&self) -> Result<Arc<Corpus>> {
        let state = self.shared.state.read();
        match (&state.corpus, state.ready) {
            (Some(corpus), true) => Ok(Arc::clone(corpus)),
            _ => Err(ArchlensError::NotReady),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.state.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.read().loading
    }

    pub fn is_ready(&self) -> bool {
        self.shared.state.read().ready
    }

    pub fn status(&self) -> String {
        self.shared.state.read().status.clone()
    }

    pub fn select_file(&self, name: impl Into<String>) {
        let name = name.into();
        self.shared.state.write().selected_file = Some(name.clone());
        self.shared
            .emit(SessionEvent::SelectionChanged(Selection::File(name)));
    }

    pub fn select_folder(&self, path: impl Into<String>) {
        let path = path.into();
        self.shared.state.write().selected_folder = Some(path.clone());
        self.shared
            .emit(SessionEvent::SelectionChanged(Selection::Folder(path)));
    }

    pub fn selected_file(&self) -> Option<String> {
        self.shared.state.read().selected_file.clone()
    }

    pub fn selected_folder(&self) -> Option<String> {
        self.shared.state.read().selected_folder.clone()
    }

    /// Metrics for the selected folder's direct children, or for the whole
    /// corpus when no folder is selected
    pub fn metrics_for_selection(&self) -> Result<CorpusAnalysis> {
        let corpus = self.corpus()?;
        Ok(match self.selected_folder() {
            Some(folder) => CorpusAnalysis::from_entities(corpus.in_folder(&folder)),
            None => corpus_metrics(&corpus),
        })
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Background task body
async fn run_analysis(
    provider: Arc<dyn SourceProvider>,
    config: Config,
    shared: Arc<Shared>,
    cancel: CancellationToken,
) -> Result<RunSummary> {
    let source = provider.describe();
    let result = fetch_and_analyze(provider.as_ref(), config, &shared, &cancel).await;

    match result {
        Ok((corpus, skipped)) => {
            let summary = RunSummary {
                source,
                entities: corpus.len(),
                skipped,
            };
            let mut status = format!("{} files analyzed", summary.entities);
            if !summary.skipped.is_empty() {
                status.push_str(&format!(", {} skipped", summary.skipped.len()));
            }

            {
                let mut state = shared.state.write();
                if cancel.is_cancelled() {
                    return Err(ArchlensError::Cancelled);
                }
                state.corpus = Some(Arc::new(corpus));
                state.loading = false;
                state.ready = true;
            }
            shared.set_status(status);
            shared.emit(SessionEvent::AnalysisReady {
                entities: summary.entities,
                skipped: summary.skipped.len(),
            });

            info!(
                target: "archlens::session",
                source = %summary.source,
                entities = summary.entities,
                skipped = summary.skipped.len(),
                "Analysis complete"
            );
            Ok(summary)
        }
        Err(ArchlensError::Cancelled) => {
            debug!(target: "archlens::session", source = %source, "Analysis cancelled");
            Err(ArchlensError::Cancelled)
        }
        Err(e) => {
            warn!(target: "archlens::session", source = %source, error = %e, "Analysis failed");
            shared.fail(&e);
            Err(e)
        }
    }
}

async fn fetch_and_analyze(
    provider: &dyn SourceProvider,
    config: Config,
    shared: &Shared,
    cancel: &CancellationToken,
) -> Result<(Corpus, Vec<String>)> {
    shared.set_status(FETCHING_STATUS);
    config.validate()?;

    let paths = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ArchlensError::Cancelled),
        listed = provider.list_files() => listed?,
    };

    let mut files = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();
    for path in paths {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ArchlensError::Cancelled),
            fetched = provider.fetch_file(&path) => fetched,
        };
        match fetched {
            Ok(content) => files.push((path, content)),
            Err(e) if !e.is_fatal_for_run() => {
                warn!(target: "archlens::session", path = %path, error = %e, "Skipping file");
                skipped.push(path);
            }
            Err(e) => return Err(e),
        }
    }

    // Phases 1-3 are CPU-bound
    let corpus = tokio::task::spawn_blocking(move || Corpus::from_sources(&files, &config))
        .await
        .map_err(|e| ArchlensError::Provider {
            message: format!("analysis task failed: {}", e),
        })?;

    if cancel.is_cancelled() {
        return Err(ArchlensError::Cancelled);
    }
    Ok((corpus, skipped))
}
