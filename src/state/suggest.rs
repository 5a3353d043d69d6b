//! Debounced type-ahead suggestions.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::catalog::Catalog;
use crate::models::Suggestion;

/// Runs at most one delayed task at a time. Scheduling a new task aborts
/// the pending one, including any fetch it has already started.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` once the delay passes without another call
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// What the suggestion dropdown shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionState {
    /// Input the suggestions belong to
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SuggestionState {
    /// The dropdown is visible only when there is something to list
    pub fn is_open(&self) -> bool {
        !self.suggestions.is_empty()
    }
}

/// Search input with a debounced suggestion dropdown
#[derive(Debug)]
pub struct SuggestionBox {
    catalog: Arc<dyn Catalog>,
    debouncer: Debouncer,
    limit: usize,
    state: watch::Sender<SuggestionState>,
    selected: Option<usize>,
}

impl SuggestionBox {
    pub fn new(catalog: Arc<dyn Catalog>, debounce: Duration, limit: usize) -> Self {
        let (state, _) = watch::channel(SuggestionState::default());
        Self {
            catalog,
            debouncer: Debouncer::new(debounce),
            limit,
            state,
            selected: None,
        }
    }

    /// Receiver for suggestion updates
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn current(&self) -> SuggestionState {
        self.state.borrow().clone()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Handle a keystroke. Blank input closes the dropdown at once; anything
    /// else fetches after the debounce delay.
    pub fn input(&mut self, text: &str) {
        self.selected = None;

        if text.trim().is_empty() {
            self.debouncer.cancel();
            self.state.send_replace(SuggestionState::default());
            return;
        }

        let query = text.to_string();
        self.state.send_modify(|state| {
            state.query = query.clone();
            state.loading = true;
            state.error = None;
        });

        let catalog = Arc::clone(&self.catalog);
        let state = self.state.clone();
        let limit = self.limit;
        self.debouncer.schedule(async move {
            let outcome = catalog.suggestions(&query, limit).await;
            state.send_if_modified(|current| {
                // A newer keystroke owns the dropdown now
                if current.query != query {
                    return false;
                }
                current.loading = false;
                match outcome {
                    Ok(suggestions) => {
                        tracing::debug!("{} suggestions for {:?}", suggestions.len(), query);
                        current.suggestions = suggestions;
                    }
                    Err(e) => {
                        tracing::warn!("Suggestion request failed: {}", e);
                        current.suggestions.clear();
                        current.error = Some(e.to_string());
                    }
                }
                true
            });
        });
    }

    /// Arrow down, wrapping to the first entry
    pub fn select_next(&mut self) -> Option<usize> {
        let len = self.state.borrow().suggestions.len();
        self.selected = match (len, self.selected) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(index)) => Some((index + 1) % len),
        };
        self.selected
    }

    /// Arrow up, wrapping to the last entry
    pub fn select_prev(&mut self) -> Option<usize> {
        let len = self.state.borrow().suggestions.len();
        self.selected = match (len, self.selected) {
            (0, _) => None,
            (len, None | Some(0)) => Some(len - 1),
            (_, Some(index)) => Some(index - 1),
        };
        self.selected
    }

    /// Enter on the highlighted entry
    pub fn accept(&mut self) -> Option<Suggestion> {
        let index = self.selected?;
        let suggestion = self.state.borrow().suggestions.get(index).cloned()?;
        self.close();
        Some(suggestion)
    }

    /// Escape
    pub fn close(&mut self) {
        self.debouncer.cancel();
        self.selected = None;
        self.state.send_modify(|state| {
            state.suggestions.clear();
            state.loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScriptedCatalog;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn suggestion_box(catalog: Arc<ScriptedCatalog>) -> SuggestionBox {
        SuggestionBox::new(catalog, DEBOUNCE, 5)
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_keeps_only_last_task() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(DEBOUNCE);

        for _ in 0..3 {
            let runs = Arc::clone(&runs);
            debouncer.schedule(async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(debouncer.is_pending());

        tokio::time::sleep(DEBOUNCE).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_fetches_once() {
        let catalog = Arc::new(ScriptedCatalog::new());
        let mut input = suggestion_box(Arc::clone(&catalog));
        let mut updates = input.subscribe();

        input.input("m");
        input.input("ma");
        input.input("mach");
        assert!(input.current().loading);

        tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;
        updates.changed().await.unwrap();

        let state = input.current();
        assert_eq!(catalog.calls(), 1);
        assert_eq!(state.query, "mach");
        assert!(!state.loading);
        assert!(!state.suggestions.is_empty());
        assert!(state.suggestions.len() <= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_clears_immediately() {
        let catalog = Arc::new(ScriptedCatalog::new());
        let mut input = suggestion_box(Arc::clone(&catalog));

        input.input("learning");
        input.input("   ");
        assert_eq!(input.current(), SuggestionState::default());

        tokio::time::sleep(DEBOUNCE * 2).await;
        assert_eq!(catalog.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_reports_error() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog.fail_next(1);
        let mut input = suggestion_box(Arc::clone(&catalog));

        input.input("data");
        tokio::time::sleep(DEBOUNCE * 2).await;

        let state = input.current();
        assert!(state.suggestions.is_empty());
        assert!(state.error.is_some());
        assert!(!state.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_selection_wraps() {
        let catalog = Arc::new(ScriptedCatalog::new());
        let mut input = suggestion_box(Arc::clone(&catalog));
        assert_eq!(input.select_next(), None);

        input.input("learning");
        tokio::time::sleep(DEBOUNCE * 2).await;
        let len = input.current().suggestions.len();
        assert!(len > 1);

        assert_eq!(input.select_prev(), Some(len - 1));
        assert_eq!(input.select_next(), Some(0));
        assert_eq!(input.select_next(), Some(1));

        let accepted = input.accept().unwrap();
        assert_eq!(accepted, catalog.suggestions("learning", 5).await.unwrap()[1]);
        assert!(!input.current().is_open());
        assert_eq!(input.selected(), None);
    }
}
