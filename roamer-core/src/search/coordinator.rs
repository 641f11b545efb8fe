//! State machine behind the place search panel.
//!
//! The coordinator owns the visible result list, the keyboard focus and the
//! loading flag. Requests are tagged with an [`IssueTime`]; a response only
//! reaches the visible state when no later-issued request has already been
//! accepted, so a slow answer to an earlier keystroke can never overwrite a
//! fresher list.
//!
//! All state lives behind a [`RefCell`] that is never borrowed across an
//! `.await`, so several [`SearchCoordinator::handle_input`] futures may be in
//! flight on the same scheduler and complete in any order.

use std::cell::RefCell;

use log::{debug, warn};

use super::{IssueClock, IssueTime, Key, SearchOptions, SearchQuery, SearchResult, SequenceClock};
use crate::{Geocoder, SearchEvents, ServiceCallError};

/// Observable phase of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// No results and nothing in flight.
    Idle,
    /// A request is in flight; earlier results may still be visible.
    Loading,
    /// Results are visible.
    Populated,
}

/// What happened to a response handed to
/// [`SearchCoordinator::handle_response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The response became the visible result list.
    Applied,
    /// The response was accepted while the panel was hidden, or it answers a
    /// request issued before the panel was last shown or hidden; only the
    /// bookkeeping advanced.
    Recorded,
    /// A later request had already been accepted, or a newer one is pending
    /// for an error; the response was dropped.
    Stale,
    /// The authoritative request failed and the error was reported.
    Failed,
}

/// A request issued by [`SearchCoordinator::begin_search`] awaiting its
/// response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    /// Issue time identifying the request.
    pub issued_at: IssueTime,
    /// Query to send to the geocoder.
    pub query: SearchQuery,
}

#[derive(Debug, Default)]
struct PanelState {
    results: Vec<SearchResult>,
    focus: Option<usize>,
    loading: bool,
    visible: bool,
    latest_issued: Option<IssueTime>,
    last_accepted: Option<IssueTime>,
    session_start: Option<IssueTime>,
}

impl PanelState {
    fn clear(&mut self) {
        self.results.clear();
        self.focus = None;
        self.loading = false;
    }

    fn accepts(&self, issued_at: IssueTime) -> bool {
        self.last_accepted.is_none_or(|last| issued_at >= last)
    }

    fn predates_session(&self, issued_at: IssueTime) -> bool {
        self.session_start.is_some_and(|start| issued_at <= start)
    }

    fn issue(&mut self, requested: IssueTime) -> IssueTime {
        let issued_at = match self.latest_issued {
            Some(latest) if requested <= latest => latest.next(),
            _ => requested,
        };
        self.latest_issued = Some(issued_at);
        issued_at
    }
}

/// Serialises search input into race-free geocoding queries.
///
/// # Examples
/// ```
/// use roamer_core::{IssueTime, SearchCoordinator, SearchOptions, SearchPhase, SearchResult};
/// use roamer_core::test_support::ScriptedGeocoder;
///
/// let coordinator =
///     SearchCoordinator::new(ScriptedGeocoder::default(), (), SearchOptions::new("token"));
/// let early = coordinator.begin_search_at("par", IssueTime(0)).expect("non-empty input");
/// let late = coordinator.begin_search_at("pari", IssueTime(10)).expect("non-empty input");
///
/// let paris = SearchResult::new("place.1", "Paris", 48.85, 2.35);
/// let parma = SearchResult::new("place.2", "Parma", 44.8, 10.33);
/// coordinator.handle_response(late.issued_at, Ok(vec![paris.clone()]));
/// coordinator.handle_response(early.issued_at, Ok(vec![parma]));
///
/// assert_eq!(coordinator.results(), vec![paris]);
/// assert_eq!(coordinator.phase(), SearchPhase::Populated);
/// ```
#[derive(Debug)]
pub struct SearchCoordinator<G, E, C = SequenceClock> {
    geocoder: G,
    events: E,
    clock: C,
    options: SearchOptions,
    state: RefCell<PanelState>,
}

impl<G, E> SearchCoordinator<G, E, SequenceClock>
where
    G: Geocoder,
    E: SearchEvents,
{
    /// Construct a coordinator issuing sequential tick times.
    pub fn new(geocoder: G, events: E, options: SearchOptions) -> Self {
        Self::with_clock(geocoder, events, options, SequenceClock::default())
    }
}

impl<G, E, C> SearchCoordinator<G, E, C>
where
    G: Geocoder,
    E: SearchEvents,
    C: IssueClock,
{
    /// Construct a coordinator with an explicit issue-time source.
    pub fn with_clock(geocoder: G, events: E, options: SearchOptions, clock: C) -> Self {
        Self {
            geocoder,
            events,
            clock,
            options,
            state: RefCell::new(PanelState::default()),
        }
    }

    /// Handle one input event end to end.
    ///
    /// Empty text clears the panel synchronously and returns `None` without a
    /// network call. Otherwise one query is issued and its response is fed
    /// through [`Self::handle_response`] when it arrives.
    pub async fn handle_input(&self, text: &str) -> Option<ResponseOutcome> {
        let pending = self.begin_search(text)?;
        let outcome = self.geocoder.search(&pending.query).await;
        Some(self.handle_response(pending.issued_at, outcome))
    }

    /// Register an input event issued at the clock's current time.
    ///
    /// Returns the request to send, or `None` when `text` is empty and the
    /// panel was cleared instead.
    pub fn begin_search(&self, text: &str) -> Option<PendingSearch> {
        let issued_at = self.clock.now();
        self.begin_search_at(text, issued_at)
    }

    /// Register an input event issued at `issued_at`.
    ///
    /// Issue times that do not advance past the latest issued request are
    /// bumped so the newest request stays uniquely authoritative.
    pub fn begin_search_at(&self, text: &str, issued_at: IssueTime) -> Option<PendingSearch> {
        let mut state = self.state.borrow_mut();
        if text.is_empty() {
            state.clear();
            return None;
        }
        let issued_at = state.issue(issued_at);
        state.loading = true;
        state.visible = true;
        Some(PendingSearch {
            issued_at,
            query: self.options.query(text),
        })
    }

    /// Apply the response to the request issued at `issued_at`.
    pub fn handle_response(
        &self,
        issued_at: IssueTime,
        outcome: Result<Vec<SearchResult>, ServiceCallError>,
    ) -> ResponseOutcome {
        match outcome {
            Ok(results) => self.accept_results(issued_at, results),
            Err(error) => self.report_failure(issued_at, &error),
        }
    }

    fn accept_results(&self, issued_at: IssueTime, results: Vec<SearchResult>) -> ResponseOutcome {
        let mut state = self.state.borrow_mut();
        if !state.accepts(issued_at) {
            debug!(
                "discarding stale search response {issued_at:?}; {:?} already accepted",
                state.last_accepted
            );
            return ResponseOutcome::Stale;
        }
        state.last_accepted = Some(issued_at);
        if !state.visible {
            debug!("search response {issued_at:?} recorded while the panel is hidden");
            return ResponseOutcome::Recorded;
        }
        if state.predates_session(issued_at) {
            debug!("search response {issued_at:?} recorded; it predates the current panel");
            return ResponseOutcome::Recorded;
        }

        debug!("accepting {} search results for {issued_at:?}", results.len());
        state.focus = if results.is_empty() { None } else { Some(0) };
        state.results = results;
        state.loading = false;
        let published = state.results.clone();
        drop(state);

        if !published.is_empty() {
            self.events.on_suggest(&published);
        }
        ResponseOutcome::Applied
    }

    fn report_failure(&self, issued_at: IssueTime, error: &ServiceCallError) -> ResponseOutcome {
        let mut state = self.state.borrow_mut();
        if state.latest_issued != Some(issued_at) || !state.accepts(issued_at) {
            debug!("discarding failed search {issued_at:?} superseded by a newer request");
            return ResponseOutcome::Stale;
        }
        state.loading = false;
        drop(state);

        warn!("search request {issued_at:?} failed: {error}");
        self.events.on_search_error(error);
        ResponseOutcome::Failed
    }

    /// Move the focus by `delta`, clamped to the result list.
    ///
    /// Ignored while loading or when there are no results. Returns the focus
    /// after the move.
    pub fn navigate(&self, delta: isize) -> Option<usize> {
        let mut state = self.state.borrow_mut();
        if state.loading {
            return state.focus;
        }
        let last = state.results.len().checked_sub(1)?;
        let current = state.focus.unwrap_or(0);
        let target = current.saturating_add_signed(delta).min(last);
        state.focus = Some(target);
        state.focus
    }

    /// Commit `results[index]`, or the focused result when `index` is `None`.
    ///
    /// Closes the panel and fires `on_select`. Does nothing when no valid
    /// result is addressed.
    pub fn select(&self, index: Option<usize>) -> Option<SearchResult> {
        let chosen = {
            let state = self.state.borrow();
            let position = index.or(state.focus)?;
            state.results.get(position).cloned()?
        };
        self.set_visible(false);
        self.events.on_select(&chosen);
        Some(chosen)
    }

    /// Pointer selection of the result at `index`.
    pub fn click(&self, index: usize) -> Option<SearchResult> {
        self.select(Some(index))
    }

    /// Keyboard handling for the panel.
    ///
    /// Only `Enter` can produce a selection.
    pub fn handle_key(&self, key: Key) -> Option<SearchResult> {
        match key {
            Key::Up => {
                self.navigate(-1);
                None
            }
            Key::Down => {
                self.navigate(1);
                None
            }
            Key::Enter => self.select(None),
            Key::Escape => {
                self.close();
                None
            }
        }
    }

    /// Show the panel with a cleared result list.
    pub fn open(&self) {
        self.set_visible(true);
    }

    /// Hide the panel and clear its results.
    ///
    /// Requests still in flight keep advancing the acceptance bookkeeping
    /// when they complete but never publish results, even if the panel has
    /// been reopened by then.
    pub fn close(&self) {
        self.set_visible(false);
    }

    /// Flip panel visibility.
    pub fn toggle(&self) {
        let visible = self.state.borrow().visible;
        self.set_visible(!visible);
    }

    fn set_visible(&self, visible: bool) {
        let mut state = self.state.borrow_mut();
        state.clear();
        state.visible = visible;
        state.session_start = state.latest_issued;
    }

    /// Current phase.
    pub fn phase(&self) -> SearchPhase {
        let state = self.state.borrow();
        if state.loading {
            SearchPhase::Loading
        } else if state.results.is_empty() {
            SearchPhase::Idle
        } else {
            SearchPhase::Populated
        }
    }

    /// Visible results.
    pub fn results(&self) -> Vec<SearchResult> {
        self.state.borrow().results.clone()
    }

    /// Focused position, if any.
    pub fn focus(&self) -> Option<usize> {
        self.state.borrow().focus
    }

    /// Focused result, if any.
    pub fn focused(&self) -> Option<SearchResult> {
        let state = self.state.borrow();
        state.focus.and_then(|i| state.results.get(i).cloned())
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Whether the panel is shown.
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// Issue time of the most recently accepted response.
    pub fn last_accepted(&self) -> Option<IssueTime> {
        self.state.borrow().last_accepted
    }

    /// Static configuration.
    pub const fn options(&self) -> &SearchOptions {
        &self.options
    }
}
