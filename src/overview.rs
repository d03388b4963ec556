//! Overview controller: fetches the Mars listing and publishes observable
//! state for the UI layer.
//!
//! All fetches share one cancellation scope created with the controller.
//! Completions publish through a gate shared with [`PropertyFeedController::dispose`],
//! so once `dispose` returns no fetch can touch `status` or `properties`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::mars::{MarsApiError, PropertySource};
use crate::models::{FetchStatus, MarsProperty, PropertyFilter};
use crate::observable::ObservableState;

/// Opt-in deviations from the plain fetch-and-publish flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Drop completions of fetches superseded by a newer `update_filter`.
    /// Off means the last fetch to complete wins.
    pub discard_superseded: bool,
    /// Publish `Loading` when a fetch starts and `Done` when it succeeds
    pub track_progress: bool,
}

/// What a settled fetch left behind, as a host should render it
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Listing(Vec<MarsProperty>),
    /// The fetch succeeded without results; the published list was kept
    Empty,
    Failed,
}

/// State shared between the controller and its fetch tasks
struct FeedState {
    status: ObservableState<Option<FetchStatus>>,
    properties: ObservableState<Vec<MarsProperty>>,
    navigate_to_selected: ObservableState<Option<MarsProperty>>,
    in_flight: ObservableState<usize>,
    generation: AtomicU64,
    publish_gate: Mutex<()>,
    options: ControllerOptions,
}

impl FeedState {
    fn gate(&self) -> MutexGuard<'_, ()> {
        self.publish_gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(
        &self,
        token: &CancellationToken,
        generation: u64,
        filter: PropertyFilter,
        result: Result<Vec<MarsProperty>, MarsApiError>,
    ) {
        let _gate = self.gate();

        if token.is_cancelled() {
            debug!("Fetch #{} ({}) completed after dispose; dropping result", generation, filter);
            return;
        }

        if self.options.discard_superseded && generation != self.generation.load(Ordering::SeqCst) {
            debug!("Fetch #{} ({}) was superseded; dropping result", generation, filter);
            return;
        }

        match result {
            Ok(properties) if properties.is_empty() => {
                // empty listings leave the current list alone
                debug!("Fetch #{} ({}) returned no properties", generation, filter);
                if self.options.track_progress {
                    self.status.set(Some(FetchStatus::Done));
                }
            }
            Ok(properties) => {
                info!("Fetched {} properties for filter {}", properties.len(), filter);
                self.properties.set(properties);
                if self.options.track_progress {
                    self.status.set(Some(FetchStatus::Done));
                }
            }
            Err(e) => {
                warn!("Fetch #{} ({}) failed: {}", generation, filter, e);
                self.status.set(Some(FetchStatus::Error));
                self.properties.set(Vec::new());
            }
        }
    }
}

/// Decrements the in-flight counter when a fetch task ends, however it ends
struct InFlight(Arc<FeedState>);

impl InFlight {
    fn enter(state: Arc<FeedState>) -> Self {
        state.in_flight.update(|n| *n += 1);
        Self(state)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.update(|n| *n = n.saturating_sub(1));
    }
}

/// Presentation-layer controller for the property overview screen.
///
/// Created once per UI context; must be constructed inside a tokio runtime
/// because it starts the initial fetch immediately.
pub struct PropertyFeedController {
    state: Arc<FeedState>,
    source: Arc<dyn PropertySource>,
    cancel: CancellationToken,
}

impl PropertyFeedController {
    /// Create the controller and start fetching every property
    pub fn new(source: Arc<dyn PropertySource>, options: ControllerOptions) -> Self {
        let state = Arc::new(FeedState {
            status: ObservableState::new(None),
            properties: ObservableState::new(Vec::new()),
            navigate_to_selected: ObservableState::new(None),
            in_flight: ObservableState::new(0),
            generation: AtomicU64::new(0),
            publish_gate: Mutex::new(()),
            options,
        });

        info!("Starting property feed from {}", source.source_name());

        let controller = Self {
            state,
            source,
            cancel: CancellationToken::new(),
        };
        controller.fetch(PropertyFilter::ShowAll);
        controller
    }

    /// Status of the most recent fetch; `None` until something is published
    pub fn status(&self) -> &ObservableState<Option<FetchStatus>> {
        &self.state.status
    }

    pub fn properties(&self) -> &ObservableState<Vec<MarsProperty>> {
        &self.state.properties
    }

    /// Property the UI should navigate to, if any
    pub fn navigate_to_selected(&self) -> &ObservableState<Option<MarsProperty>> {
        &self.state.navigate_to_selected
    }

    /// Number of fetches that have not finished yet
    pub fn in_flight(&self) -> &ObservableState<usize> {
        &self.state.in_flight
    }

    /// Re-query the listing with a new filter. Earlier fetches keep running.
    pub fn update_filter(&self, filter: PropertyFilter) {
        self.fetch(filter);
    }

    pub fn request_navigation_to(&self, property: MarsProperty) {
        debug!("Navigation requested to property {}", property.id);
        self.state.navigate_to_selected.set(Some(property));
    }

    /// Clear the pending navigation so it does not fire again
    pub fn acknowledge_navigation_complete(&self) {
        self.state.navigate_to_selected.set(None);
    }

    /// Wait until no fetch is in flight
    pub async fn settled(&self) {
        let mut in_flight = self.state.in_flight.subscribe();
        let _ = in_flight.wait_for(|n| *n == 0).await;
    }

    /// Fetch `filter`, wait for every fetch to settle and report what this
    /// fetch published. Judged by which cells changed, since `Error` stays
    /// in the status cell after a later success.
    pub async fn refresh(&self, filter: PropertyFilter) -> FetchOutcome {
        let mut status = self.state.status.subscribe();
        let mut properties = self.state.properties.subscribe();

        self.update_filter(filter);
        self.settled().await;

        if status.has_changed().unwrap_or(false)
            && *status.borrow_and_update() == Some(FetchStatus::Error)
        {
            return FetchOutcome::Failed;
        }
        if properties.has_changed().unwrap_or(false) {
            return FetchOutcome::Listing(properties.borrow_and_update().clone());
        }
        FetchOutcome::Empty
    }

    /// Outcome of the initial fetch once it has settled. Only meaningful
    /// while that is the sole fetch the controller has run.
    pub fn initial_outcome(&self) -> FetchOutcome {
        if self.state.status.get() == Some(FetchStatus::Error) {
            return FetchOutcome::Failed;
        }
        let properties = self.state.properties.get();
        if properties.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Listing(properties)
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel all outstanding fetches. Calling it again is a no-op.
    pub fn dispose(&self) {
        let _gate = self.state.gate();
        if self.cancel.is_cancelled() {
            return;
        }
        info!(
            "Disposing property feed with {} fetch(es) in flight",
            self.state.in_flight.get()
        );
        self.cancel.cancel();
    }

    fn fetch(&self, filter: PropertyFilter) {
        // held so a concurrent dispose cannot slip in before the Loading publish
        let _gate = self.state.gate();
        if self.cancel.is_cancelled() {
            debug!("Ignoring fetch for {} on a disposed controller", filter);
            return;
        }

        let generation = self.state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Starting fetch #{} for filter {}", generation, filter);

        if self.state.options.track_progress {
            self.state.status.set(Some(FetchStatus::Loading));
        }

        let guard = InFlight::enter(self.state.clone());
        tokio::spawn(run_fetch(
            guard,
            self.source.clone(),
            filter,
            generation,
            self.cancel.child_token(),
        ));
    }
}

impl Drop for PropertyFeedController {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn run_fetch(
    guard: InFlight,
    source: Arc<dyn PropertySource>,
    filter: PropertyFilter,
    generation: u64,
    token: CancellationToken,
) {
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("Fetch #{} ({}) cancelled", generation, filter);
            return;
        }
        result = source.fetch_properties(filter) => result,
    };

    guard.0.publish(&token, generation, filter, result);
}
