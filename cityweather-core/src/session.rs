//! Single-owner state container for one lookup session.
//!
//! [`WeatherSession`] holds the city text and the latest [`ViewState`]. Every
//! mutation that should trigger a lookup hands back a [`FetchTicket`]; the
//! owner runs the fetch wherever it likes and feeds the tagged response back
//! through [`WeatherSession::apply`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::{
    fetcher::{FetchOutcome, FetchResponse},
    model::WeatherViewModel,
    provider::{FetchError, Rejection},
};

/// What the view currently has to show.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// Never searched, or the last lookup was rejected.
    #[default]
    Empty,
    Populated(WeatherViewModel),
}

impl ViewState {
    pub fn weather(&self) -> Option<&WeatherViewModel> {
        match self {
            ViewState::Empty => None,
            ViewState::Populated(vm) => Some(vm),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ViewState::Empty)
    }
}

/// How responses that arrive out of order are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderingPolicy {
    /// Only the response to the most recently issued ticket may change state.
    #[default]
    LatestRequest,
    /// Every response is applied as it arrives; the last arrival wins.
    LastArrival,
}

impl OrderingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingPolicy::LatestRequest => "latest-request",
            OrderingPolicy::LastArrival => "last-arrival",
        }
    }

    pub const fn all() -> &'static [OrderingPolicy] {
        &[OrderingPolicy::LatestRequest, OrderingPolicy::LastArrival]
    }
}

impl fmt::Display for OrderingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to look up `city`, tagged with the generation it was issued at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub city: String,
}

/// What [`WeatherSession::apply`] did with a response.
#[derive(Debug)]
pub enum Transition {
    /// New data replaced whatever was shown.
    Populated,
    /// The provider rejected the lookup; the view is now empty.
    Cleared(Rejection),
    /// The lookup failed in transit or could not be parsed; the view is unchanged.
    Retained(FetchError),
    /// A newer ticket was issued; the response was dropped unseen.
    Discarded { generation: u64, latest: u64 },
}

#[derive(Debug, Default)]
pub struct WeatherSession {
    city: String,
    view: ViewState,
    issued: u64,
    ordering: OrderingPolicy,
}

impl WeatherSession {
    pub fn new(ordering: OrderingPolicy) -> Self {
        Self {
            ordering,
            ..Self::default()
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    /// Generation of the most recently issued ticket; 0 before any.
    pub fn latest_generation(&self) -> u64 {
        self.issued
    }

    /// Replace the city text. Every change triggers a lookup, even to "".
    pub fn set_city(&mut self, value: impl Into<String>) -> FetchTicket {
        self.city = value.into();
        self.issue()
    }

    /// Manual search: only when the trimmed city is non-empty, and then with
    /// the city exactly as typed.
    pub fn submit_search(&mut self) -> Option<FetchTicket> {
        if self.city.trim().is_empty() {
            return None;
        }
        Some(self.issue())
    }

    fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        debug!(generation = self.issued, city = %self.city, "issuing lookup");
        FetchTicket {
            generation: self.issued,
            city: self.city.clone(),
        }
    }

    /// Fold a lookup response into the view state.
    pub fn apply(&mut self, response: FetchResponse) -> Transition {
        let FetchResponse { generation, city, outcome } = response;

        if self.ordering == OrderingPolicy::LatestRequest && generation != self.issued {
            debug!(generation, latest = self.issued, %city, "discarding stale lookup");
            return Transition::Discarded {
                generation,
                latest: self.issued,
            };
        }

        match outcome {
            FetchOutcome::Success(vm) => {
                info!(generation, location = %vm.location, "weather updated");
                self.view = ViewState::Populated(vm);
                Transition::Populated
            }
            FetchOutcome::Rejected(rejection) => {
                debug!(generation, %city, %rejection, "lookup rejected, clearing view");
                self.view = ViewState::Empty;
                Transition::Cleared(rejection)
            }
            FetchOutcome::Failed(err) => {
                warn!(generation, %city, error = %err, "error fetching weather");
                Transition::Retained(err)
            }
        }
    }
}
