use tracing::debug;

use crate::{
    model::WeatherViewModel,
    provider::{FetchError, Rejection, WeatherProvider},
    session::FetchTicket,
};

/// Typed result of one lookup.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(WeatherViewModel),
    /// The provider answered with a non-success status code.
    Rejected(Rejection),
    /// Transport, decode or shape failure.
    Failed(FetchError),
}

impl From<Result<WeatherViewModel, FetchError>> for FetchOutcome {
    fn from(result: Result<WeatherViewModel, FetchError>) -> Self {
        match result {
            Ok(vm) => FetchOutcome::Success(vm),
            Err(FetchError::Rejected(rejection)) => FetchOutcome::Rejected(rejection),
            Err(err) => FetchOutcome::Failed(err),
        }
    }
}

/// A lookup result tagged with the ticket that asked for it.
#[derive(Debug)]
pub struct FetchResponse {
    pub generation: u64,
    pub city: String,
    pub outcome: FetchOutcome,
}

/// Run the lookup a ticket describes.
///
/// Never fails: every failure is folded into [`FetchOutcome`] so the caller
/// can hand the response straight to [`crate::WeatherSession::apply`].
pub async fn fetch_weather(provider: &dyn WeatherProvider, ticket: FetchTicket) -> FetchResponse {
    let FetchTicket { generation, city } = ticket;
    debug!(generation, %city, "fetching weather");

    let outcome = provider.current_weather(&city).await.into();

    FetchResponse {
        generation,
        city,
        outcome,
    }
}
