//! Core library for the `cityweather` lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherProvider`] abstraction
//! - Icon resolution for provider condition codes
//! - The [`WeatherSession`] state container and its fetch tickets
//! - A pure render of session state into a [`Screen`]
//!
//! It is used by `cityweather-cli`, but front-ends are free to drive a
//! [`WeatherSession`] on their own event loop.

pub mod config;
pub mod fetcher;
pub mod icon;
pub mod model;
pub mod provider;
pub mod render;
pub mod session;

pub use config::{Config, OpenWeatherConfig, SessionConfig};
pub use fetcher::{FetchOutcome, FetchResponse, fetch_weather};
pub use icon::{Asset, resolve_icon};
pub use model::WeatherViewModel;
pub use provider::{FetchError, Rejection, WeatherProvider};
pub use render::{Screen, render};
pub use session::{FetchTicket, OrderingPolicy, Transition, ViewState, WeatherSession};
