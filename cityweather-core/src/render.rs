//! Pure projection of session state onto what a front-end draws.

use std::fmt;

use crate::{icon::Asset, model::WeatherViewModel, session::ViewState};

pub const TITLE: &str = "Weather App";
pub const PLACEHOLDER: &str = "Enter city name";
pub const PROMPT: &str = "Enter a city to view weather data";

/// Display strings for one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub location: String,
    pub icon: Asset,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
}

impl From<&WeatherViewModel> for WeatherCard {
    fn from(vm: &WeatherViewModel) -> Self {
        Self {
            location: vm.location.clone(),
            icon: vm.icon,
            temperature: format!("{}°C", vm.temperature_celsius),
            humidity: format!("{}%", vm.humidity_percent),
            wind: format!("{} m/s", vm.wind_speed_mps),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Card(WeatherCard),
    Prompt(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub title: &'static str,
    /// The city text exactly as typed.
    pub input: String,
    pub body: Body,
}

impl Screen {
    pub fn card(&self) -> Option<&WeatherCard> {
        match &self.body {
            Body::Card(card) => Some(card),
            Body::Prompt(_) => None,
        }
    }

    pub fn prompt(&self) -> Option<&'static str> {
        match self.body {
            Body::Prompt(text) => Some(text),
            Body::Card(_) => None,
        }
    }

    /// Placeholder to show in place of an empty input.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.input.is_empty().then_some(PLACEHOLDER)
    }
}

pub fn render(city: &str, view: &ViewState) -> Screen {
    let body = match view.weather() {
        Some(vm) => Body::Card(WeatherCard::from(vm)),
        None => Body::Prompt(PROMPT),
    };

    Screen {
        title: TITLE,
        input: city.to_string(),
        body,
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Body::Card(card) => {
                writeln!(f, "{}", card.location)?;
                writeln!(f, "{}  {}", card.icon.glyph(), card.temperature)?;
                writeln!(f, "{} Humidity  {}", Asset::Humidity.glyph(), card.humidity)?;
                write!(f, "{} Wind      {}", Asset::Wind.glyph(), card.wind)
            }
            Body::Prompt(text) => write!(f, "{} {}", Asset::Search.glyph(), text),
        }
    }
}
