use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::{config::OpenWeatherConfig, icon::resolve_icon, model::WeatherViewModel};

use super::{FetchError, Rejection, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &OpenWeatherConfig, api_key: String) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: config.base_url().to_string(),
            http,
        })
    }

    fn current_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), CURRENT_WEATHER_PATH)
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherViewModel, FetchError> {
        let res = self
            .http
            .get(self.current_url())
            .query(&[
                ("q", city),
                ("units", UNITS),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        // The embedded `cod` decides the outcome, so the HTTP status is only logged.
        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "OpenWeather responded");

        parse_current(&body)
    }
}

/// Only the fields needed to decide success; present on error bodies too.
#[derive(Debug, Deserialize)]
struct OwEnvelope {
    #[serde(default)]
    cod: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

fn is_success_code(cod: Option<&Value>) -> bool {
    // Strictly the number 200; the string "200" is not success.
    matches!(cod, Some(Value::Number(n)) if n.as_f64() == Some(200.0))
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn parse_current(body: &str) -> Result<WeatherViewModel, FetchError> {
    let envelope: OwEnvelope = serde_json::from_str(body)?;

    if !is_success_code(envelope.cod.as_ref()) {
        return Err(FetchError::Rejected(Rejection {
            code: envelope.cod.map(value_to_text),
            message: envelope.message.map(value_to_text),
        }));
    }

    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let condition = parsed
        .weather
        .first()
        .ok_or(FetchError::Malformed("weather[0]"))?;
    // An absent code is just another unknown code.
    let icon = resolve_icon(condition.icon.as_deref().unwrap_or_default());

    Ok(WeatherViewModel::new(
        parsed.name,
        parsed.main.temp,
        parsed.main.humidity,
        parsed.wind.speed,
        icon,
    ))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherViewModel, FetchError> {
        self.fetch_current(city).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::Asset;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london_body() -> Value {
        json!({
            "cod": 200,
            "name": "London",
            "main": { "temp": 15.7, "humidity": 80 },
            "wind": { "speed": 4.1 },
            "weather": [ { "icon": "01d" } ]
        })
    }

    #[test]
    fn parses_success_body() {
        let vm = parse_current(&london_body().to_string()).expect("success body");

        assert_eq!(vm.location, "London");
        assert_eq!(vm.temperature_celsius, 15);
        assert_eq!(vm.humidity_percent, 80);
        assert_eq!(vm.wind_speed_mps, 4.1);
        assert_eq!(vm.icon, Asset::Clear);
    }

    #[test]
    fn floors_temperature() {
        for (temp, expected) in [(21.9, 21), (-0.1, -1)] {
            let mut body = london_body();
            body["main"]["temp"] = json!(temp);
            let vm = parse_current(&body.to_string()).expect("success body");
            assert_eq!(vm.temperature_celsius, expected);
        }
    }

    #[test]
    fn unknown_icon_code_uses_default() {
        let mut body = london_body();
        body["weather"][0]["icon"] = json!("50d");
        let vm = parse_current(&body.to_string()).expect("success body");
        assert_eq!(vm.icon, Asset::Clear);

        body["weather"][0]["icon"] = json!("13n");
        let vm = parse_current(&body.to_string()).expect("success body");
        assert_eq!(vm.icon, Asset::Snow);
    }

    #[test]
    fn string_cod_is_rejected() {
        let err = parse_current(r#"{"cod":"404","message":"city not found"}"#).unwrap_err();
        match err {
            FetchError::Rejected(rejection) => {
                assert_eq!(rejection.code.as_deref(), Some("404"));
                assert_eq!(rejection.message.as_deref(), Some("city not found"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }

        // Even "200" as a string is not the success value.
        let err = parse_current(r#"{"cod":"200"}"#).unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn numeric_error_cod_and_missing_cod_are_rejected() {
        let err = parse_current(r#"{"cod":401,"message":"Invalid API key"}"#).unwrap_err();
        match err {
            FetchError::Rejected(rejection) => assert_eq!(rejection.code.as_deref(), Some("401")),
            other => panic!("expected rejection, got {other:?}"),
        }

        let err = parse_current("{}").unwrap_err();
        match err {
            FetchError::Rejected(rejection) => assert_eq!(rejection.code, None),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn malformed_bodies_are_not_rejections() {
        let err = parse_current("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));

        let err = parse_current(r#"{"cod":200,"name":"London"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));

        let mut body = london_body();
        body["weather"] = json!([]);
        let err = parse_current(&body.to_string()).unwrap_err();
        assert!(matches!(err, FetchError::Malformed("weather[0]")));
    }

    #[test]
    fn condition_without_icon_code_uses_default() {
        for condition in [json!({}), json!({ "icon": null }), json!({ "main": "Mist" })] {
            let mut body = london_body();
            body["weather"] = json!([condition]);

            let vm = parse_current(&body.to_string()).expect("success body");
            assert_eq!(vm.icon, Asset::Clear);
            assert_eq!(vm.location, "London");
        }
    }

    #[tokio::test]
    async fn sends_untrimmed_city_metric_units_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", " London "))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "SECRET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("SECRET".into(), server.uri());
        let vm = provider.current_weather(" London ").await.expect("lookup succeeds");

        assert_eq!(vm.location, "London");
    }

    #[tokio::test]
    async fn http_error_status_still_reads_embedded_cod() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), format!("{}/", server.uri()));
        let err = provider.current_weather("Zzzznotacity").await.unwrap_err();

        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Nothing listens on port 1.
        let provider = OpenWeatherProvider::with_base_url("KEY".into(), "http://127.0.0.1:1");
        let err = provider.current_weather("London").await.unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn from_config_uses_configured_base_url() {
        let config = OpenWeatherConfig {
            api_key: None,
            base_url: Some("http://localhost:9999/".into()),
            request_timeout_secs: Some(5),
        };
        let provider = OpenWeatherProvider::from_config(&config, "KEY".into()).expect("client builds");

        assert_eq!(provider.current_url(), "http://localhost:9999/data/2.5/weather");
        assert_eq!(
            OpenWeatherProvider::new("KEY".into()).current_url(),
            "https://api.openweathermap.org/data/2.5/weather"
        );
    }
}
