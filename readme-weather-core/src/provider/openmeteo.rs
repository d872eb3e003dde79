use anyhow::Context;
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;

use crate::{
    config::Config,
    model::{LocalTime, WeatherUpdatePayload},
    wmo,
};

use super::{FetchError, WeatherSource};

const FORECAST_PATH: &str = "/v1/forecast";
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,is_day";
const DAILY_FIELDS: &str = "sunrise,sunset";

/// Open-Meteo client for one fixed location.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
    tz: Tz,
}

impl WeatherClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let tz = config.location.tz()?;
        let http = Client::builder()
            .timeout(config.provider.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.provider.base_url.trim_end_matches('/').to_string(),
            latitude: config.location.latitude,
            longitude: config.location.longitude,
            tz,
        })
    }

    pub async fn fetch(&self) -> Result<WeatherUpdatePayload, FetchError> {
        let started = Instant::now();
        let url = format!("{}{}", self.base_url, FORECAST_PATH);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("timezone", self.tz.name().to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("temperature_unit", "celsius".to_string()),
                ("timeformat", "unixtime".to_string()),
                ("forecast_days", "1".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let payload = parse_forecast(&body, self.tz)?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched weather: {}",
            payload.summary()
        );

        Ok(payload)
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn fetch(&self) -> Result<WeatherUpdatePayload, FetchError> {
        WeatherClient::fetch(self).await
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: i32,
    is_day: u8,
}

#[derive(Debug, Deserialize)]
struct OmCurrentUnits {
    temperature_2m: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    sunrise: Vec<i64>,
    sunset: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    // Required for shape validation only; local times come from the named zone.
    #[allow(dead_code)]
    utc_offset_seconds: i32,
    current: OmCurrent,
    current_units: Option<OmCurrentUnits>,
    daily: OmDaily,
}

/// Validate the raw body and turn it into a payload.
fn parse_forecast(body: &str, tz: Tz) -> Result<WeatherUpdatePayload, FetchError> {
    let parsed: OmResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Schema(e.to_string()))?;

    let sunrise = *parsed
        .daily
        .sunrise
        .first()
        .ok_or_else(|| FetchError::Schema("daily.sunrise is empty".into()))?;
    let sunset = *parsed
        .daily
        .sunset
        .first()
        .ok_or_else(|| FetchError::Schema("daily.sunset is empty".into()))?;

    let unit = parsed
        .current_units
        .and_then(|u| u.temperature_2m)
        .unwrap_or_else(|| "°C".to_string());
    let temperature_c = to_celsius(parsed.current.temperature_2m, &unit).round() as i32;
    let humidity_pct = parsed.current.relative_humidity_2m.round() as i32;

    let condition = wmo::describe(parsed.current.weather_code, parsed.current.is_day != 0);

    Ok(WeatherUpdatePayload::new(
        condition.description,
        temperature_c,
        local_time(sunrise, tz, "sunrise")?,
        local_time(sunset, tz, "sunset")?,
        humidity_pct,
        condition.icon,
    ))
}

fn to_celsius(value: f64, unit: &str) -> f64 {
    if unit.contains('F') {
        (value - 32.0) * 5.0 / 9.0
    } else {
        value
    }
}

fn local_time(epoch: i64, tz: Tz, field: &str) -> Result<LocalTime, FetchError> {
    let utc = DateTime::from_timestamp(epoch, 0)
        .ok_or_else(|| FetchError::Schema(format!("daily.{field} {epoch} is not a valid time")))?;
    Ok(LocalTime::new(
        utc.with_timezone(&tz).format("%H:%M").to_string(),
    ))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BERLIN: Tz = chrono_tz::Europe::Berlin;

    fn berlin_summer() -> serde_json::Value {
        // 2024-06-21 03:43 / 21:33 UTC+2
        json!({
            "latitude": 52.52,
            "longitude": 13.41,
            "utc_offset_seconds": 7200,
            "timezone": "Europe/Berlin",
            "current_units": { "temperature_2m": "°C", "relative_humidity_2m": "%" },
            "current": {
                "time": 1718960400,
                "temperature_2m": 24.6,
                "relative_humidity_2m": 49.5,
                "weather_code": 0,
                "is_day": 1
            },
            "daily": {
                "time": [1718920800],
                "sunrise": [1718934180],
                "sunset": [1718998380]
            }
        })
    }

    #[test]
    fn parses_and_normalizes_fields() {
        let payload = parse_forecast(&berlin_summer().to_string(), BERLIN).unwrap();

        assert_eq!(payload.description(), "Clear Sky");
        assert_eq!(payload.temperature_c(), 25);
        assert_eq!(payload.humidity_pct(), 50);
        assert_eq!(payload.sunrise_local().as_str(), "03:43");
        assert_eq!(payload.sunset_local().as_str(), "21:33");
        assert_eq!(payload.icon().to_string(), "01d");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn night_flag_selects_night_icon() {
        let mut body = berlin_summer();
        body["current"]["is_day"] = json!(0);
        body["current"]["weather_code"] = json!(3);

        let payload = parse_forecast(&body.to_string(), BERLIN).unwrap();
        assert_eq!(payload.description(), "Overcast");
        assert_eq!(payload.icon().to_string(), "04n");
    }

    #[test]
    fn sun_times_follow_the_named_zone_across_dst_change() {
        // 2026-03-29: clocks go forward at 01:00 UTC; the response offset is
        // still the winter one from local midnight.
        let mut body = berlin_summer();
        body["utc_offset_seconds"] = json!(3600);
        body["daily"]["sunrise"] = json!([1774760340]);
        body["daily"]["sunset"] = json!([1774805700]);

        let payload = parse_forecast(&body.to_string(), BERLIN).unwrap();
        assert_eq!(payload.sunrise_local().as_str(), "06:59");
        assert_eq!(payload.sunset_local().as_str(), "19:35");
    }

    #[test]
    fn fahrenheit_units_are_converted() {
        let mut body = berlin_summer();
        body["current_units"]["temperature_2m"] = json!("°F");
        body["current"]["temperature_2m"] = json!(77.0);

        let payload = parse_forecast(&body.to_string(), BERLIN).unwrap();
        assert_eq!(payload.temperature_c(), 25);
    }

    #[test]
    fn missing_units_block_assumes_celsius() {
        let mut body = berlin_summer();
        body.as_object_mut().unwrap().remove("current_units");

        let payload = parse_forecast(&body.to_string(), BERLIN).unwrap();
        assert_eq!(payload.temperature_c(), 25);
    }

    #[test]
    fn missing_current_field_is_schema_error() {
        let mut body = berlin_summer();
        body["current"]
            .as_object_mut()
            .unwrap()
            .remove("weather_code");

        let err = parse_forecast(&body.to_string(), BERLIN).unwrap_err();
        assert!(err.is_schema(), "{err}");
        assert!(err.to_string().contains("weather_code"));
    }

    #[test]
    fn missing_offset_is_schema_error() {
        let mut body = berlin_summer();
        body.as_object_mut().unwrap().remove("utc_offset_seconds");

        assert!(parse_forecast(&body.to_string(), BERLIN).unwrap_err().is_schema());
    }

    #[test]
    fn empty_sun_times_are_schema_errors() {
        let mut body = berlin_summer();
        body["daily"]["sunrise"] = json!([]);
        let err = parse_forecast(&body.to_string(), BERLIN).unwrap_err();
        assert!(err.to_string().contains("daily.sunrise is empty"));

        let mut body = berlin_summer();
        body["daily"]["sunset"] = json!([]);
        let err = parse_forecast(&body.to_string(), BERLIN).unwrap_err();
        assert!(err.to_string().contains("daily.sunset is empty"));
    }

    #[test]
    fn non_json_body_is_schema_error() {
        assert!(parse_forecast("<html>oops</html>", BERLIN).unwrap_err().is_schema());
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(250);
        let short = truncate_body(&long);
        assert_eq!(short.len(), 203);
        assert!(short.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
