use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Condition family of an icon, matching the OpenWeather icon sheet numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    ClearSky,
    FewClouds,
    ScatteredClouds,
    BrokenClouds,
    ShowerRain,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
}

impl IconKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKind::ClearSky => "01",
            IconKind::FewClouds => "02",
            IconKind::ScatteredClouds => "03",
            IconKind::BrokenClouds => "04",
            IconKind::ShowerRain => "09",
            IconKind::Rain => "10",
            IconKind::Thunderstorm => "11",
            IconKind::Snow => "13",
            IconKind::Mist => "50",
        }
    }

    pub const fn all() -> &'static [IconKind] {
        &[
            IconKind::ClearSky,
            IconKind::FewClouds,
            IconKind::ScatteredClouds,
            IconKind::BrokenClouds,
            IconKind::ShowerRain,
            IconKind::Rain,
            IconKind::Thunderstorm,
            IconKind::Snow,
            IconKind::Mist,
        ]
    }
}

/// Icon name from the closed set `01d`..`50n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Icon {
    kind: IconKind,
    daytime: bool,
}

impl Icon {
    pub const fn new(kind: IconKind, daytime: bool) -> Self {
        Self { kind, daytime }
    }

    pub fn kind(&self) -> IconKind {
        self.kind
    }

    pub fn is_daytime(&self) -> bool {
        self.daytime
    }

    /// Hosted image for this icon.
    pub fn image_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{self}@2x.png")
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.daytime { 'd' } else { 'n' };
        write!(f, "{}{}", self.kind.as_str(), suffix)
    }
}

impl FromStr for Icon {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || PayloadError::UnknownIcon(s.to_string());

        if s.len() != 3 || !s.is_ascii() {
            return Err(unknown());
        }
        let (code, suffix) = s.split_at(2);
        let daytime = match suffix {
            "d" => true,
            "n" => false,
            _ => return Err(unknown()),
        };
        let kind = IconKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == code)
            .ok_or_else(unknown)?;

        Ok(Icon { kind, daytime })
    }
}

impl TryFrom<String> for Icon {
    type Error = PayloadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Icon> for String {
    fn from(icon: Icon) -> Self {
        icon.to_string()
    }
}

/// A wall-clock time already formatted for display in the configured timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalTime(String);

impl LocalTime {
    pub fn new(display: impl Into<String>) -> Self {
        Self(display.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("weather description is empty")]
    EmptyDescription,
    #[error("humidity {0}% is outside 0..=100")]
    HumidityOutOfRange(i32),
    #[error("{0} time is empty")]
    EmptyLocalTime(&'static str),
    #[error("unknown icon '{0}'")]
    UnknownIcon(String),
}

/// Everything one update cycle writes into the README.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherUpdatePayload {
    description: String,
    temperature_c: i32,
    sunrise_local: LocalTime,
    sunset_local: LocalTime,
    humidity_pct: i32,
    icon: Icon,
}

impl WeatherUpdatePayload {
    /// Builds a payload without checking it; call [`Self::validate`] before use.
    pub fn new(
        description: impl Into<String>,
        temperature_c: i32,
        sunrise_local: LocalTime,
        sunset_local: LocalTime,
        humidity_pct: i32,
        icon: Icon,
    ) -> Self {
        Self {
            description: description.into(),
            temperature_c,
            sunrise_local,
            sunset_local,
            humidity_pct,
            icon,
        }
    }

    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.description.trim().is_empty() {
            return Err(PayloadError::EmptyDescription);
        }
        if !(0..=100).contains(&self.humidity_pct) {
            return Err(PayloadError::HumidityOutOfRange(self.humidity_pct));
        }
        if self.sunrise_local.as_str().trim().is_empty() {
            return Err(PayloadError::EmptyLocalTime("sunrise"));
        }
        if self.sunset_local.as_str().trim().is_empty() {
            return Err(PayloadError::EmptyLocalTime("sunset"));
        }
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn temperature_c(&self) -> i32 {
        self.temperature_c
    }

    pub fn sunrise_local(&self) -> &LocalTime {
        &self.sunrise_local
    }

    pub fn sunset_local(&self) -> &LocalTime {
        &self.sunset_local
    }

    pub fn humidity_pct(&self) -> i32 {
        self.humidity_pct
    }

    pub fn icon(&self) -> Icon {
        self.icon
    }

    pub fn summary(&self) -> String {
        format!(
            "{}, {}°C, humidity {}%, sunrise {}, sunset {}",
            self.description,
            self.temperature_c,
            self.humidity_pct,
            self.sunrise_local,
            self.sunset_local
        )
    }
}
