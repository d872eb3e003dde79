//! WMO weather interpretation codes as reported by Open-Meteo.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use crate::model::{Icon, IconKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmoCondition {
    pub description: &'static str,
    pub icon: Icon,
}

/// Resolved for codes outside the documented table. Independent of day/night.
pub const UNKNOWN_CONDITION: WmoCondition = WmoCondition {
    description: "Unknown",
    icon: Icon::new(IconKind::ScatteredClouds, true),
};

/// Map a WMO code and the provider's day flag to a description and icon.
pub fn describe(code: i32, is_day: bool) -> WmoCondition {
    let (description, kind) = match code {
        0 => ("Clear Sky", IconKind::ClearSky),
        1 => ("Mainly Clear", IconKind::FewClouds),
        2 => ("Partly Cloudy", IconKind::ScatteredClouds),
        3 => ("Overcast", IconKind::BrokenClouds),
        45 => ("Fog", IconKind::Mist),
        48 => ("Depositing Rime Fog", IconKind::Mist),
        51 => ("Light Drizzle", IconKind::ShowerRain),
        53 => ("Moderate Drizzle", IconKind::ShowerRain),
        55 => ("Dense Drizzle", IconKind::ShowerRain),
        56 => ("Light Freezing Drizzle", IconKind::ShowerRain),
        57 => ("Dense Freezing Drizzle", IconKind::ShowerRain),
        61 => ("Slight Rain", IconKind::Rain),
        63 => ("Moderate Rain", IconKind::Rain),
        65 => ("Heavy Rain", IconKind::Rain),
        66 => ("Light Freezing Rain", IconKind::Rain),
        67 => ("Heavy Freezing Rain", IconKind::Rain),
        71 => ("Slight Snow Fall", IconKind::Snow),
        73 => ("Moderate Snow Fall", IconKind::Snow),
        75 => ("Heavy Snow Fall", IconKind::Snow),
        77 => ("Snow Grains", IconKind::Snow),
        80 => ("Slight Rain Showers", IconKind::ShowerRain),
        81 => ("Moderate Rain Showers", IconKind::ShowerRain),
        82 => ("Violent Rain Showers", IconKind::ShowerRain),
        85 => ("Slight Snow Showers", IconKind::Snow),
        86 => ("Heavy Snow Showers", IconKind::Snow),
        95 => ("Thunderstorm", IconKind::Thunderstorm),
        96 => ("Thunderstorm With Slight Hail", IconKind::Thunderstorm),
        99 => ("Thunderstorm With Heavy Hail", IconKind::Thunderstorm),
        _ => return UNKNOWN_CONDITION,
    };

    WmoCondition {
        description,
        icon: Icon::new(kind, is_day),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_sky_by_day_and_night() {
        let day = describe(0, true);
        assert_eq!(day.description, "Clear Sky");
        assert_eq!(day.icon.to_string(), "01d");

        let night = describe(0, false);
        assert_eq!(night.description, "Clear Sky");
        assert_eq!(night.icon.to_string(), "01n");
    }

    #[test]
    fn cloud_cover_steps() {
        assert_eq!(describe(1, true).icon.to_string(), "02d");
        assert_eq!(describe(2, true).icon.to_string(), "03d");
        assert_eq!(describe(3, false).icon.to_string(), "04n");
    }

    #[test]
    fn precipitation_families() {
        assert_eq!(describe(45, true).icon.kind(), IconKind::Mist);
        assert_eq!(describe(53, true).icon.kind(), IconKind::ShowerRain);
        assert_eq!(describe(63, true).icon.kind(), IconKind::Rain);
        assert_eq!(describe(75, true).icon.kind(), IconKind::Snow);
        assert_eq!(describe(81, true).icon.kind(), IconKind::ShowerRain);
        assert_eq!(describe(86, true).icon.kind(), IconKind::Snow);
        assert_eq!(describe(99, false).icon.to_string(), "11n");
    }

    #[test]
    fn every_documented_code_has_a_description() {
        let documented = [
            0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81,
            82, 85, 86, 95, 96, 99,
        ];
        for code in documented {
            assert_ne!(describe(code, true), UNKNOWN_CONDITION, "code {code}");
        }
    }

    #[test]
    fn unknown_codes_fall_back_to_fixed_default() {
        for code in [-1, 4, 100, 999] {
            assert_eq!(describe(code, true), UNKNOWN_CONDITION);
            assert_eq!(describe(code, false), UNKNOWN_CONDITION);
        }
    }
}
