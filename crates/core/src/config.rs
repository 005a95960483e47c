use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use tramline_transit::{DayType, DayTypeCalendar, StationNormalizer, normalize::DEFAULT_ALIASES};

use crate::error::ConfigurationError;

/// Stations whose name is highlighted and whose stopped vehicles are stacked
pub const DEFAULT_MAJOR_STATIONS: &[&str] = &[
    "高知駅前",
    "はりまや橋",
    "県庁前",
    "高知城前",
    "堀詰",
    "宝永町",
    "知寄町",
    "知寄町三丁目",
    "後免町",
    "後免東町",
    "後免中町",
    "後免西町",
    "領石通",
    "北浦",
    "船戸",
    "篠原",
    "住吉通",
    "東新木",
    "田辺島通",
    "鹿児",
    "舟戸",
    "デンテツターミナルビル前",
    "高須",
    "県立美術館通",
    "葛島橋東詰",
    "西高須",
    "一条橋",
    "梅の辻",
    "枡形",
    "上町一丁目",
    "上町二丁目",
    "上町四丁目",
    "旭町一丁目",
    "旭町三丁目",
    "鏡川橋",
    "蛍橋",
    "旭駅前通",
    "桟橋通五丁目",
    "桟橋通四丁目",
    "桟橋通三丁目",
    "桟橋通二丁目",
    "桟橋通一丁目",
];

/// Where each day type's document is fetched from
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DocumentSources {
    pub weekday: String,
    pub holiday: String,
}

impl DocumentSources {
    pub fn location(&self, day_type: DayType) -> &str {
        match day_type {
            DayType::Weekday => &self.weekday,
            DayType::Holiday => &self.holiday,
        }
    }
}

impl Default for DocumentSources {
    fn default() -> Self {
        Self {
            weekday: "./out/tosaden_weekday.json".into(),
            holiday: "./out/tosaden_holiday.json".into(),
        }
    }
}

/// Pixel geometry of the rendered lanes
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal inset of both axis ends
    pub margin: f64,
    /// Axis line height as a fraction of the viewport height
    pub axis_height_ratio: f64,
    /// Distance from the axis line up to the vehicle row
    pub row_offset: f64,
    /// Half the distance between the two branch axes
    pub branch_lane_gap: f64,
    pub vehicle_radius: f64,
    /// Added to the drawn radius when recording hit regions
    pub hit_padding: f64,
    /// Vertical distance between stacked vehicles at a major station
    pub stack_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 80.0,
            axis_height_ratio: 0.58,
            row_offset: 40.0,
            branch_lane_gap: 52.0,
            vehicle_radius: 12.0,
            hit_padding: 10.0,
            stack_gap: 28.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sources: DocumentSources,

    /// Force a day type instead of deriving it from today's date
    pub day_type: Option<DayType>,
    /// Extra dates that run the holiday timetable
    pub public_holidays: Vec<NaiveDate>,

    pub base_speed: f64,
    pub speed_multiplier: f64,
    pub start_playing: bool,
    pub heartbeat_interval_ms: u64,

    pub major_stations: Vec<String>,
    pub station_aliases: BTreeMap<String, String>,

    pub layout: LayoutConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sources: DocumentSources::default(),
            day_type: None,
            public_holidays: Vec::new(),
            base_speed: 1.0,
            speed_multiplier: 0.5,
            start_playing: true,
            heartbeat_interval_ms: 1000,
            major_stations: DEFAULT_MAJOR_STATIONS.iter().map(|s| s.to_string()).collect(),
            station_aliases: DEFAULT_ALIASES
                .iter()
                .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
                .collect(),
            layout: LayoutConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.speed_multiplier.is_finite() && self.speed_multiplier > 0.0) {
            return Err(ConfigurationError::InvalidSpeed(self.speed_multiplier));
        }

        let positive = [
            ("base_speed", self.base_speed),
            ("heartbeat_interval_ms", self.heartbeat_interval_ms as f64),
            ("layout.vehicle_radius", self.layout.vehicle_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError::NonPositive { field, value });
            }
        }

        let non_negative = [
            ("layout.margin", self.layout.margin),
            ("layout.hit_padding", self.layout.hit_padding),
            ("layout.stack_gap", self.layout.stack_gap),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigurationError::NonPositive { field, value });
            }
        }

        Ok(())
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn normalizer(&self) -> StationNormalizer {
        StationNormalizer::new(self.station_aliases.iter())
    }

    pub fn calendar(&self) -> DayTypeCalendar {
        DayTypeCalendar::new(self.public_holidays.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.speed_multiplier, 0.5);
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(1));
        assert_eq!(config.sources.location(DayType::Holiday), "./out/tosaden_holiday.json");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{
                "day_type": "holiday",
                "speed_multiplier": 4,
                "public_holidays": ["2026-11-03"],
                "layout": { "stack_gap": 30 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.day_type, Some(DayType::Holiday));
        assert_eq!(config.speed_multiplier, 4.0);
        assert_eq!(config.layout.stack_gap, 30.0);
        assert_eq!(config.layout.margin, 80.0);
        assert_eq!(config.public_holidays.len(), 1);
        assert_eq!(config.major_stations.len(), DEFAULT_MAJOR_STATIONS.len());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            EngineConfig::from_json(r#"{ "speed_multiplier": 0 }"#).unwrap_err(),
            ConfigurationError::InvalidSpeed(0.0)
        );
        assert!(matches!(
            EngineConfig::from_json(r#"{ "heartbeat_interval_ms": 0 }"#),
            Err(ConfigurationError::NonPositive { field: "heartbeat_interval_ms", .. })
        ));
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(ConfigurationError::Malformed(_))
        ));
    }

    #[test]
    fn test_normalizer_uses_aliases() {
        let config = EngineConfig::default();
        assert_eq!(
            config.normalizer().normalize_str("電鉄ターミナルビル前").as_str(),
            "デンテツターミナルビル前"
        );
    }
}
