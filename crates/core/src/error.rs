use tramline_transit::{DayType, TransitError};

/// A schedule document could not be fetched or decoded.
///
/// The previously installed document stays active; the failure is shown in
/// the status area.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}データ読み込み失敗: {reason}", .day_type.badge())]
pub struct LoadFailure {
    pub day_type: DayType,
    pub location: String,
    pub reason: String,
}

impl LoadFailure {
    pub fn new(day_type: DayType, location: impl Into<String>, source: &TransitError) -> Self {
        Self {
            day_type,
            location: location.into(),
            reason: source.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("speed multiplier must be a positive number, got {0}")]
    InvalidSpeed(f64),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("invalid configuration: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Load(#[from] LoadFailure),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
