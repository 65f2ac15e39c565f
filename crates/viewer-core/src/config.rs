use crate::zoom::ZoomLimits;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inline style declarations (`property -> value`) forwarded to the host.
pub type Style = BTreeMap<String, String>;

/// How "fit to width" clamps the computed zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitWidthClamp {
    /// Clamp to `max_zoom` only; narrow containers may go below `min_zoom`.
    #[default]
    UpperOnly,
    /// Clamp to `[min_zoom, max_zoom]`.
    Symmetric,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive finite number (got {value})")]
    InvalidZoom { name: &'static str, value: f64 },
    #[error("min_zoom {min} is greater than max_zoom {max}")]
    InvertedZoomRange { min: f64, max: f64 },
}

/// Options recognized by both viewers. Every field is independently defaultable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub container_style: Style,
    pub header_style: Style,
    pub main_style: Style,
    pub fit_width_clamp: FitWidthClamp,
    /// Whether page navigation drives the loading/error flags like the initial load does.
    pub track_navigation_loading: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 1.0,
            min_zoom: 0.5,
            max_zoom: 3.0,
            container_style: Style::new(),
            header_style: Style::new(),
            main_style: Style::new(),
            fit_width_clamp: FitWidthClamp::UpperOnly,
            track_navigation_loading: false,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<ZoomLimits, ConfigError> {
        for (name, value) in [
            ("initial_zoom", self.initial_zoom),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidZoom { name, value });
            }
        }

        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvertedZoomRange { min: self.min_zoom, max: self.max_zoom });
        }

        Ok(ZoomLimits { min: self.min_zoom, max: self.max_zoom })
    }
}
