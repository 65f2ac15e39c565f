//! Zoom factor with clamped stepping
//!
//! The factor scales the page container as a whole (`scale(zoom)` with a
//! top-left origin). 1.0 renders one point as one pixel.

use crate::config::FitWidthClamp;

/// Increment applied by one zoom-in or zoom-out step
pub const ZOOM_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl ZoomLimits {
    pub fn clamp(&self, factor: f64) -> f64 {
        factor.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    factor: f64,
    limits: ZoomLimits,
}

impl Zoom {
    /// Start at `initial`, clamped into `limits`.
    pub fn new(initial: f64, limits: ZoomLimits) -> Self {
        Self { factor: limits.clamp(initial), limits }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.factor = (self.factor + ZOOM_STEP).min(self.limits.max);
        self.factor
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.factor = (self.factor - ZOOM_STEP).max(self.limits.min);
        self.factor
    }

    /// Zoom so the first page fills the container width.
    ///
    /// Returns `false` and leaves the factor untouched when either width is
    /// not a positive finite number.
    pub fn fit_to_width(
        &mut self,
        container_width_px: f64,
        page_width_pt: f64,
        clamp: FitWidthClamp,
    ) -> bool {
        let Some(fitted) = fit_width_zoom(container_width_px, page_width_pt) else {
            return false;
        };

        self.factor = match clamp {
            FitWidthClamp::UpperOnly => fitted.min(self.limits.max),
            FitWidthClamp::Symmetric => self.limits.clamp(fitted),
        };
        true
    }

    /// Rounded percentage, e.g. `120` for a factor of 1.2.
    pub fn percent(&self) -> i64 {
        (self.factor * 100.0).round() as i64
    }

    pub fn label(&self) -> String {
        format!("{}%", self.percent())
    }
}

pub fn fit_width_zoom(container_width_px: f64, page_width_pt: f64) -> Option<f64> {
    let valid = |v: f64| v.is_finite() && v > 0.0;

    if !valid(container_width_px) || !valid(page_width_pt) {
        return None;
    }

    Some(container_width_px / page_width_pt)
}
