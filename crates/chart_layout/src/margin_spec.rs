//! Margin constraints and layout configuration
//!
//! A [`MarginSpec`] bounds the total size of one chart margin, either in
//! pixels or as a percentage of the chart dimension. A [`LayoutConfig`]
//! groups the four specs used by the [`crate::LayoutManager`].

use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};

/// Unit in which a [`MarginSpec`] expresses its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginUnit {
    /// Absolute pixels
    Pixels,
    /// Percentage (0 to 100) of the chart dimension
    Percent,
}

/// Min/max constraint on the size of one chart margin.
///
/// Pixel and percent bounds are never mixed within a single spec. The
/// fields are private and every constructor validates its bounds, so an
/// invalid spec cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MarginSpecDef", into = "MarginSpecDef")]
pub struct MarginSpec {
    unit: MarginUnit,
    min: Option<f64>,
    max: Option<f64>,
}

impl Default for MarginSpec {
    /// At most half of the chart dimension, no minimum.
    fn default() -> Self {
        MarginSpec {
            unit: MarginUnit::Percent,
            min: None,
            max: Some(50.0),
        }
    }
}

impl MarginSpec {
    /// Create a spec bounded in pixels.
    ///
    /// Both bounds must be non-negative and `min` must not exceed `max`.
    /// Equal bounds pin the margin to an exact size.
    pub fn from_pixels(min: Option<f64>, max: Option<f64>) -> Result<Self> {
        for value in [min, max].into_iter().flatten() {
            if !(value >= 0.0) {
                return Err(LayoutError::NegativePixels(value));
            }
        }
        check_ordered(min, max)?;
        Ok(MarginSpec {
            unit: MarginUnit::Pixels,
            min,
            max,
        })
    }

    /// Create a spec that pins the margin to exactly `pixels`.
    pub fn fixed_pixels(pixels: f64) -> Result<Self> {
        Self::from_pixels(Some(pixels), Some(pixels))
    }

    /// Create a spec bounded as a percentage of the chart dimension.
    pub fn from_percent(min: Option<f64>, max: Option<f64>) -> Result<Self> {
        for value in [min, max].into_iter().flatten() {
            if !(0.0..=100.0).contains(&value) {
                return Err(LayoutError::PercentOutOfRange(value));
            }
        }
        check_ordered(min, max)?;
        Ok(MarginSpec {
            unit: MarginUnit::Percent,
            min,
            max,
        })
    }

    pub fn unit(&self) -> MarginUnit {
        self.unit
    }

    /// Configured lower bound, in [`Self::unit`]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Configured upper bound, in [`Self::unit`]
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Minimum margin size in pixels for a chart dimension of `total` pixels.
    ///
    /// Returns 0 when no minimum is configured.
    pub fn min_pixels(&self, total: f64) -> f64 {
        match (self.unit, self.min) {
            (MarginUnit::Pixels, Some(min)) => bounded_by_total(min, total, "minimum"),
            (MarginUnit::Percent, Some(min)) => percent_of(min, total),
            (_, None) => 0.0,
        }
    }

    /// Maximum margin size in pixels for a chart dimension of `total` pixels.
    ///
    /// Returns `total` when no maximum is configured.
    pub fn max_pixels(&self, total: f64) -> f64 {
        match (self.unit, self.max) {
            (MarginUnit::Pixels, Some(max)) => bounded_by_total(max, total, "maximum"),
            (MarginUnit::Percent, Some(max)) => percent_of(max, total),
            (_, None) => total,
        }
    }
}

fn check_ordered(min: Option<f64>, max: Option<f64>) -> Result<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(LayoutError::MinExceedsMax { min, max }),
        _ => Ok(()),
    }
}

fn percent_of(percent: f64, total: f64) -> f64 {
    (total * (percent / 100.0)).round().min(total)
}

fn bounded_by_total(pixels: f64, total: f64, bound: &str) -> f64 {
    if pixels >= total && pixels > 0.0 {
        tracing::warn!(
            pixels,
            total,
            "margin {} is not smaller than the chart dimension, clamping",
            bound
        );
        return total;
    }
    pixels
}

/// Serialized form of [`MarginSpec`], validated on the way in.
#[derive(Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "lowercase")]
enum MarginSpecDef {
    Pixels {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Percent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

impl TryFrom<MarginSpecDef> for MarginSpec {
    type Error = LayoutError;

    fn try_from(def: MarginSpecDef) -> Result<Self> {
        match def {
            MarginSpecDef::Pixels { min, max } => MarginSpec::from_pixels(min, max),
            MarginSpecDef::Percent { min, max } => MarginSpec::from_percent(min, max),
        }
    }
}

impl From<MarginSpec> for MarginSpecDef {
    fn from(spec: MarginSpec) -> Self {
        let MarginSpec { unit, min, max } = spec;
        match unit {
            MarginUnit::Pixels => MarginSpecDef::Pixels { min, max },
            MarginUnit::Percent => MarginSpecDef::Percent { min, max },
        }
    }
}

/// Margin specs applied by the [`crate::LayoutManager`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub left_spec: MarginSpec,
    pub right_spec: MarginSpec,
    pub top_spec: MarginSpec,
    pub bottom_spec: MarginSpec,
}

impl LayoutConfig {
    /// Create a config with the default spec on every margin
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON. Missing margins keep the default spec.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_left_spec(mut self, spec: MarginSpec) -> Self {
        self.left_spec = spec;
        self
    }

    pub fn with_right_spec(mut self, spec: MarginSpec) -> Self {
        self.right_spec = spec;
        self
    }

    pub fn with_top_spec(mut self, spec: MarginSpec) -> Self {
        self.top_spec = spec;
        self
    }

    pub fn with_bottom_spec(mut self, spec: MarginSpec) -> Self {
        self.bottom_spec = spec;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_is_half() {
        let spec = MarginSpec::default();

        assert_eq!(spec.min_pixels(200.0), 0.0);
        assert_eq!(spec.max_pixels(200.0), 100.0);
        assert_eq!(spec.max_pixels(101.0), 51.0);
    }

    #[test]
    fn test_pixel_bounds() {
        let spec = MarginSpec::from_pixels(Some(10.0), Some(40.0)).unwrap();

        assert_eq!(spec.min_pixels(300.0), 10.0);
        assert_eq!(spec.max_pixels(300.0), 40.0);
    }

    #[test]
    fn test_unbounded_pixels() {
        let spec = MarginSpec::from_pixels(None, None).unwrap();

        assert_eq!(spec.min_pixels(300.0), 0.0);
        assert_eq!(spec.max_pixels(300.0), 300.0);
    }

    #[test]
    fn test_fixed_pixels() {
        let spec = MarginSpec::fixed_pixels(25.0).unwrap();

        assert_eq!(spec.min_pixels(300.0), 25.0);
        assert_eq!(spec.max_pixels(300.0), 25.0);
    }

    #[test]
    fn test_percent_rounds() {
        let spec = MarginSpec::from_percent(Some(10.0), Some(33.0)).unwrap();

        assert_eq!(spec.min_pixels(155.0), 16.0);
        assert_eq!(spec.max_pixels(155.0), 51.0);
    }

    #[test]
    fn test_pixels_clamped_to_total() {
        let spec = MarginSpec::from_pixels(Some(150.0), Some(500.0)).unwrap();

        assert_eq!(spec.min_pixels(100.0), 100.0);
        assert_eq!(spec.max_pixels(100.0), 100.0);
    }

    #[test]
    fn test_rejects_negative_pixels() {
        assert!(matches!(
            MarginSpec::from_pixels(Some(-1.0), None),
            Err(LayoutError::NegativePixels(_))
        ));
        assert!(matches!(
            MarginSpec::fixed_pixels(-5.0),
            Err(LayoutError::NegativePixels(_))
        ));
    }

    #[test]
    fn test_rejects_percent_out_of_range() {
        assert!(matches!(
            MarginSpec::from_percent(None, Some(101.0)),
            Err(LayoutError::PercentOutOfRange(_))
        ));
        assert!(matches!(
            MarginSpec::from_percent(Some(-0.5), None),
            Err(LayoutError::PercentOutOfRange(_))
        ));
    }

    #[test]
    fn test_accessors_expose_validated_bounds() {
        let spec = MarginSpec::from_percent(Some(10.0), Some(30.0)).unwrap();

        assert_eq!(spec.unit(), MarginUnit::Percent);
        assert_eq!(spec.min(), Some(10.0));
        assert_eq!(spec.max(), Some(30.0));
        assert_eq!(MarginSpec::default().unit(), MarginUnit::Percent);
        assert_eq!(MarginSpec::fixed_pixels(8.0).unwrap().unit(), MarginUnit::Pixels);
    }

    #[test]
    fn test_min_never_above_max_for_buildable_specs() {
        let specs = [
            MarginSpec::default(),
            MarginSpec::from_percent(Some(20.0), Some(20.0)).unwrap(),
            MarginSpec::from_percent(Some(80.0), None).unwrap(),
            MarginSpec::from_pixels(Some(30.0), None).unwrap(),
            MarginSpec::from_pixels(None, Some(0.0)).unwrap(),
        ];

        for spec in specs {
            for total in [0.0, 1.0, 37.5, 100.0, 640.0] {
                let min = spec.min_pixels(total);
                assert!(min >= 0.0, "{spec:?} at {total}: negative min {min}");
                assert!(min <= spec.max_pixels(total), "{spec:?} at {total}");
            }
        }
    }

    #[test]
    fn test_rejects_min_above_max() {
        assert!(matches!(
            MarginSpec::from_pixels(Some(50.0), Some(20.0)),
            Err(LayoutError::MinExceedsMax { .. })
        ));
        assert!(matches!(
            MarginSpec::from_percent(Some(60.0), Some(40.0)),
            Err(LayoutError::MinExceedsMax { .. })
        ));
        assert!(MarginSpec::from_percent(Some(40.0), Some(40.0)).is_ok());
    }

    #[test]
    fn test_config_from_json() {
        let config = LayoutConfig::from_json(
            r#"{
                "left_spec": { "unit": "pixels", "min": 20, "max": 80 },
                "top_spec": { "unit": "percent", "max": 25 }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.left_spec,
            MarginSpec::from_pixels(Some(20.0), Some(80.0)).unwrap()
        );
        assert_eq!(config.top_spec.max_pixels(400.0), 100.0);
        assert_eq!(config.right_spec, MarginSpec::default());
        assert_eq!(config.bottom_spec, MarginSpec::default());
    }

    #[test]
    fn test_config_from_json_validates() {
        let result = LayoutConfig::from_json(
            r#"{ "left_spec": { "unit": "percent", "min": 80, "max": 20 } }"#,
        );

        assert!(matches!(result, Err(LayoutError::Config(_))));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = LayoutConfig::new()
            .with_right_spec(MarginSpec::fixed_pixels(30.0).unwrap())
            .with_bottom_spec(MarginSpec::from_percent(Some(5.0), None).unwrap());

        let json = serde_json::to_string(&config).unwrap();
        let parsed = LayoutConfig::from_json(&json).unwrap();

        assert_eq!(parsed, config);
    }
}
