//! The contract between layout participants and the layout manager
//!
//! Every axis, legend, title, annotation and series renderer implements
//! [`LayoutView`]. The manager only ever asks a view to measure itself
//! against a budget and later hands it its final bounds.

use crate::error::{LayoutError, Result};
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Where a view is placed relative to the draw area.
///
/// The `Full*` variants span the entire chart dimension instead of just the
/// draw area's corresponding dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutPosition {
    Top,
    FullTop,
    Bottom,
    FullBottom,
    Left,
    FullLeft,
    Right,
    FullRight,
    DrawArea,
}

impl LayoutPosition {
    /// Whether the view spans the full chart dimension
    pub fn is_full(&self) -> bool {
        matches!(
            self,
            LayoutPosition::FullTop
                | LayoutPosition::FullBottom
                | LayoutPosition::FullLeft
                | LayoutPosition::FullRight
        )
    }

    /// The chart margin this position belongs to, `None` for the draw area
    pub fn margin(&self) -> Option<MarginSide> {
        match self {
            LayoutPosition::Top | LayoutPosition::FullTop => Some(MarginSide::Top),
            LayoutPosition::Bottom | LayoutPosition::FullBottom => Some(MarginSide::Bottom),
            LayoutPosition::Left | LayoutPosition::FullLeft => Some(MarginSide::Left),
            LayoutPosition::Right | LayoutPosition::FullRight => Some(MarginSide::Right),
            LayoutPosition::DrawArea => None,
        }
    }
}

/// One of the four chart-edge regions around the draw area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarginSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// Standard paint orders for chart components.
///
/// Custom components should take the nearest layer from this list and add or
/// subtract 1. Smaller numbers are painted first.
pub mod paint_order {
    /// Range annotations sit beneath axis grid lines.
    pub const RANGE_ANNOTATION: i32 = -10;
    pub const MEASURE_AXIS: i32 = 0;
    /// Domain axis lines are drawn over measure axis grid lines.
    pub const DOMAIN_AXIS: i32 = 5;
    pub const ARC: i32 = 10;
    pub const BAR: i32 = 10;
    pub const TREE_MAP: i32 = 10;
    pub const BAR_TARGET_LINE: i32 = 15;
    pub const LINE: i32 = 20;
    pub const POINT: i32 = 25;
    pub const LEGEND: i32 = 100;
    pub const LINE_POINT_HIGHLIGHTER: i32 = 110;
    pub const SLIDER: i32 = 150;
    pub const CHART_TITLE: i32 = 160;
}

/// Standard position orders for chart components.
///
/// Smaller numbers sit closer to the draw area and receive space first.
pub mod position_order {
    pub const DRAW_AREA: i32 = 0;
    pub const SYMBOL_ANNOTATION: i32 = 10;
    pub const AXIS: i32 = 20;
    pub const LEGEND: i32 = 30;
    pub const CHART_TITLE: i32 = 40;
}

/// Empty space kept around a view, in pixels.
///
/// All four offsets are non-negative; construction rejects anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewMarginDef", into = "ViewMarginDef")]
pub struct ViewMargin {
    top_px: f64,
    bottom_px: f64,
    left_px: f64,
    right_px: f64,
}

impl ViewMargin {
    /// A margin with no space on any side
    pub const EMPTY: ViewMargin = ViewMargin {
        top_px: 0.0,
        bottom_px: 0.0,
        left_px: 0.0,
        right_px: 0.0,
    };

    pub fn new(top_px: f64, bottom_px: f64, left_px: f64, right_px: f64) -> Result<Self> {
        for value in [top_px, bottom_px, left_px, right_px] {
            if !(value >= 0.0) {
                return Err(LayoutError::NegativePixels(value));
            }
        }
        Ok(Self {
            top_px,
            bottom_px,
            left_px,
            right_px,
        })
    }

    /// The same margin on every side
    pub fn uniform(px: f64) -> Result<Self> {
        Self::new(px, px, px, px)
    }

    pub fn top_px(&self) -> f64 {
        self.top_px
    }

    pub fn bottom_px(&self) -> f64 {
        self.bottom_px
    }

    pub fn left_px(&self) -> f64 {
        self.left_px
    }

    pub fn right_px(&self) -> f64 {
        self.right_px
    }

    /// Total horizontal margin
    pub fn width(&self) -> f64 {
        self.left_px + self.right_px
    }

    /// Total vertical margin
    pub fn height(&self) -> f64 {
        self.top_px + self.bottom_px
    }
}

#[derive(Serialize, Deserialize)]
struct ViewMarginDef {
    #[serde(default)]
    top_px: f64,
    #[serde(default)]
    bottom_px: f64,
    #[serde(default)]
    left_px: f64,
    #[serde(default)]
    right_px: f64,
}

impl TryFrom<ViewMarginDef> for ViewMargin {
    type Error = LayoutError;

    fn try_from(def: ViewMarginDef) -> Result<Self> {
        ViewMargin::new(def.top_px, def.bottom_px, def.left_px, def.right_px)
    }
}

impl From<ViewMargin> for ViewMarginDef {
    fn from(margin: ViewMargin) -> Self {
        ViewMarginDef {
            top_px: margin.top_px,
            bottom_px: margin.bottom_px,
            left_px: margin.left_px,
            right_px: margin.right_px,
        }
    }
}

/// Layout parameters of a view, fixed for as long as it is attached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutViewConfig {
    /// Order of painting on the canvas. Smaller is painted first.
    pub paint_order: i32,
    pub position: LayoutPosition,
    /// Order within a chart margin. Smaller is closer to the draw area and
    /// is given space first. Draw area views all receive the draw area bounds.
    pub position_order: i32,
    #[serde(default)]
    pub view_margin: ViewMargin,
}

impl LayoutViewConfig {
    pub fn new(paint_order: i32, position: LayoutPosition, position_order: i32) -> Self {
        Self {
            paint_order,
            position,
            position_order,
            view_margin: ViewMargin::EMPTY,
        }
    }

    pub fn with_view_margin(mut self, view_margin: ViewMargin) -> Self {
        self.view_margin = view_margin;
        self
    }

    pub fn is_full_position(&self) -> bool {
        self.position.is_full()
    }
}

/// Sizes reported by a view for one measurement request.
///
/// Measurements are tight to the view and exclude its [`ViewMargin`], which
/// the manager accounts for separately.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewMeasuredSizes {
    pub preferred_width: f64,
    pub preferred_height: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl ViewMeasuredSizes {
    /// A view that needs no space
    pub const ZERO: ViewMeasuredSizes = ViewMeasuredSizes {
        preferred_width: 0.0,
        preferred_height: 0.0,
        min_width: 0.0,
        min_height: 0.0,
    };

    /// Preferred sizes with zero minimums
    pub fn new(preferred_width: f64, preferred_height: f64) -> Self {
        Self {
            preferred_width,
            preferred_height,
            min_width: 0.0,
            min_height: 0.0,
        }
    }

    pub fn with_min(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }
}

/// A component that measures itself and accepts bounds to complete layout.
///
/// `measure` may be called several times per layout cycle with different
/// budgets; views are free to recompute derived state (such as axis ticks)
/// on each call. Painting is driven by the owning chart in
/// [`crate::LayoutManager::paint_ordered_views`] order and is not part of
/// this contract.
pub trait LayoutView {
    /// Layout parameters for this view
    fn layout_config(&self) -> &LayoutViewConfig;

    /// Measure this view against the given budget, excluding its margin
    fn measure(&mut self, max_width: f64, max_height: f64) -> ViewMeasuredSizes;

    /// Accept the final bounds of this view and of the draw area
    fn layout(&mut self, component_bounds: Rect, draw_area_bounds: Rect);

    /// Bounds assigned by the last `layout` call, if any
    fn component_bounds(&self) -> Option<Rect>;

    /// Whether this view draws series data
    fn is_series_renderer(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_positions() {
        assert!(LayoutPosition::FullTop.is_full());
        assert!(LayoutPosition::FullBottom.is_full());
        assert!(LayoutPosition::FullLeft.is_full());
        assert!(LayoutPosition::FullRight.is_full());
        assert!(!LayoutPosition::Top.is_full());
        assert!(!LayoutPosition::DrawArea.is_full());
    }

    #[test]
    fn test_position_margins() {
        assert_eq!(LayoutPosition::FullLeft.margin(), Some(MarginSide::Left));
        assert_eq!(LayoutPosition::Right.margin(), Some(MarginSide::Right));
        assert_eq!(LayoutPosition::FullTop.margin(), Some(MarginSide::Top));
        assert_eq!(LayoutPosition::Bottom.margin(), Some(MarginSide::Bottom));
        assert_eq!(LayoutPosition::DrawArea.margin(), None);
    }

    #[test]
    fn test_view_margin_totals() {
        let margin = ViewMargin::new(1.0, 2.0, 3.0, 4.0).unwrap();

        assert_eq!(margin.width(), 7.0);
        assert_eq!(margin.height(), 3.0);
        assert_eq!(margin.left_px(), 3.0);
        assert_eq!(ViewMargin::default(), ViewMargin::EMPTY);
        assert_eq!(ViewMargin::uniform(5.0).unwrap().width(), 10.0);
    }

    #[test]
    fn test_view_margin_rejects_negative_offsets() {
        assert!(matches!(
            ViewMargin::new(-5.0, 0.0, -3.0, 0.0),
            Err(LayoutError::NegativePixels(value)) if value == -5.0
        ));
        assert!(matches!(
            ViewMargin::uniform(f64::NAN),
            Err(LayoutError::NegativePixels(_))
        ));
        assert!(ViewMargin::new(0.0, 0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_view_margin_json_validates() {
        let config: std::result::Result<LayoutViewConfig, _> = serde_json::from_str(
            r#"{ "paint_order": 0, "position": "Left", "position_order": 20,
                 "view_margin": { "right_px": -4 } }"#,
        );
        assert!(config.is_err());

        let config: LayoutViewConfig = serde_json::from_str(
            r#"{ "paint_order": 0, "position": "Left", "position_order": 20,
                 "view_margin": { "right_px": 4 } }"#,
        )
        .unwrap();
        assert_eq!(config.view_margin, ViewMargin::new(0.0, 0.0, 0.0, 4.0).unwrap());
    }

    #[test]
    fn test_measured_sizes_default_minimums() {
        let sizes = ViewMeasuredSizes::new(30.0, 40.0);

        assert_eq!(sizes.min_width, 0.0);
        assert_eq!(sizes.min_height, 0.0);
        assert_eq!(sizes.with_min(5.0, 6.0).min_height, 6.0);
    }

    #[test]
    fn test_config_json() {
        let config: LayoutViewConfig = serde_json::from_str(
            r#"{ "paint_order": 100, "position": "FullRight", "position_order": 30 }"#,
        )
        .unwrap();

        assert_eq!(config.paint_order, paint_order::LEGEND);
        assert!(config.is_full_position());
        assert_eq!(config.view_margin, ViewMargin::EMPTY);
    }
}
