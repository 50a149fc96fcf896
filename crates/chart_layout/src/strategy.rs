//! Margin strategies: measuring and placing the views of one chart margin
//!
//! Left and right margins are vertical strips whose width is being
//! allocated; top and bottom margins are horizontal strips whose height is
//! being allocated. Measuring is shared per orientation, placement differs
//! per side because each side grows outward from a different draw area edge.

use crate::geometry::Rect;
use crate::size_list::{DesiredViewSizes, SizeList};
use crate::view::{LayoutView, LayoutViewConfig, MarginSide, ViewMargin, ViewMeasuredSizes};

/// Budget for measuring the views of one margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginConstraints {
    /// Largest total size of the margin along the dimension being allocated
    pub max_size: f64,
    /// Cross dimension offered to views spanning only the draw area
    pub cross_size: f64,
    /// Cross dimension offered to `Full*` views
    pub full_cross_size: f64,
}

/// Which dimension a margin allocates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginOrientation {
    /// Left and right margins: allocates width, spans height
    Vertical,
    /// Top and bottom margins: allocates height, spans width
    Horizontal,
}

impl MarginOrientation {
    fn primary_margin(self, margin: &ViewMargin) -> f64 {
        match self {
            MarginOrientation::Vertical => margin.width(),
            MarginOrientation::Horizontal => margin.height(),
        }
    }

    fn cross_margin(self, margin: &ViewMargin) -> f64 {
        match self {
            MarginOrientation::Vertical => margin.height(),
            MarginOrientation::Horizontal => margin.width(),
        }
    }

    fn preferred(self, sizes: &ViewMeasuredSizes) -> f64 {
        match self {
            MarginOrientation::Vertical => sizes.preferred_width,
            MarginOrientation::Horizontal => sizes.preferred_height,
        }
    }

    fn minimum(self, sizes: &ViewMeasuredSizes) -> f64 {
        match self {
            MarginOrientation::Vertical => sizes.min_width,
            MarginOrientation::Horizontal => sizes.min_height,
        }
    }

    /// Map (primary, cross) to the (max_width, max_height) a view is asked for
    fn request(self, primary: f64, cross: f64) -> (f64, f64) {
        match self {
            MarginOrientation::Vertical => (primary, cross),
            MarginOrientation::Horizontal => (cross, primary),
        }
    }
}

/// Measure the views of one margin, in position order.
///
/// Allocation is greedy: each view is offered whatever the views before it
/// left over, minus its own margin. Once every view has reported, the
/// preferred sizes are shrunk to fit `max_size` (less the view margins),
/// outermost views first.
pub fn measure_margin(
    orientation: MarginOrientation,
    views: &mut [&mut dyn LayoutView],
    constraints: MarginConstraints,
) -> SizeList {
    let mut desired = DesiredViewSizes::new();
    let mut max_size = constraints.max_size;
    let mut remaining = constraints.max_size;

    for view in views.iter_mut() {
        let config = *view.layout_config();
        let cross = if config.is_full_position() {
            constraints.full_cross_size
        } else {
            constraints.cross_size
        } - orientation.cross_margin(&config.view_margin);

        let buffer = orientation.primary_margin(&config.view_margin);
        remaining -= buffer;
        max_size -= buffer;

        // Views with one usable dimension are still measured: axes rebuild
        // their ticks on every pass even when they end up hidden.
        let mut sizes = ViewMeasuredSizes::ZERO;
        if remaining > 0.0 || cross > 0.0 {
            let (max_width, max_height) = orientation.request(remaining, cross);
            sizes = view.measure(max_width, max_height);
            remaining -= orientation.preferred(&sizes);
        }

        desired.add(orientation.preferred(&sizes), orientation.minimum(&sizes));
    }

    desired.adjust_to(max_size);
    desired.into_preferred()
}

/// Measures and places the views of one chart margin
pub trait MarginLayoutStrategy {
    /// The dimension this margin allocates
    fn orientation(&self) -> MarginOrientation;

    /// Measure `views` (in position order) and return their sizes along the
    /// allocated dimension.
    fn measure(&self, views: &mut [&mut dyn LayoutView], constraints: MarginConstraints) -> SizeList {
        measure_margin(self.orientation(), views, constraints)
    }

    /// Assign bounds to `views`, walking outward from the draw area.
    fn layout(
        &self,
        views: &mut [&mut dyn LayoutView],
        sizes: &SizeList,
        full_bounds: Rect,
        draw_area_bounds: Rect,
    );
}

/// Strategy for views in the left margin
#[derive(Debug, Clone, Copy, Default)]
pub struct LeftMarginLayoutStrategy;

/// Strategy for views in the right margin
#[derive(Debug, Clone, Copy, Default)]
pub struct RightMarginLayoutStrategy;

/// Strategy for views in the top margin
#[derive(Debug, Clone, Copy, Default)]
pub struct TopMarginLayoutStrategy;

/// Strategy for views in the bottom margin
#[derive(Debug, Clone, Copy, Default)]
pub struct BottomMarginLayoutStrategy;

/// The strategy responsible for `side`
pub fn strategy_for(side: MarginSide) -> &'static dyn MarginLayoutStrategy {
    match side {
        MarginSide::Left => &LeftMarginLayoutStrategy,
        MarginSide::Right => &RightMarginLayoutStrategy,
        MarginSide::Top => &TopMarginLayoutStrategy,
        MarginSide::Bottom => &BottomMarginLayoutStrategy,
    }
}

/// (top, height) of a view in a vertical margin
fn vertical_span(config: &LayoutViewConfig, full_bounds: Rect, draw_area_bounds: Rect) -> (f64, f64) {
    let span = if config.is_full_position() {
        full_bounds
    } else {
        draw_area_bounds
    };
    let margin = &config.view_margin;
    (span.top() + margin.top_px(), span.height - margin.height())
}

/// (left, width) of a view in a horizontal margin
fn horizontal_span(config: &LayoutViewConfig, full_bounds: Rect, draw_area_bounds: Rect) -> (f64, f64) {
    let span = if config.is_full_position() {
        full_bounds
    } else {
        draw_area_bounds
    };
    let margin = &config.view_margin;
    (span.left() + margin.left_px(), span.width - margin.width())
}

impl MarginLayoutStrategy for LeftMarginLayoutStrategy {
    fn orientation(&self) -> MarginOrientation {
        MarginOrientation::Vertical
    }

    fn layout(
        &self,
        views: &mut [&mut dyn LayoutView],
        sizes: &SizeList,
        full_bounds: Rect,
        draw_area_bounds: Rect,
    ) {
        let mut prev_bounds_left = draw_area_bounds.left();

        for (view, width) in views.iter_mut().zip(sizes.iter()) {
            let config = *view.layout_config();
            let left = prev_bounds_left - config.view_margin.right_px() - width;
            let (top, height) = vertical_span(&config, full_bounds, draw_area_bounds);

            prev_bounds_left = left - config.view_margin.left_px();
            view.layout(Rect::new(left, top, width, height), draw_area_bounds);
        }
    }
}

impl MarginLayoutStrategy for RightMarginLayoutStrategy {
    fn orientation(&self) -> MarginOrientation {
        MarginOrientation::Vertical
    }

    fn layout(
        &self,
        views: &mut [&mut dyn LayoutView],
        sizes: &SizeList,
        full_bounds: Rect,
        draw_area_bounds: Rect,
    ) {
        let mut prev_bounds_right = draw_area_bounds.right();

        for (view, width) in views.iter_mut().zip(sizes.iter()) {
            let config = *view.layout_config();
            let left = prev_bounds_right + config.view_margin.left_px();
            let (top, height) = vertical_span(&config, full_bounds, draw_area_bounds);

            prev_bounds_right = left + width + config.view_margin.right_px();
            view.layout(Rect::new(left, top, width, height), draw_area_bounds);
        }
    }
}

impl MarginLayoutStrategy for TopMarginLayoutStrategy {
    fn orientation(&self) -> MarginOrientation {
        MarginOrientation::Horizontal
    }

    fn layout(
        &self,
        views: &mut [&mut dyn LayoutView],
        sizes: &SizeList,
        full_bounds: Rect,
        draw_area_bounds: Rect,
    ) {
        let mut prev_bounds_top = draw_area_bounds.top();

        for (view, height) in views.iter_mut().zip(sizes.iter()) {
            let config = *view.layout_config();
            let top = prev_bounds_top - height - config.view_margin.bottom_px();
            let (left, width) = horizontal_span(&config, full_bounds, draw_area_bounds);

            prev_bounds_top = top - config.view_margin.top_px();
            view.layout(Rect::new(left, top, width, height), draw_area_bounds);
        }
    }
}

impl MarginLayoutStrategy for BottomMarginLayoutStrategy {
    fn orientation(&self) -> MarginOrientation {
        MarginOrientation::Horizontal
    }

    fn layout(
        &self,
        views: &mut [&mut dyn LayoutView],
        sizes: &SizeList,
        full_bounds: Rect,
        draw_area_bounds: Rect,
    ) {
        let mut prev_bounds_bottom = draw_area_bounds.bottom();

        for (view, height) in views.iter_mut().zip(sizes.iter()) {
            let config = *view.layout_config();
            let top = prev_bounds_bottom + config.view_margin.top_px();
            let (left, width) = horizontal_span(&config, full_bounds, draw_area_bounds);

            prev_bounds_bottom = top + height + config.view_margin.bottom_px();
            view.layout(Rect::new(left, top, width, height), draw_area_bounds);
        }
    }
}
