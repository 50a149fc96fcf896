//! Mock chart components shared by the integration tests

#![allow(dead_code)]

use chart_layout::{
    paint_order, position_order, LayoutPosition, LayoutView, LayoutViewConfig, Rect, ViewMargin,
    ViewMeasuredSizes,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Route crate logs to the test output; `RUST_LOG=chart_layout=trace` shows
/// every measurement pass.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// What a mock view observed, shared with the test after the view is boxed
#[derive(Debug, Default)]
pub struct Probe {
    pub requests: Vec<(f64, f64)>,
    pub bounds: Option<Rect>,
    pub draw_area_bounds: Option<Rect>,
    pub tick_count: usize,
}

pub type SharedProbe = Rc<RefCell<Probe>>;

/// An axis: fixed thickness for labels, tick count derived from its length
pub struct AxisView {
    config: LayoutViewConfig,
    thickness: f64,
    tick_spacing: f64,
    probe: SharedProbe,
}

impl AxisView {
    pub fn new(position: LayoutPosition, thickness: f64) -> (Self, SharedProbe) {
        let paint = match position {
            LayoutPosition::Bottom | LayoutPosition::Top => paint_order::DOMAIN_AXIS,
            _ => paint_order::MEASURE_AXIS,
        };
        let probe = SharedProbe::default();
        let view = Self {
            config: LayoutViewConfig::new(paint, position, position_order::AXIS),
            thickness,
            tick_spacing: 50.0,
            probe: Rc::clone(&probe),
        };
        (view, probe)
    }

    fn is_vertical(&self) -> bool {
        matches!(
            self.config.position,
            LayoutPosition::Left | LayoutPosition::FullLeft | LayoutPosition::Right | LayoutPosition::FullRight
        )
    }
}

impl LayoutView for AxisView {
    fn layout_config(&self) -> &LayoutViewConfig {
        &self.config
    }

    fn measure(&mut self, max_width: f64, max_height: f64) -> ViewMeasuredSizes {
        let mut probe = self.probe.borrow_mut();
        probe.requests.push((max_width, max_height));

        let length = if self.is_vertical() { max_height } else { max_width };
        probe.tick_count = (length.max(0.0) / self.tick_spacing).floor() as usize + 1;

        if self.is_vertical() {
            ViewMeasuredSizes::new(self.thickness, max_height)
        } else {
            ViewMeasuredSizes::new(max_width, self.thickness)
        }
    }

    fn layout(&mut self, component_bounds: Rect, draw_area_bounds: Rect) {
        let mut probe = self.probe.borrow_mut();
        probe.bounds = Some(component_bounds);
        probe.draw_area_bounds = Some(draw_area_bounds);
    }

    fn component_bounds(&self) -> Option<Rect> {
        self.probe.borrow().bounds
    }
}

/// A box of fixed preferred and minimum size: legends, titles, annotations
pub struct BoxView {
    config: LayoutViewConfig,
    sizes: ViewMeasuredSizes,
    series: bool,
    probe: SharedProbe,
}

impl BoxView {
    pub fn new(position: LayoutPosition, sizes: ViewMeasuredSizes) -> (Self, SharedProbe) {
        let probe = SharedProbe::default();
        let view = Self {
            config: LayoutViewConfig::new(paint_order::LEGEND, position, position_order::LEGEND),
            sizes,
            series: false,
            probe: Rc::clone(&probe),
        };
        (view, probe)
    }

    pub fn title(position: LayoutPosition, height: f64) -> (Self, SharedProbe) {
        let (mut view, probe) = Self::new(position, ViewMeasuredSizes::new(0.0, height));
        view.config.paint_order = paint_order::CHART_TITLE;
        view.config.position_order = position_order::CHART_TITLE;
        (view, probe)
    }

    pub fn with_position_order(mut self, position_order: i32) -> Self {
        self.config.position_order = position_order;
        self
    }

    pub fn with_view_margin(mut self, margin: ViewMargin) -> Self {
        self.config.view_margin = margin;
        self
    }

    pub fn as_series_renderer(mut self) -> Self {
        self.series = true;
        self
    }
}

impl LayoutView for BoxView {
    fn layout_config(&self) -> &LayoutViewConfig {
        &self.config
    }

    fn measure(&mut self, max_width: f64, max_height: f64) -> ViewMeasuredSizes {
        self.probe.borrow_mut().requests.push((max_width, max_height));
        self.sizes
    }

    fn layout(&mut self, component_bounds: Rect, draw_area_bounds: Rect) {
        let mut probe = self.probe.borrow_mut();
        probe.bounds = Some(component_bounds);
        probe.draw_area_bounds = Some(draw_area_bounds);
    }

    fn component_bounds(&self) -> Option<Rect> {
        self.probe.borrow().bounds
    }

    fn is_series_renderer(&self) -> bool {
        self.series
    }
}

/// A series renderer drawing into the draw area
pub struct SeriesView {
    config: LayoutViewConfig,
    bounds: Option<Rect>,
}

impl SeriesView {
    pub fn new(paint: i32) -> Self {
        Self {
            config: LayoutViewConfig::new(paint, LayoutPosition::DrawArea, position_order::DRAW_AREA),
            bounds: None,
        }
    }
}

impl LayoutView for SeriesView {
    fn layout_config(&self) -> &LayoutViewConfig {
        &self.config
    }

    fn measure(&mut self, _max_width: f64, _max_height: f64) -> ViewMeasuredSizes {
        ViewMeasuredSizes::ZERO
    }

    fn layout(&mut self, _component_bounds: Rect, draw_area_bounds: Rect) {
        self.bounds = Some(draw_area_bounds);
    }

    fn component_bounds(&self) -> Option<Rect> {
        self.bounds
    }

    fn is_series_renderer(&self) -> bool {
        true
    }
}
