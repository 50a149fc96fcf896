//! Layout manager: allocates chart space among margin views and the draw area
//!
//! The owning chart adds [`LayoutView`]s, then on every size change calls
//! [`LayoutManager::measure`] followed by [`LayoutManager::layout`].
//!
//! # Measurement
//!
//! Margins are measured in a fixed order (left, right, bottom, top) so that
//! top and bottom views see the width already taken by the side margins.
//! Up to three passes run:
//!
//! 1. Every margin is measured against its spec maximum, with the full chart
//!    height offered to the side margins.
//! 2. The margins are measured again, seeded with the pass one sizes so views
//!    learn the cross dimension they will actually receive.
//! 3. Only if any margin total changed between passes one and two: a final
//!    pass in which the pass two sizes become hard ceilings.
//!
//! The draw area is whatever remains, floored at 20 x 20 pixels.

use crate::error::{LayoutError, Result};
use crate::geometry::{Point, Rect};
use crate::margin_spec::LayoutConfig;
use crate::size_list::SizeList;
use crate::strategy::{strategy_for, MarginConstraints};
use crate::view::{LayoutView, LayoutViewConfig, MarginSide};
use std::cell::RefCell;
use std::fmt;

/// Smallest draw area width, even when the margins leave less room
pub const MIN_DRAW_WIDTH: f64 = 20.0;
/// Smallest draw area height, even when the margins leave less room
pub const MIN_DRAW_HEIGHT: f64 = 20.0;

/// Handle to a view attached to a [`LayoutManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

struct ViewEntry {
    id: ViewId,
    view: Box<dyn LayoutView>,
}

/// View indices sorted for one generation of the view set
struct OrderCache {
    generation: u64,
    indices: Vec<usize>,
}

/// View indices grouped by margin, each in position order
#[derive(Default)]
struct MarginGroups {
    left: Vec<usize>,
    right: Vec<usize>,
    top: Vec<usize>,
    bottom: Vec<usize>,
    draw_area: Vec<usize>,
}

/// Margin sizes produced by a measurement pass
#[derive(Debug, Clone, PartialEq)]
pub struct MarginMeasurements {
    pub left_width: f64,
    pub left_sizes: SizeList,
    pub right_width: f64,
    pub right_sizes: SizeList,
    pub top_height: f64,
    pub top_sizes: SizeList,
    pub bottom_height: f64,
    pub bottom_sizes: SizeList,
}

impl MarginMeasurements {
    /// Whether both passes produced exactly the same margin totals
    fn same_totals(&self, other: &MarginMeasurements) -> bool {
        self.left_width == other.left_width
            && self.right_width == other.right_width
            && self.top_height == other.top_height
            && self.bottom_height == other.bottom_height
    }
}

/// Result of the last `measure` call
struct Measured {
    generation: u64,
    width: f64,
    height: f64,
    sizes: MarginMeasurements,
    draw_area_bounds: Rect,
}

/// Owns the views of a chart and positions them around the draw area
pub struct LayoutManager {
    config: LayoutConfig,
    views: Vec<ViewEntry>,
    next_id: u64,
    /// Bumped on every change to the views or config
    generation: u64,
    paint_order: RefCell<Option<OrderCache>>,
    position_order: RefCell<Option<OrderCache>>,
    measured: Option<Measured>,
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl fmt::Debug for LayoutManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutManager")
            .field("config", &self.config)
            .field("views", &self.views.iter().map(|entry| entry.id).collect::<Vec<_>>())
            .field("generation", &self.generation)
            .field("measured", &self.measurements())
            .finish()
    }
}

impl LayoutManager {
    /// Create a layout manager with the given margin specs
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            views: Vec::new(),
            next_id: 0,
            generation: 0,
            paint_order: RefCell::new(None),
            position_order: RefCell::new(None),
            measured: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the margin specs. The layout must be measured again.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.invalidate();
    }

    /// Attach a view and return its handle
    pub fn add_view(&mut self, view: Box<dyn LayoutView>) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        self.views.push(ViewEntry { id, view });
        self.invalidate();
        id
    }

    /// Detach a view and hand it back. Returns `None` if it was not attached.
    pub fn remove_view(&mut self, id: ViewId) -> Option<Box<dyn LayoutView>> {
        let index = self.views.iter().position(|entry| entry.id == id)?;
        let entry = self.views.remove(index);
        self.invalidate();
        Some(entry.view)
    }

    /// Whether `id` refers to an attached view
    pub fn is_attached(&self, id: ViewId) -> bool {
        self.views.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn view(&self, id: ViewId) -> Option<&dyn LayoutView> {
        let entry = self.views.iter().find(|entry| entry.id == id)?;
        let view: &dyn LayoutView = entry.view.as_ref();
        Some(view)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut dyn LayoutView> {
        let entry = self.views.iter_mut().find(|entry| entry.id == id)?;
        let view: &mut dyn LayoutView = entry.view.as_mut();
        Some(view)
    }

    /// Call `apply` on every attached view, in insertion order
    pub fn apply_to_views(&mut self, mut apply: impl FnMut(&mut dyn LayoutView)) {
        for entry in &mut self.views {
            apply(entry.view.as_mut());
        }
    }

    /// Views in the order they should be painted, first painted first
    pub fn paint_ordered_views(&self) -> Vec<ViewId> {
        self.ordered_indices(&self.paint_order, |config| config.paint_order)
            .into_iter()
            .map(|index| self.views[index].id)
            .collect()
    }

    /// Views in margin placement order, closest to the draw area first
    pub fn position_ordered_views(&self) -> Vec<ViewId> {
        self.ordered_indices(&self.position_order, |config| config.position_order)
            .into_iter()
            .map(|index| self.views[index].id)
            .collect()
    }

    /// Measure every view and fix the margin sizes and draw area bounds for
    /// a chart of `width` x `height` pixels.
    pub fn measure(&mut self, width: f64, height: f64) {
        let span = tracing::debug_span!("layout_measure", width, height, views = self.views.len());
        let _enter = span.enter();

        let groups = self.margin_groups();
        let config = self.config;

        let first = measure_pass(&config, &mut self.views, &groups, width, height, None, true);
        trace_pass(1, &first);

        let second = measure_pass(&config, &mut self.views, &groups, width, height, Some(&first), true);
        trace_pass(2, &second);

        // Views that asked for different space in the second pass could keep
        // oscillating; a third pass caps them at their second-pass sizes.
        let sizes = if first.same_totals(&second) {
            second
        } else {
            tracing::debug!("margins changed between passes, running convergence pass");
            let third = measure_pass(&config, &mut self.views, &groups, width, height, Some(&second), false);
            trace_pass(3, &third);
            third
        };

        let available_width = width - sizes.left_width - sizes.right_width;
        let available_height = height - sizes.top_height - sizes.bottom_height;
        if available_width < MIN_DRAW_WIDTH || available_height < MIN_DRAW_HEIGHT {
            tracing::debug!(
                available_width,
                available_height,
                "margins leave too little room, using minimum draw area"
            );
        }

        let draw_area_bounds = Rect::new(
            sizes.left_width,
            sizes.top_height,
            available_width.max(MIN_DRAW_WIDTH),
            available_height.max(MIN_DRAW_HEIGHT),
        );

        self.measured = Some(Measured {
            generation: self.generation,
            width,
            height,
            sizes,
            draw_area_bounds,
        });
    }

    /// Place every view using the sizes from the last `measure` call.
    ///
    /// `width` and `height` must be the dimensions that were measured;
    /// any other size returns [`LayoutError::NotMeasured`].
    pub fn layout(&mut self, width: f64, height: f64) -> Result<()> {
        let span = tracing::debug_span!("layout_place", width, height);
        let _enter = span.enter();

        let groups = self.margin_groups();
        let measured = match &self.measured {
            Some(measured) if measured.generation == self.generation => measured,
            _ => return Err(LayoutError::NotMeasured),
        };
        if measured.width != width || measured.height != height {
            tracing::debug!(
                measured_width = measured.width,
                measured_height = measured.height,
                "layout size differs from measured size"
            );
            return Err(LayoutError::NotMeasured);
        }

        let full_bounds = Rect::new(0.0, 0.0, width, height);
        let draw_area_bounds = measured.draw_area_bounds;
        let sizes = &measured.sizes;

        let margins = [
            (MarginSide::Left, &groups.left, &sizes.left_sizes),
            (MarginSide::Right, &groups.right, &sizes.right_sizes),
            (MarginSide::Bottom, &groups.bottom, &sizes.bottom_sizes),
            (MarginSide::Top, &groups.top, &sizes.top_sizes),
        ];
        for (side, indices, margin_sizes) in margins {
            strategy_for(side).layout(
                &mut select_views(&mut self.views, indices),
                margin_sizes,
                full_bounds,
                draw_area_bounds,
            );
        }

        for view in select_views(&mut self.views, &groups.draw_area) {
            view.layout(draw_area_bounds, draw_area_bounds);
        }

        Ok(())
    }

    /// Margin sizes from the last `measure`, `None` if the views or config
    /// changed since.
    pub fn measurements(&self) -> Option<&MarginMeasurements> {
        self.current().ok().map(|measured| &measured.sizes)
    }

    /// Bounds of the draw area
    pub fn draw_area_bounds(&self) -> Result<Rect> {
        Ok(self.current()?.draw_area_bounds)
    }

    /// Union of the bounds of every series renderer, or an empty rectangle
    /// when there are none.
    pub fn drawable_layout_area_bounds(&self) -> Result<Rect> {
        self.current()?;
        Ok(self
            .views
            .iter()
            .filter(|entry| entry.view.is_series_renderer())
            .filter_map(|entry| entry.view.component_bounds())
            .reduce(|bounds, other| bounds.bounding_box(&other))
            .unwrap_or_default())
    }

    pub fn margin_left(&self) -> Result<f64> {
        Ok(self.current()?.sizes.left_width)
    }

    pub fn margin_right(&self) -> Result<f64> {
        Ok(self.current()?.sizes.right_width)
    }

    pub fn margin_top(&self) -> Result<f64> {
        Ok(self.current()?.sizes.top_height)
    }

    pub fn margin_bottom(&self) -> Result<f64> {
        Ok(self.current()?.sizes.bottom_height)
    }

    /// Whether `point` lies within the most recently measured draw area.
    /// Always false before the first `measure`.
    ///
    /// Unlike the other accessors this does not fail once views or config
    /// change; it keeps answering from the last measured bounds, which may
    /// be stale until the next `measure`.
    pub fn within_draw_area(&self, point: Point) -> bool {
        self.measured
            .as_ref()
            .is_some_and(|measured| measured.draw_area_bounds.contains_point(point))
    }

    fn current(&self) -> Result<&Measured> {
        match &self.measured {
            Some(measured) if measured.generation == self.generation => Ok(measured),
            _ => Err(LayoutError::NotMeasured),
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// View indices stably sorted by `key`, recomputed when the generation
    /// moved on since the last sort.
    fn ordered_indices(
        &self,
        cache: &RefCell<Option<OrderCache>>,
        key: fn(&LayoutViewConfig) -> i32,
    ) -> Vec<usize> {
        let mut cache = cache.borrow_mut();
        if let Some(cached) = cache.as_ref().filter(|cached| cached.generation == self.generation) {
            return cached.indices.clone();
        }

        let mut indices: Vec<usize> = (0..self.views.len()).collect();
        indices.sort_by_key(|&index| key(self.views[index].view.layout_config()));
        *cache = Some(OrderCache {
            generation: self.generation,
            indices: indices.clone(),
        });
        indices
    }

    fn margin_groups(&self) -> MarginGroups {
        let mut groups = MarginGroups::default();
        for index in self.ordered_indices(&self.position_order, |config| config.position_order) {
            let position = self.views[index].view.layout_config().position;
            let group = match position.margin() {
                Some(MarginSide::Left) => &mut groups.left,
                Some(MarginSide::Right) => &mut groups.right,
                Some(MarginSide::Top) => &mut groups.top,
                Some(MarginSide::Bottom) => &mut groups.bottom,
                None => &mut groups.draw_area,
            };
            group.push(index);
        }
        groups
    }
}

/// Borrow the views at `indices`, in that order
fn select_views<'a>(entries: &'a mut [ViewEntry], indices: &[usize]) -> Vec<&'a mut dyn LayoutView> {
    let mut slots: Vec<Option<&'a mut ViewEntry>> = entries.iter_mut().map(Some).collect();
    let mut selected: Vec<&'a mut dyn LayoutView> = Vec::with_capacity(indices.len());
    for &index in indices {
        if let Some(entry) = slots.get_mut(index).and_then(Option::take) {
            selected.push(entry.view.as_mut());
        }
    }
    selected
}

/// One measurement pass over all four margins.
///
/// `previous` seeds the candidate margin sizes; without it the spec maxima
/// are used and the side margins see the full chart height. With `use_max`
/// the spec maxima stay the ceiling, otherwise the candidates do.
fn measure_pass(
    config: &LayoutConfig,
    views: &mut [ViewEntry],
    groups: &MarginGroups,
    width: f64,
    height: f64,
    previous: Option<&MarginMeasurements>,
    use_max: bool,
) -> MarginMeasurements {
    let max_left_width = config.left_spec.max_pixels(width);
    let max_right_width = config.right_spec.max_pixels(width);
    let max_bottom_height = config.bottom_spec.max_pixels(height);
    let max_top_height = config.top_spec.max_pixels(height);

    let candidate_left = previous.map_or(max_left_width, |p| p.left_width);
    let candidate_right = previous.map_or(max_right_width, |p| p.right_width);
    let candidate_bottom = previous.map_or(max_bottom_height, |p| p.bottom_height);
    let candidate_top = previous.map_or(max_top_height, |p| p.top_height);

    let adjusted_height = match previous {
        Some(_) => height - candidate_bottom - candidate_top,
        None => height,
    };

    let left_sizes = strategy_for(MarginSide::Left).measure(
        &mut select_views(views, &groups.left),
        MarginConstraints {
            max_size: if use_max { max_left_width } else { candidate_left },
            cross_size: adjusted_height,
            full_cross_size: height,
        },
    );
    let left_width = left_sizes.total().max(config.left_spec.min_pixels(width));

    let right_sizes = strategy_for(MarginSide::Right).measure(
        &mut select_views(views, &groups.right),
        MarginConstraints {
            max_size: if use_max { max_right_width } else { candidate_right },
            cross_size: adjusted_height,
            full_cross_size: height,
        },
    );
    let right_width = right_sizes.total().max(config.right_spec.min_pixels(width));

    let adjusted_width = width - left_width - right_width;

    let bottom_sizes = strategy_for(MarginSide::Bottom).measure(
        &mut select_views(views, &groups.bottom),
        MarginConstraints {
            max_size: if use_max { max_bottom_height } else { candidate_bottom },
            cross_size: adjusted_width,
            full_cross_size: width,
        },
    );
    let bottom_height = bottom_sizes.total().max(config.bottom_spec.min_pixels(height));

    let top_sizes = strategy_for(MarginSide::Top).measure(
        &mut select_views(views, &groups.top),
        MarginConstraints {
            max_size: if use_max { max_top_height } else { candidate_top },
            cross_size: adjusted_width,
            full_cross_size: width,
        },
    );
    let top_height = top_sizes.total().max(config.top_spec.min_pixels(height));

    MarginMeasurements {
        left_width,
        left_sizes,
        right_width,
        right_sizes,
        top_height,
        top_sizes,
        bottom_height,
        bottom_sizes,
    }
}

fn trace_pass(pass: u8, sizes: &MarginMeasurements) {
    tracing::trace!(
        pass,
        left = sizes.left_width,
        right = sizes.right_width,
        top = sizes.top_height,
        bottom = sizes.bottom_height,
        "measured margins"
    );
}
