//! Chart Layout - Margin allocation and placement for chart components
//!
//! This crate lays out the visual regions of a chart:
//! - Measuring axes, legends, titles and annotations against margin budgets
//! - Resolving over-subscribed margins by shrinking the outermost views first
//! - Converging the margin sizes over up to three measurement passes
//! - Placing every view into a concrete pixel rectangle around the draw area
//!
//! Concrete views implement [`LayoutView`]; the owning chart adds them to a
//! [`LayoutManager`] and calls `measure` followed by `layout` on every resize.

mod error;
mod geometry;
mod manager;
mod margin_spec;
mod size_list;
mod strategy;
mod view;

pub use error::*;
pub use geometry::*;
pub use manager::*;
pub use margin_spec::*;
pub use size_list::*;
pub use strategy::*;
pub use view::*;
