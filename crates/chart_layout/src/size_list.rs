//! Per-view size records for one chart margin

/// Ordered sizes of the views in one margin, with a running total
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeList {
    sizes: Vec<f64>,
    total: f64,
}

impl SizeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the view at `index`
    pub fn get(&self, index: usize) -> Option<f64> {
        self.sizes.get(index).copied()
    }

    /// Sum of all sizes
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.sizes.iter().copied()
    }

    /// Append a size
    pub fn add(&mut self, size: f64) {
        self.sizes.push(size);
        self.total += size;
    }

    /// Change the size at `index` by `amount`. Out of range indices are ignored.
    pub fn adjust(&mut self, index: usize, amount: f64) {
        if let Some(size) = self.sizes.get_mut(index) {
            *size += amount;
            self.total += amount;
        }
    }
}

/// Preferred and minimum sizes of the views in one margin, in position order.
#[derive(Debug, Clone, Default)]
pub struct DesiredViewSizes {
    preferred: SizeList,
    minimum: SizeList,
}

impl DesiredViewSizes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the next view's sizes
    pub fn add(&mut self, preferred: f64, minimum: f64) {
        self.preferred.add(preferred);
        self.minimum.add(minimum);
    }

    pub fn preferred(&self) -> &SizeList {
        &self.preferred
    }

    pub fn minimum(&self) -> &SizeList {
        &self.minimum
    }

    /// Shrink the preferred sizes so their total fits within `max_size`.
    ///
    /// Views added last (furthest from the draw area) give up space first,
    /// down to their minimum, before any earlier view is touched. If even the
    /// minimums do not fit, every view ends at its minimum.
    pub fn adjust_to(&mut self, max_size: f64) {
        if max_size >= self.preferred.total() {
            return;
        }

        let mut delta = self.preferred.total() - max_size;
        for index in (0..self.preferred.len()).rev() {
            let preferred = self.preferred.get(index).unwrap_or_default();
            let minimum = self.minimum.get(index).unwrap_or_default();
            let available = preferred - minimum;

            if available < delta {
                self.preferred.adjust(index, -available);
                delta -= available;
            } else {
                self.preferred.adjust(index, -delta);
                return;
            }
        }
    }

    /// The (possibly adjusted) preferred sizes
    pub fn into_preferred(self) -> SizeList {
        self.preferred
    }
}
