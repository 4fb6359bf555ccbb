//! Sliding window iteration and differencing over value slices.

/// Lazy iterator over contiguous overlapping windows of a slice.
///
/// Yields `len - width + 1` windows when `len >= width`, nothing otherwise.
/// A width of zero yields no windows.
#[derive(Debug, Clone)]
pub struct SlidingWindows<'a> {
    values: &'a [f64],
    width: usize,
    position: usize,
}

impl<'a> Iterator for SlidingWindows<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        if self.width == 0 || self.position + self.width > self.values.len() {
            return None;
        }
        let window = &self.values[self.position..self.position + self.width];
        self.position += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.width == 0 {
            0
        } else {
            (self.values.len() + 1).saturating_sub(self.width + self.position)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SlidingWindows<'_> {}

/// Iterate over overlapping windows of `width` consecutive values.
pub fn sliding_windows(values: &[f64], width: usize) -> SlidingWindows<'_> {
    SlidingWindows {
        values,
        width,
        position: 0,
    }
}

/// First difference of a series: `d[i] = x[i+1] - x[i]`.
///
/// Returns an empty vector for series shorter than two values.
pub fn first_difference(values: &[f64]) -> Vec<f64> {
    sliding_windows(values, 2).map(|w| w[1] - w[0]).collect()
}
