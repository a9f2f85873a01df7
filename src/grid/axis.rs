/// Sample coordinates along one grid axis.
///
/// Samples run from `min` to `max` inclusive with a constant step. An axis
/// with a single sample has step `0` and sits at `min`.
#[derive(Debug, Clone)]
pub struct GridAxis {
    coords: Vec<f64>,
    step: f64,
}

impl GridAxis {
    /// Lays out `samples` coordinates from `min` to `max`.
    ///
    /// `samples` must be at least 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(min: f64, max: f64, samples: usize) -> Self {
        debug_assert!(samples >= 1);
        let step = if samples <= 1 {
            0.0
        } else {
            (max - min) / (samples - 1) as f64
        };
        let mut coords: Vec<f64> = (0..samples).map(|i| min + i as f64 * step).collect();
        // Pin the last sample so the far corner maps exactly.
        if samples > 1 {
            if let Some(last) = coords.last_mut() {
                *last = max;
            }
        }
        Self { coords, step }
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Always `false`; an axis has at least one sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Distance between adjacent samples.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Coordinate of sample `i`. Panics if `i` is out of range.
    #[must_use]
    pub fn coord(&self, i: usize) -> f64 {
        self.coords[i]
    }

    /// Largest index whose coordinate is `<= value`, or 0 below the axis.
    #[must_use]
    pub fn floor_index(&self, value: f64) -> usize {
        self.coords.partition_point(|&c| c <= value).saturating_sub(1)
    }

    /// Smallest index whose coordinate is `>= value`, or the last index above
    /// the axis.
    #[must_use]
    pub fn ceil_index(&self, value: f64) -> usize {
        self.coords
            .partition_point(|&c| c < value)
            .min(self.coords.len() - 1)
    }
}
