/// Evenly spaced samples of a falloff curve over `[0, range]`.
///
/// Lookups interpolate linearly between the two bracketing samples and return
/// zero at or beyond `range`.
#[derive(Clone, Debug)]
pub struct DistanceLut {
    samples: Vec<f32>,
    range: f32,
    inv_step: f32,
}

impl DistanceLut {
    pub const DEFAULT_SIZE: usize = 2048;

    pub fn build(size: usize, range: f32, f: impl Fn(f32) -> f32) -> Self {
        let size = size.max(2);
        let range = range.max(f32::EPSILON);
        let step = range / (size - 1) as f32;
        let samples = (0..size).map(|i| f(i as f32 * step)).collect();
        Self {
            samples,
            range,
            inv_step: 1.0 / step,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn range(&self) -> f32 {
        self.range
    }

    #[inline]
    pub fn sample(&self, d: f32) -> f32 {
        if d >= self.range || d.is_nan() {
            return 0.0;
        }
        let t = d.max(0.0) * self.inv_step;
        let i = t as usize;
        let last = self.samples.len() - 1;
        if i >= last {
            return self.samples[last];
        }
        let frac = t - i as f32;
        let a = self.samples[i];
        let b = self.samples[i + 1];
        a + (b - a) * frac
    }
}
