//! Continuous scales mapping data values to pixels.

use serde::{Deserialize, Serialize};

/// Min and max of the finite values in `values`.
///
/// `NaN` compares false to everything, so it must be dropped before the
/// reduction; otherwise a single malformed record would poison the extent.
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    (lo <= hi).then_some((lo, hi))
}

/// Max of the finite values in `values`.
pub fn max_finite<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    extent(values).map(|(_, hi)| hi)
}

/// Monotonic linear map from a domain interval onto a pixel interval.
///
/// The range may be inverted (`range.0 > range.1`), as for a y axis that
/// grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// True when the domain has zero width and every value maps to the
    /// start of the range.
    pub fn is_degenerate(&self) -> bool {
        self.domain.1 == self.domain.0
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if self.is_degenerate() {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 || self.is_degenerate() {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Clamp a pixel coordinate into the range, whichever way it runs.
    pub fn clamp_pixel(&self, pixel: f64) -> f64 {
        let (r0, r1) = self.range;
        pixel.clamp(r0.min(r1), r0.max(r1))
    }

    /// Evenly spaced "nice" tick values covering the domain, about `count`
    /// of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if !(lo.is_finite() && hi.is_finite()) {
            return Vec::new();
        }
        if hi == lo {
            return vec![lo];
        }
        let step = nice_step((hi - lo) / count.max(1) as f64);
        let first = (lo / step).ceil() * step;
        let mut ticks = Vec::new();
        let mut i = 0.0;
        loop {
            let t = first + i * step;
            if t > hi + step * 1e-9 {
                break;
            }
            ticks.push(t);
            i += 1.0;
        }
        ticks
    }
}

/// Square-root scale: area, not radius, grows linearly with the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqrtScale {
    inner: LinearScale,
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new((signed_sqrt(domain.0), signed_sqrt(domain.1)), range),
        }
    }

    pub fn map(&self, value: f64) -> f64 {
        self.inner.map(signed_sqrt(value))
    }
}

fn signed_sqrt(v: f64) -> f64 {
    if v < 0.0 { -(-v).sqrt() } else { v.sqrt() }
}

/// Round `raw` up to 1, 2, 5 or 10 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10.0_f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
