//! Linear and time scales shared by drawing and gesture inversion
//!
//! Every view that draws in pixel space builds its scales here, and the brush
//! machines invert through the very same mappings. Tick and `nice` rules follow
//! the usual 1-2-5 decade stepping.

use chrono::{DateTime, Utc};
use eframe::egui::{Pos2, Rect};

/// Invertible affine map from a numeric domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Domain value to pixel
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Pixel to domain value
    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Extend the domain outward to round tick values. A zero-width domain is
    /// widened by one unit on each side first.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut lo, mut hi) = self.domain;
        let reversed = hi < lo;
        if reversed {
            std::mem::swap(&mut lo, &mut hi);
        }
        if lo == hi {
            lo -= 1.0;
            hi += 1.0;
        }

        let mut previous = 0.0;
        for _ in 0..10 {
            let step = tick_step(lo, hi, count);
            if step == previous || !step.is_finite() || step <= 0.0 {
                break;
            }
            lo = snap(lo, step, f64::floor);
            hi = snap(hi, step, f64::ceil);
            previous = step;
        }

        self.domain = if reversed { (hi, lo) } else { (lo, hi) };
        self
    }

    /// Round tick values inside the domain, roughly `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (a, b) = self.domain;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if lo == hi {
            return vec![lo];
        }
        let step = tick_step(lo, hi, count);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }
        if step < 1.0 {
            // Divide by the integer inverse so 0.1-style steps stay exact
            let inverse = (1.0 / step).round();
            let first = (lo * inverse).ceil() as i64;
            let last = (hi * inverse).floor() as i64;
            (first..=last).map(|k| k as f64 / inverse).collect()
        } else {
            let first = (lo / step).ceil() as i64;
            let last = (hi / step).floor() as i64;
            (first..=last).map(|k| k as f64 * step).collect()
        }
    }
}

/// Round `value` to a multiple of `step` with `round` (floor or ceil)
fn snap(value: f64, step: f64, round: fn(f64) -> f64) -> f64 {
    if step < 1.0 {
        let inverse = (1.0 / step).round();
        round(value * inverse) / inverse
    } else {
        round(value / step) * step
    }
}

/// 1, 2 or 5 times a power of ten, close to `(hi - lo) / count`
pub fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo).abs() / count.max(1) as f64;
    let power = 10f64.powi(raw.log10().floor() as i32);
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    power * factor
}

/// Linear scale over instants, in epoch seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new((to_seconds(domain.0), to_seconds(domain.1)), range),
        }
    }

    pub fn apply(&self, t: DateTime<Utc>) -> f64 {
        self.inner.apply(to_seconds(t))
    }

    pub fn invert(&self, pixel: f64) -> DateTime<Utc> {
        from_seconds(self.inner.invert(pixel))
    }

    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }
}

pub fn to_seconds(t: DateTime<Utc>) -> f64 {
    t.timestamp_millis() as f64 / 1000.0
}

/// Millisecond precision, clamped to chrono's representable range
pub fn from_seconds(seconds: f64) -> DateTime<Utc> {
    let millis = (seconds * 1000.0).round();
    DateTime::from_timestamp_millis(millis as i64).unwrap_or(if millis < 0.0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Longitude/latitude to canvas pixels. Latitude grows upward while pixel y
/// grows downward, so the latitude range runs bottom to top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjection {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl GeoProjection {
    /// Niced scales over the given extents, mapped into `plot_rect`
    pub fn new(lon_extent: (f64, f64), lat_extent: (f64, f64), plot_rect: Rect, tick_count: usize) -> Self {
        let x = LinearScale::new(lon_extent, (0.0, 1.0)).nice(tick_count);
        let y = LinearScale::new(lat_extent, (0.0, 1.0)).nice(tick_count);
        Self {
            x: LinearScale::new(x.domain(), (plot_rect.left() as f64, plot_rect.right() as f64)),
            y: LinearScale::new(y.domain(), (plot_rect.bottom() as f64, plot_rect.top() as f64)),
        }
    }

    pub fn project(&self, longitude: f64, latitude: f64) -> Pos2 {
        Pos2::new(self.x.apply(longitude) as f32, self.y.apply(latitude) as f32)
    }
}
