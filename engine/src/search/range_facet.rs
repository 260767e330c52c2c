//! Range facet bounds and slider updates.

use anyhow::bail;
use common::search_result::FacetBucket;

/// Min/max over the numeric bucket keys actually present after filtering,
/// never a configured bound. `None` when nothing numeric is present.
pub fn present_bounds(buckets: &[FacetBucket]) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for bucket in buckets {
        let Ok(value) = bucket.key.parse::<f64>() else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            None => (value, value),
            Some((min, max)) => (min.min(value), max.max(value)),
        });
    }
    bounds
}

/// Clamp a requested range to the present bounds and snap both ends to the
/// facet step. An inverted or non-numeric request is rejected outright so a
/// half-applied selection never reaches the filter state.
pub fn clamp_to_step(
    requested: (f64, f64),
    bounds: (f64, f64),
    step: f64,
) -> anyhow::Result<(f64, f64)> {
    let (req_min, req_max) = requested;
    if !req_min.is_finite() || !req_max.is_finite() {
        bail!("range bounds must be numeric, got [{req_min}, {req_max}]");
    }
    if req_min > req_max {
        bail!("range bounds are inverted: [{req_min}, {req_max}]");
    }
    let (lo, hi) = bounds;
    let step = if step.is_finite() && step > 0.0 { step } else { 1.0 };
    // snapping can land outside the bounds, so clamp again after rounding
    let snap = |v: f64| ((v / step).round() * step).clamp(lo, hi);
    Ok((snap(req_min.clamp(lo, hi)), snap(req_max.clamp(lo, hi))))
}
