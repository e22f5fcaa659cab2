//! Axis limits and "nice" tick placement.

/// Step multipliers tried for every power of ten.
const NICE_STEPS: [f64; 4] = [1.0, 2.0, 2.5, 5.0];

/// Data limits padded by `margin` (a fraction of the span) on both ends.
/// A zero span is widened to one unit around the value.
pub fn padded_limits(min: f64, max: f64, margin: f64) -> (f64, f64) {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return (min - 0.5, max + 0.5);
    }
    (min - span * margin, max + span * margin)
}

/// Smallest nice step that yields at most `max_ticks` ticks over `span`.
pub fn nice_step(span: f64, max_ticks: usize) -> f64 {
    let raw = span / max_ticks.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    NICE_STEPS
        .iter()
        .map(|m| m * magnitude)
        .chain(std::iter::once(10.0 * magnitude))
        .find(|step| span / step <= max_ticks as f64)
        .unwrap_or(10.0 * magnitude)
}

/// Tick values inside `[lo, hi]`, multiples of a nice step.
pub fn ticks(lo: f64, hi: f64, max_ticks: usize) -> (Vec<f64>, f64) {
    let step = nice_step(hi - lo, max_ticks);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    let values = (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            // Avoid "-0"
            if v.abs() < step * 1e-9 {
                0.0
            } else {
                v
            }
        })
        .collect();
    (values, step)
}

/// Format a tick value with just enough decimals for the step.
pub fn format_tick(value: f64, step: f64) -> String {
    let mut decimals = 0usize;
    let mut scaled = step;
    while (scaled - scaled.round()).abs() > 1e-6 && decimals < 6 {
        scaled *= 10.0;
        decimals += 1;
    }
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_padded_limits() {
        let (lo, hi) = padded_limits(0.0, 10.0, 0.05);
        assert!((lo + 0.5).abs() < 1e-12);
        assert!((hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_padded_limits_zero_span() {
        assert_eq!(padded_limits(3.0, 3.0, 0.05), (2.5, 3.5));
    }

    #[test]
    fn test_sine_axis_ticks() {
        let (values, step) = ticks(-0.5, 10.5, 8);
        assert_eq!(step, 2.0);
        assert_eq!(values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_unit_axis_ticks() {
        let (values, step) = ticks(-1.1, 1.1, 8);
        assert!((step - 0.5).abs() < 1e-12);
        assert_eq!(values.len(), 5);
        assert_eq!(values[2], 0.0);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(2.0, 2.0), "2");
        assert_eq!(format_tick(-0.5, 0.5), "-0.5");
        assert_eq!(format_tick(0.75, 0.25), "0.75");
    }

    proptest! {
        #[test]
        fn prop_ticks_within_limits(lo in -1000.0f64..1000.0, span in 0.001f64..1000.0) {
            let hi = lo + span;
            let (values, step) = ticks(lo, hi, 8);
            prop_assert!(step > 0.0);
            prop_assert!(values.len() <= 9);
            for v in values {
                prop_assert!(v >= lo - step * 1e-6 && v <= hi + step * 1e-6);
            }
        }
    }
}
