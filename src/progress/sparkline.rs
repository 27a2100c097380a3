use crate::foundation::error::{FadioError, FadioResult};

/// Block characters from empty to full, used by the CLI progress line.
pub const DEFAULT_LEVELS: &str = " ▁▂▃▄▅▆▇█";

/// Render one character per weight, scaled between the smallest and largest weight.
///
/// The smallest weight maps to `levels[0]` and the largest to the last level. When every weight
/// is equal the whole line renders at the lowest level.
pub fn render_sparkline(weights: &[f64], levels: &[char]) -> FadioResult<String> {
    let Some(&lowest) = levels.first() else {
        return Err(FadioError::configuration(
            "sparkline needs at least one level character",
        ));
    };

    let (min, max) = weights
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| {
            (lo.min(w), hi.max(w))
        });
    let span = max - min;
    if !(span.is_finite() && span > 0.0) {
        return Ok(std::iter::repeat_n(lowest, weights.len()).collect());
    }

    let top = levels.len() - 1;
    Ok(weights
        .iter()
        .map(|&w| {
            let norm = (w - min) / span;
            let level = ((norm * top as f64).floor() as usize).min(top);
            levels[level]
        })
        .collect())
}

/// [`render_sparkline`] with [`DEFAULT_LEVELS`].
pub fn render_default_sparkline(weights: &[f64]) -> String {
    let levels: Vec<char> = DEFAULT_LEVELS.chars().collect();
    render_sparkline(weights, &levels).unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/progress/sparkline.rs"]
mod tests;
