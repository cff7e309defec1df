//! Control-value schedules.

use serde::{Deserialize, Serialize};

/// How control values are spread over `(0, 1]`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlSpacing {
    /// `nc_i = (i + 1) / (steps + 1)`; never reaches 1.
    #[default]
    Exclusive,
    /// `linspace` with the endpoint kept, so the last value is exactly 1.
    Inclusive,
}

/// Returns the control value for every step.
///
/// Values follow NumPy's `linspace(1 / (steps + 1), 1, steps, endpoint)`
/// arithmetic, with `endpoint` false for [`ControlSpacing::Exclusive`].
///
/// # Examples
/// ```
/// use isosweep_core::{ControlSpacing, control_values};
///
/// assert_eq!(control_values(3, ControlSpacing::Exclusive), vec![0.25, 0.5, 0.75]);
/// assert_eq!(control_values(3, ControlSpacing::Inclusive), vec![0.25, 0.625, 1.0]);
/// assert!(control_values(0, ControlSpacing::Exclusive).is_empty());
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "control values are evenly spaced floats"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "step counts are far below the f64 mantissa limit"
)]
pub fn control_values(steps: usize, spacing: ControlSpacing) -> Vec<f64> {
    if steps == 0 {
        return Vec::new();
    }
    let start = 1.0 / (steps as f64 + 1.0);
    let delta = 1.0 - start;
    let divisions = match spacing {
        ControlSpacing::Exclusive => steps,
        ControlSpacing::Inclusive => steps - 1,
    };
    if divisions == 0 {
        return vec![start];
    }
    let step = delta / divisions as f64;
    let mut values: Vec<f64> = (0..steps).map(|index| index as f64 * step + start).collect();
    if spacing == ControlSpacing::Inclusive {
        if let Some(last) = values.last_mut() {
            *last = 1.0;
        }
    }
    values
}
