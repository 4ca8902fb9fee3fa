//! Size and aspect-ratio constraints.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::candidate::Dimensions;

/// Number of decimal digits ratios are rounded to before comparison.
pub const RATIO_PRECISION: i32 = 5;

/// Error parsing an aspect ratio.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid aspect ratio '{input}' - expected format like '16:9' or '1.77778'")]
pub struct AspectRatioParseError {
    input: String,
}

/// An exact aspect ratio, stored rounded to [`RATIO_PRECISION`] digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    scaled: i64,
}

impl AspectRatio {
    /// Ratio of `width:height`. Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 {
            return None;
        }
        Dimensions::new(width, height).ratio().map(Self::from_f64)
    }

    /// Ratio from a decimal value.
    pub fn from_f64(value: f64) -> Self {
        let scale = 10f64.powi(RATIO_PRECISION);
        Self {
            scaled: (value * scale).round() as i64,
        }
    }

    /// Ratio of the given dimensions, or `None` for degenerate sizes.
    pub fn of(dimensions: Dimensions) -> Option<Self> {
        Self::new(dimensions.width, dimensions.height)
    }

    /// Rounded decimal value.
    pub fn value(&self) -> f64 {
        self.scaled as f64 / 10f64.powi(RATIO_PRECISION)
    }

    /// True if `dimensions` has exactly this ratio after rounding.
    pub fn matches(&self, dimensions: Dimensions) -> bool {
        Self::of(dimensions).is_some_and(|ratio| ratio == *self)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", RATIO_PRECISION as usize, self.value())
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AspectRatioParseError {
            input: s.to_string(),
        };
        let s = s.trim();

        if let Some((width, height)) = s.split_once(':') {
            let width: u32 = width.trim().parse().map_err(|_| err())?;
            let height: u32 = height.trim().parse().map_err(|_| err())?;
            return Self::new(width, height).ok_or_else(err);
        }

        let value: f64 = s.parse().map_err(|_| err())?;
        if !value.is_finite() || value <= 0.0 {
            return Err(err());
        }
        Ok(Self::from_f64(value))
    }
}

/// Optional minimum size and optional exact ratio.
///
/// Each constraint is toggled independently by being `Some`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub size: Option<Dimensions>,
    pub ratio: Option<AspectRatio>,
}

impl SelectionCriteria {
    /// Criteria with no active constraint.
    pub fn any() -> Self {
        Self::default()
    }

    /// Set the minimum size.
    pub fn with_size(mut self, size: Dimensions) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the exact aspect ratio.
    pub fn with_ratio(mut self, ratio: AspectRatio) -> Self {
        self.ratio = Some(ratio);
        self
    }

    /// True when neither constraint is active.
    pub fn is_unconstrained(&self) -> bool {
        self.size.is_none() && self.ratio.is_none()
    }

    /// Apply the size/ratio decision table to `dimensions`.
    pub fn fits(&self, dimensions: Dimensions) -> bool {
        match (self.size, self.ratio) {
            (None, None) => true,
            (Some(size), None) => dimensions.covers(&size),
            (None, Some(ratio)) => ratio.matches(dimensions),
            (Some(size), Some(ratio)) => dimensions.covers(&size) && ratio.matches(dimensions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HD: Dimensions = Dimensions::new(1920, 1080);

    fn ratio(s: &str) -> AspectRatio {
        s.parse().unwrap()
    }

    #[test]
    fn test_ratio_parse_forms_agree() {
        assert_eq!(ratio("16:9"), ratio("1.77778"));
        assert_eq!(ratio("16:9"), AspectRatio::of(FULL_HD).unwrap());
        assert_eq!(ratio("16:9").to_string(), "1.77778");
    }

    #[test]
    fn test_ratio_parse_rejects_garbage() {
        assert!("16:0".parse::<AspectRatio>().is_err());
        assert!("0:9".parse::<AspectRatio>().is_err());
        assert!("wide".parse::<AspectRatio>().is_err());
        assert!("-1.5".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_ratio_rounding_tolerates_near_matches() {
        // 2560x1440 and 1366x768 are both marketed as 16:9, only the first is exact.
        assert!(ratio("16:9").matches(Dimensions::new(2560, 1440)));
        assert!(!ratio("16:9").matches(Dimensions::new(1366, 768)));
    }

    #[test]
    fn test_decision_table_both_active() {
        let criteria = SelectionCriteria::any()
            .with_size(FULL_HD)
            .with_ratio(ratio("16:9"));
        assert!(criteria.fits(FULL_HD));
    }

    #[test]
    fn test_decision_table_size_only() {
        let criteria = SelectionCriteria::any().with_size(Dimensions::new(2560, 1440));
        assert!(!criteria.fits(FULL_HD));
        assert!(criteria.fits(Dimensions::new(3840, 2160)));
    }

    #[test]
    fn test_decision_table_ratio_only() {
        let criteria = SelectionCriteria::any().with_ratio(ratio("4:3"));
        assert!(!criteria.fits(FULL_HD));
        assert!(criteria.fits(Dimensions::new(1024, 768)));
    }

    #[test]
    fn test_decision_table_unconstrained() {
        let criteria = SelectionCriteria::any();
        assert!(criteria.is_unconstrained());
        assert!(criteria.fits(FULL_HD));
        assert!(criteria.fits(Dimensions::new(0, 0)));
    }

    #[test]
    fn test_both_active_requires_both() {
        let criteria = SelectionCriteria::any()
            .with_size(FULL_HD)
            .with_ratio(ratio("16:9"));
        // Big enough but wrong ratio.
        assert!(!criteria.fits(Dimensions::new(2560, 1600)));
        // Right ratio but too small.
        assert!(!criteria.fits(Dimensions::new(1280, 720)));
    }
}
