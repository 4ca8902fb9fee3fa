//! Wallpaper qualification and choice.
//!
//! [`SelectionCriteria`] is the single size/ratio decision table, used both
//! as a pre-download hint on declared dimensions and by [`SelectionFilter`]
//! on decoded dimensions. [`Chooser`] picks the final wallpaper.

mod chooser;
mod criteria;
mod filter;

pub use chooser::Chooser;
pub use criteria::{AspectRatio, AspectRatioParseError, SelectionCriteria, RATIO_PRECISION};
pub use filter::{stored_dimensions, SelectionError, SelectionFilter};
