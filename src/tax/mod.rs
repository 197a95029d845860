pub mod brackets;
pub mod country;
pub mod overlay;

pub use brackets::{Bracket, BracketError, BracketSchedule, Progression, Slab};
pub use country::{us_federal_brackets, Country, LocalTax};
pub use overlay::{apply_overlay, OverlayParams, OverlayResult};
