//! To maintain a theme of colors, colors are added here as constants so
//! the UI does not look bad at any point.
//!
//! - MINISQL_TEAL: Main Color

use colored::Color;

pub(crate) const MINISQL_TEAL: Color = Color::TrueColor {
    r: 64,
    g: 190,
    b: 176,
};
