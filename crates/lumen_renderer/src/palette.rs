//! Named colours used by debug kernels and demo scenes.

use crate::Color;

pub const WHITE: Color = Color::new(0.73, 0.73, 0.73);
pub const GREY: Color = Color::new(0.6, 0.6, 0.6);
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
pub const RED: Color = Color::new(0.65, 0.05, 0.05);
pub const GREEN: Color = Color::new(0.12, 0.45, 0.15);
pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
pub const WHITE_BLUE: Color = Color::new(0.5, 0.7, 1.0);
pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);
pub const COPPER: Color = Color::new(0.72, 0.45, 0.2);
pub const STEEL: Color = Color::new(0.44, 0.47, 0.49);
pub const SILVER: Color = Color::new(0.32, 0.34, 0.34);
pub const GOLD: Color = Color::new(1.0, 0.84, 0.0);

/// Every named colour, indexed by the faces kernel.
pub const ALL: [Color; 12] = [
    WHITE, GREY, BLACK, RED, GREEN, BLUE, WHITE_BLUE, YELLOW, COPPER, STEEL, SILVER, GOLD,
];
