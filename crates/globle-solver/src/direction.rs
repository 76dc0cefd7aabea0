//! Compass octants and the two bearing classifiers
//!
//! Border and centroid directions round bearings differently and the game's
//! answers depend on which one is used, so both rules are kept side by side.

use crate::{Result, SolverError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 8 compass octants, each spanning 45 degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Octants in clockwise order starting at north
pub const DIRECTIONS: [Direction; 8] = [
    Direction::N,
    Direction::NE,
    Direction::E,
    Direction::SE,
    Direction::S,
    Direction::SW,
    Direction::W,
    Direction::NW,
];

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        }
    }

    /// Position in [`DIRECTIONS`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The octant pointing the other way
    pub fn opposite(&self) -> Self {
        DIRECTIONS[(self.index() + 4) % 8]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        DIRECTIONS
            .iter()
            .copied()
            .find(|d| d.as_str() == upper)
            .ok_or_else(|| SolverError::InvalidDirection(s.to_string()))
    }
}

/// Classify a border-derived bearing: `round(bearing / 45) mod 8`.
///
/// Rounds half to even, so 22.5 maps to N while 67.5 maps to E.
pub fn classify_border_bearing(bearing: f64) -> Direction {
    let index = (bearing / 45.0).round_ties_even() as i64;
    DIRECTIONS[index.rem_euclid(8) as usize]
}

/// Classify a centroid-derived bearing: `floor(((bearing + 22.5) mod 360) / 45)`.
pub fn classify_centroid_bearing(bearing: f64) -> Direction {
    let shifted = (bearing + 22.5).rem_euclid(360.0);
    let index = (shifted / 45.0).floor() as usize;
    DIRECTIONS[index % 8]
}
