//! Globle Next-Guess Solver
//!
//! Narrows a hidden country from the feedback of a geography deduction game.
//! Each turn the player reports how far (in km) and in which compass octant the
//! target lies from the previous guess; the solver picks the country that best
//! matches that report.
//!
//! # Selection Model
//!
//! ```text
//! distance < 10 km  -> neighbours of the current country, filtered by centroid octant
//! otherwise         -> [border pass, centroid fallback pass], first non-empty wins
//!                      each pass minimises |border_km(current, c) - target_km|
//! ```
//!
//! | Pass     | Direction source                      | Octant rounding          |
//! |----------|---------------------------------------|--------------------------|
//! | Border   | nearest boundary points, planar atan2 | `round(b / 45) mod 8`    |
//! | Centroid | centroid to centroid, spherical bearing | `floor((b + 22.5) / 45)` |
//!
//! Both passes score distance on the border-to-border metric, bucketed to 10 km.

use serde::Serialize;
use thiserror::Error;

pub mod adjacency;
pub mod dataset;
pub mod direction;
pub mod feedback;
pub mod geometry;
pub mod loader;
pub mod report;
pub mod selector;
pub mod session;
pub mod vocabulary;

pub use dataset::{CountryDataset, CountryEntry, Dataset};
pub use direction::Direction;
pub use feedback::Feedback;
pub use geometry::{GeoPoint, Shape};
pub use loader::LoaderConfig;
pub use selector::{select_next, GuessQuery, GuessResult, NoResultReason, TargetDistance};
pub use session::GameSession;

/// Degree-to-km scale used by the border metric (distance_deg * 100 / 10, bucketed)
pub const KM_SCALE: f64 = 100.0 / 10.0;

/// Width of a distance bucket in km
pub const KM_BUCKET: f64 = 10.0;

/// Reported distances below this many km are the close-range case
pub const NEAR_THRESHOLD_KM: f64 = 10.0;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("Country not found: {0}")]
    NotFound(String),
    #[error("Duplicate country in dataset: {0}")]
    DuplicateCountry(String),
    #[error("Empty geometry for {0}")]
    EmptyGeometry(String),
    #[error("Invalid geometry for {0}: {1}")]
    InvalidGeometry(String, String),
    #[error("Invalid direction '{0}'. Use N, NE, E, SE, S, SW, W, or NW")]
    InvalidDirection(String),
    #[error("Invalid distance '{0}'. Use a number or '<10km'")]
    InvalidDistance(String),
    #[error("Invalid feedback '{0}'. Use a format like '320km N' or '<10km SE'")]
    InvalidFeedback(String),
    #[error("No current guess; start a new game first")]
    NoActiveGuess,
    #[error("No usable countries in dataset")]
    NoCountries,
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Title-case a normalized country name for display.
///
/// Every letter that follows a non-letter is upper-cased, so
/// `guinea-bissau` becomes `Guinea-Bissau`.
pub fn display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Selection outcome paired with the display form of its names
#[derive(Debug, Clone, Serialize)]
pub struct DisplayResult {
    pub names: Vec<String>,
    pub message: String,
}

impl DisplayResult {
    pub fn from_result(result: &GuessResult, current: &str, direction: Direction) -> Self {
        match result {
            GuessResult::Country(name) => Self {
                names: vec![display_name(name)],
                message: format!("Try this country: {}", display_name(name)),
            },
            GuessResult::Candidates(names) => Self {
                names: names.iter().map(|n| display_name(n)).collect(),
                message: "Since the distance is <10km, country could be one of these:".to_string(),
            },
            GuessResult::NoResult(NoResultReason::NoNeighbors) => Self {
                names: Vec::new(),
                message: format!(
                    "No neighboring countries found for '{}'.",
                    display_name(current)
                ),
            },
            GuessResult::NoResult(NoResultReason::NoNeighborInDirection) => Self {
                names: Vec::new(),
                message: format!(
                    "No bordering countries found to the {} of '{}' within <10km.",
                    direction,
                    display_name(current)
                ),
            },
            GuessResult::NoResult(NoResultReason::NoDirectionalMatch) => Self {
                names: Vec::new(),
                message: "Couldn't find a suitable next guess. Please check the inputs."
                    .to_string(),
            },
        }
    }
}
