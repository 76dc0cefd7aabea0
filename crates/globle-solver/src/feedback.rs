//! Player feedback parsing: `<distance> <octant>`, e.g. `320km N` or `<10km SE`

use crate::direction::Direction;
use crate::selector::TargetDistance;
use crate::{Result, SolverError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One turn of game feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub distance: TargetDistance,
    pub direction: Direction,
}

/// Parse the distance token. `<10` (with or without `km`) and `0` mean close range.
pub fn parse_distance(raw: &str) -> Result<TargetDistance> {
    let token = raw.trim().to_lowercase().replace("km", "");
    let token = token.trim();
    if token == "<10" {
        return Ok(TargetDistance::Near);
    }
    let km: f64 = token
        .parse()
        .map_err(|_| SolverError::InvalidDistance(raw.to_string()))?;
    TargetDistance::from_km(km).map_err(|_| SolverError::InvalidDistance(raw.to_string()))
}

pub fn parse_feedback(text: &str) -> Result<Feedback> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let [distance, direction] = parts.as_slice() else {
        return Err(SolverError::InvalidFeedback(text.to_string()));
    };

    Ok(Feedback {
        distance: parse_distance(distance)?,
        direction: direction.parse()?,
    })
}

impl FromStr for Feedback {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        parse_feedback(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feedback() {
        let fb = parse_feedback("320km N").unwrap();
        assert_eq!(fb.distance, TargetDistance::Km(320.0));
        assert_eq!(fb.direction, Direction::N);

        let fb: Feedback = "  1250.5KM sw ".parse().unwrap();
        assert_eq!(fb.distance, TargetDistance::Km(1250.5));
        assert_eq!(fb.direction, Direction::SW);
    }

    #[test]
    fn test_close_range_forms() {
        for text in ["<10km SE", "<10 SE", "<10KM se", "0km SE", "0 SE"] {
            let fb = parse_feedback(text).unwrap();
            assert_eq!(fb.distance, TargetDistance::Near, "{text}");
            assert_eq!(fb.direction, Direction::SE);
        }
    }

    #[test]
    fn test_invalid_feedback() {
        assert!(matches!(
            parse_feedback("320km"),
            Err(SolverError::InvalidFeedback(_))
        ));
        assert!(matches!(
            parse_feedback("320 km N"),
            Err(SolverError::InvalidFeedback(_))
        ));
        assert!(matches!(
            parse_feedback("far N"),
            Err(SolverError::InvalidDistance(_))
        ));
        assert!(matches!(
            parse_feedback("-20km N"),
            Err(SolverError::InvalidDistance(_))
        ));
        assert!(matches!(
            parse_feedback("320km NNW"),
            Err(SolverError::InvalidDirection(_))
        ));
    }
}
