//! Next-guess selection
//!
//! Close-range reports go through border adjacency. Everything else runs the
//! ordered pass list [`PASS_ORDER`]; the first pass that finds any candidate in
//! the reported octant decides the answer.

use crate::adjacency::neighbors_of;
use crate::dataset::CountryDataset;
use crate::direction::{classify_border_bearing, classify_centroid_bearing, Direction};
use crate::geometry::{bearing_between, border_direction, border_distance_km, centroid_of, Shape};
use crate::{Result, SolverError, NEAR_THRESHOLD_KM};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Reported distance to the hidden country
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDistance {
    /// Under 10 km: the hidden country borders the current one
    Near,
    Km(f64),
}

impl TargetDistance {
    /// Zero counts as the close-range case; negative or non-finite is rejected.
    pub fn from_km(km: f64) -> Result<Self> {
        if !km.is_finite() || km < 0.0 {
            return Err(SolverError::InvalidDistance(km.to_string()));
        }
        if km == 0.0 {
            Ok(TargetDistance::Near)
        } else {
            Ok(TargetDistance::Km(km))
        }
    }

    fn validated(self) -> Result<Self> {
        match self {
            TargetDistance::Near => Ok(self),
            TargetDistance::Km(km) => Self::from_km(km),
        }
    }
}

impl fmt::Display for TargetDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetDistance::Near => write!(f, "<{}km", NEAR_THRESHOLD_KM),
            TargetDistance::Km(km) => write!(f, "{}km", km),
        }
    }
}

/// Input to [`select_next`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessQuery {
    pub current_country: String,
    pub target_distance: TargetDistance,
    pub target_direction: Direction,
}

impl GuessQuery {
    pub fn new(
        current_country: impl Into<String>,
        target_distance: TargetDistance,
        target_direction: Direction,
    ) -> Self {
        Self {
            current_country: current_country.into(),
            target_distance,
            target_direction,
        }
    }
}

/// Why a selection produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoResultReason {
    NoNeighbors,
    NoNeighborInDirection,
    NoDirectionalMatch,
}

impl NoResultReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoResultReason::NoNeighbors => "no neighbors",
            NoResultReason::NoNeighborInDirection => "no directional match among neighbors",
            NoResultReason::NoDirectionalMatch => "no directional match",
        }
    }
}

impl fmt::Display for NoResultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GuessResult {
    /// Best single next guess
    Country(String),
    /// Close-range neighbours in the reported octant (never empty)
    Candidates(Vec<String>),
    NoResult(NoResultReason),
}

impl GuessResult {
    /// Every country name carried by the result; empty for `NoResult`
    pub fn names(&self) -> Vec<&str> {
        match self {
            GuessResult::Country(name) => vec![name.as_str()],
            GuessResult::Candidates(names) => names.iter().map(String::as_str).collect(),
            GuessResult::NoResult(_) => Vec::new(),
        }
    }

    pub fn reason(&self) -> Option<NoResultReason> {
        match self {
            GuessResult::NoResult(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// One scan over the roster; passes differ only in how they derive direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPass {
    /// Nearest boundary points, half-even octant rounding
    Border,
    /// Centroid bearing, floor octant rounding
    CentroidFallback,
}

/// Passes in evaluation order
pub const PASS_ORDER: [SelectionPass; 2] = [SelectionPass::Border, SelectionPass::CentroidFallback];

impl SelectionPass {
    pub fn direction(&self, current: &Shape, candidate: &Shape) -> Direction {
        match self {
            SelectionPass::Border => classify_border_bearing(border_direction(current, candidate)),
            SelectionPass::CentroidFallback => classify_centroid_bearing(bearing_between(
                centroid_of(current),
                centroid_of(candidate),
            )),
        }
    }
}

/// Best candidate found by a pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassMatch<'a> {
    pub name: &'a str,
    pub distance_km: f64,
    pub distance_diff: f64,
}

/// Scan every other country in `pass`'s octant and keep the one whose border
/// distance is closest to `target_km`. Ties keep the earlier entry.
pub fn run_pass<'a, D>(
    pass: SelectionPass,
    current_name: &str,
    current: &Shape,
    target_km: f64,
    target_direction: Direction,
    dataset: &'a D,
) -> Option<PassMatch<'a>>
where
    D: CountryDataset + ?Sized,
{
    let mut best: Option<PassMatch<'a>> = None;
    let mut matched = 0usize;

    for entry in dataset.entries() {
        if entry.name == current_name {
            continue;
        }
        if pass.direction(current, &entry.shape) != target_direction {
            continue;
        }

        matched += 1;
        let distance_km = border_distance_km(current, &entry.shape);
        let distance_diff = (distance_km - target_km).abs();
        if best
            .as_ref()
            .map_or(true, |b| distance_diff < b.distance_diff)
        {
            best = Some(PassMatch {
                name: entry.name.as_str(),
                distance_km,
                distance_diff,
            });
        }
    }

    debug!(
        "{:?} pass: {} countries to the {} of {}",
        pass, matched, target_direction, current_name
    );
    best
}

/// Neighbours of the current country whose centroid lies in `direction`
fn select_neighbors<D>(
    current: &Shape,
    direction: Direction,
    dataset: &D,
) -> GuessResult
where
    D: CountryDataset + ?Sized,
{
    let neighbors = neighbors_of(current, dataset);
    if neighbors.is_empty() {
        return GuessResult::NoResult(NoResultReason::NoNeighbors);
    }

    let origin = centroid_of(current);
    let matching: Vec<String> = neighbors
        .into_iter()
        .filter(|n| {
            classify_centroid_bearing(bearing_between(origin, centroid_of(&n.shape))) == direction
        })
        .map(|n| n.name.clone())
        .collect();

    if matching.is_empty() {
        GuessResult::NoResult(NoResultReason::NoNeighborInDirection)
    } else {
        GuessResult::Candidates(matching)
    }
}

/// Pick the next guess for a reported distance and direction.
///
/// Fails only when the current country is not in `dataset` or the distance is
/// malformed; an empty search is a [`GuessResult::NoResult`].
pub fn select_next<D>(query: &GuessQuery, dataset: &D) -> Result<GuessResult>
where
    D: CountryDataset + ?Sized,
{
    let current = dataset.lookup(&query.current_country)?;
    let direction = query.target_direction;

    let target_km = match query.target_distance.validated()? {
        TargetDistance::Near => {
            let result = select_neighbors(current, direction, dataset);
            info!(
                "Close-range guess from {} toward {}: {:?}",
                query.current_country, direction, result
            );
            return Ok(result);
        }
        TargetDistance::Km(km) => km,
    };

    for pass in PASS_ORDER {
        if let Some(found) = run_pass(
            pass,
            &query.current_country,
            current,
            target_km,
            direction,
            dataset,
        ) {
            info!(
                "Next guess {} ({:?} pass, {:.0}km vs {:.0}km reported)",
                found.name, pass, found.distance_km, target_km
            );
            return Ok(GuessResult::Country(found.name.to_string()));
        }
    }

    info!(
        "No country to the {} of {}",
        direction, query.current_country
    );
    Ok(GuessResult::NoResult(NoResultReason::NoDirectionalMatch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CountryEntry, Dataset};
    use crate::geometry::fixtures::{multi, rect, square};
    use crate::geometry::GeoPoint;

    fn query(current: &str, distance: TargetDistance, direction: Direction) -> GuessQuery {
        GuessQuery::new(current, distance, direction)
    }

    #[test]
    fn test_selects_country_due_north() {
        let dataset = Dataset::new(vec![
            CountryEntry::new("a", square(0.0, 0.0, 0.5)),
            CountryEntry::new("b", rect(-0.5, 30.5, 0.5, 31.5)),
            CountryEntry::new("c", rect(-0.5, -31.5, 0.5, -30.5)),
        ])
        .unwrap();

        let result = select_next(&query("a", TargetDistance::Km(3000.0), Direction::N), &dataset)
            .unwrap();
        assert_eq!(result, GuessResult::Country("b".to_string()));
    }

    #[test]
    fn test_prefers_closest_distance() {
        let dataset = Dataset::new(vec![
            CountryEntry::new("a", square(0.0, 0.0, 0.5)),
            CountryEntry::new("near", rect(-0.5, 5.5, 0.5, 6.5)),
            CountryEntry::new("mid", rect(-0.5, 20.5, 0.5, 21.5)),
            CountryEntry::new("far", rect(-0.5, 40.5, 0.5, 41.5)),
        ])
        .unwrap();

        let result = select_next(&query("a", TargetDistance::Km(2100.0), Direction::N), &dataset)
            .unwrap();
        assert_eq!(result, GuessResult::Country("mid".to_string()));
    }

    #[test]
    fn test_ties_keep_first_entry() {
        let dataset = Dataset::new(vec![
            CountryEntry::new("a", square(0.0, 0.0, 0.5)),
            CountryEntry::new("first", rect(-0.5, 10.5, 0.5, 11.5)),
            CountryEntry::new("second", rect(-0.5, 30.5, 0.5, 31.5)),
        ])
        .unwrap();

        // 1000km and 3000km are both 1000km off
        let result = select_next(&query("a", TargetDistance::Km(2000.0), Direction::N), &dataset)
            .unwrap();
        assert_eq!(result, GuessResult::Country("first".to_string()));
    }

    #[test]
    fn test_never_returns_current_country() {
        let dataset = Dataset::new(vec![
            CountryEntry::new("a", square(0.0, 0.0, 0.5)),
            CountryEntry::new("b", rect(-0.5, 10.5, 0.5, 11.5)),
        ])
        .unwrap();

        for direction in crate::direction::DIRECTIONS {
            let result =
                select_next(&query("a", TargetDistance::Km(0.5), direction), &dataset).unwrap();
            assert!(!result.names().contains(&"a"));
        }
    }

    #[test]
    fn test_border_pass_wins_over_centroid_fallback() {
        // "split" is NE of "a" by its nearest border points but its centroid is
        // due east, and its border distance matches the report exactly. "east"
        // is E on the border pass, so the centroid fallback is never consulted.
        let dataset = Dataset::new(vec![
            CountryEntry::new("a", square(0.0, 0.0, 0.5)),
            CountryEntry::new("split", multi(&[(1.5, 1.5, 2.5, 2.5), (9.5, -2.5, 10.5, -1.5)])),
            CountryEntry::new("east", rect(20.5, -0.5, 21.5, 0.5)),
        ])
        .unwrap();

        let a = dataset.lookup("a").unwrap();
        let split = dataset.lookup("split").unwrap();
        assert_eq!(SelectionPass::Border.direction(a, split), Direction::NE);
        assert_eq!(
            SelectionPass::CentroidFallback.direction(a, split),
            Direction::E
        );
        assert_eq!(border_distance_km(a, split), 140.0);

        let result = select_next(&query("a", TargetDistance::Km(140.0), Direction::E), &dataset)
            .unwrap();
        assert_eq!(result, GuessResult::Country("east".to_string()));
    }

    #[test]
    fn test_centroid_fallback_when_border_pass_empty() {
        // Nearest border points of "wide" lie due north (N on the border pass),
        // while its centroid sits to the NE.
        let dataset = Dataset::new(vec![
            CountryEntry::new("a", square(0.0, 0.0, 0.5)),
            CountryEntry::new("wide", rect(-0.5, 5.0, 12.0, 6.0)),
        ])
        .unwrap();

        let a = dataset.lookup("a").unwrap();
        let wide = dataset.lookup("wide").unwrap();
        assert_eq!(SelectionPass::Border.direction(a, wide), Direction::N);
        assert_eq!(
            SelectionPass::CentroidFallback.direction(a, wide),
            Direction::NE
        );

        let result = select_next(&query("a", TargetDistance::Km(450.0), Direction::NE), &dataset)
            .unwrap();
        assert_eq!(result, GuessResult::Country("wide".to_string()));
    }

    #[test]
    fn test_no_directional_match() {
        let dataset = Dataset::new(vec![
            CountryEntry::new("a", square(0.0, 0.0, 0.5)),
            CountryEntry::new("b", rect(-0.5, 10.5, 0.5, 11.5)),
        ])
        .unwrap();

        let result = select_next(&query("a", TargetDistance::Km(1000.0), Direction::S), &dataset)
            .unwrap();
        assert_eq!(result, GuessResult::NoResult(NoResultReason::NoDirectionalMatch));
        assert_eq!(result.reason().unwrap().as_str(), "no directional match");
    }

    #[test]
    fn test_close_range_neighbours() {
        let dataset = Dataset::new(vec![
            CountryEntry::new("a", rect(0.0, 0.0, 2.0, 2.0)),
            CountryEntry::new("c", rect(2.0, -2.0, 4.0, 0.0)),
            CountryEntry::new("e", rect(2.0, 0.0, 4.0, 2.0)),
            CountryEntry::new("far", rect(10.0, -10.0, 12.0, -8.0)),
        ])
        .unwrap();

        let result = select_next(&query("a", TargetDistance::Near, Direction::SE), &dataset)
            .unwrap();
        assert_eq!(result, GuessResult::Candidates(vec!["c".to_string()]));

        let result = select_next(&query("a", TargetDistance::Near, Direction::W), &dataset)
            .unwrap();
        assert_eq!(
            result,
            GuessResult::NoResult(NoResultReason::NoNeighborInDirection)
        );
        assert!(result.names().is_empty());
    }

    #[test]
    fn test_close_range_without_neighbours() {
        let dataset = Dataset::new(vec![
            CountryEntry::new("island", square(0.0, 0.0, 1.0)),
            CountryEntry::new("other", square(10.0, 0.0, 1.0)),
        ])
        .unwrap();

        let result =
            select_next(&query("island", TargetDistance::Near, Direction::E), &dataset).unwrap();
        assert_eq!(result, GuessResult::NoResult(NoResultReason::NoNeighbors));
        assert_eq!(result.reason().unwrap().as_str(), "no neighbors");
    }

    #[test]
    fn test_zero_km_is_close_range() {
        let dataset = Dataset::new(vec![
            CountryEntry::new("a", rect(0.0, 0.0, 2.0, 2.0)),
            CountryEntry::new("e", rect(2.0, 0.0, 4.0, 2.0)),
        ])
        .unwrap();

        let result = select_next(&query("a", TargetDistance::Km(0.0), Direction::E), &dataset)
            .unwrap();
        assert_eq!(result, GuessResult::Candidates(vec!["e".to_string()]));
    }

    #[test]
    fn test_unknown_country() {
        let dataset = Dataset::new(vec![CountryEntry::new("a", square(0.0, 0.0, 0.5))]).unwrap();
        let err = select_next(&query("atlantis", TargetDistance::Km(100.0), Direction::N), &dataset)
            .unwrap_err();
        assert!(matches!(err, SolverError::NotFound(name) if name == "atlantis"));
    }

    #[test]
    fn test_invalid_distance_rejected() {
        let dataset = Dataset::new(vec![CountryEntry::new("a", square(0.0, 0.0, 0.5))]).unwrap();
        for km in [-5.0, f64::NAN, f64::INFINITY] {
            let err = select_next(&query("a", TargetDistance::Km(km), Direction::N), &dataset)
                .unwrap_err();
            assert!(matches!(err, SolverError::InvalidDistance(_)));
        }
    }

    #[test]
    fn test_selection_is_idempotent() {
        let dataset = Dataset::new(vec![
            CountryEntry::new("a", square(0.0, 0.0, 0.5)),
            CountryEntry::new("b", square(8.0, 8.0, 1.0)),
            CountryEntry::new("c", square(-8.0, 8.0, 1.0)),
            CountryEntry::new("d", square(0.0, 12.0, 2.0)),
        ])
        .unwrap();

        let q = query("a", TargetDistance::Km(700.0), Direction::NE);
        let first = select_next(&q, &dataset).unwrap();
        let second = select_next(&q, &dataset).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pass_direction_uses_centroids() {
        let a = square(0.0, 0.0, 0.5);
        let b = square(10.0, -10.0, 0.5);
        assert_eq!(
            classify_centroid_bearing(bearing_between(
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(-10.0, 10.0)
            )),
            Direction::SE
        );
        assert_eq!(SelectionPass::CentroidFallback.direction(&a, &b), Direction::SE);
    }
}
