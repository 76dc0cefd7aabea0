//! Border adjacency between countries

use crate::dataset::{CountryDataset, CountryEntry};
use crate::geometry::Shape;
use tracing::debug;

/// Every entry whose boundary touches `shape`, in dataset order. The entry
/// holding `shape` itself is skipped.
pub fn neighbors_of<'a, D>(shape: &Shape, dataset: &'a D) -> Vec<&'a CountryEntry>
where
    D: CountryDataset + ?Sized,
{
    let neighbors: Vec<&CountryEntry> = dataset
        .entries()
        .iter()
        .filter(|entry| !std::ptr::eq(&entry.shape, shape))
        .filter(|entry| shape.touches(&entry.shape))
        .collect();

    debug!("Found {} neighbours", neighbors.len());
    neighbors
}
