//! Similarity ranking against a descriptor database

use crate::{Descriptor, DescriptorDatabase, SearchConfig};
use shapefind_core::{Error, Result};
use tracing::debug;

/// One ranked reference mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Position of the entry in the database
    pub index: usize,
    pub id: String,
    /// Lower is more similar; zero for identical descriptors
    pub dissimilarity: f64,
}

/// L1 distance between two descriptors.
///
/// Sums the absolute differences of all nine tensor components (both
/// off-diagonal halves of the symmetric tensor are counted) and of the two
/// axis scalars. The terms are not normalised: tensor components grow with
/// area times squared distance while the axis scalars grow with distance,
/// so on meshes of any real size the tensor term dominates the score.
pub fn dissimilarity(a: &Descriptor, b: &Descriptor) -> f64 {
    let tensor: f64 = a
        .inertia
        .iter()
        .zip(b.inertia.iter())
        .map(|(x, y)| (x - y).abs())
        .sum();
    tensor
        + (a.average_distance - b.average_distance).abs()
        + (a.distance_variance - b.distance_variance).abs()
}

/// Brute force ranker: scores every entry and keeps the `top_k` best
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityRanker {
    pub top_k: usize,
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self {
            top_k: SearchConfig::DEFAULT_TOP_K,
        }
    }
}

impl SimilarityRanker {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.top_k)
    }

    /// Rank every database entry against `query`, most similar first.
    ///
    /// Ties keep database order. An empty database yields an empty list.
    /// A non-finite query is [`Error::InvalidData`]; an entry with a
    /// non-finite component fails the whole query with
    /// [`Error::InvalidDatabaseEntry`].
    pub fn rank(&self, query: &Descriptor, database: &DescriptorDatabase) -> Result<Vec<Match>> {
        if !query.is_finite() {
            return Err(Error::InvalidData(
                "query descriptor has non-finite components".to_string(),
            ));
        }
        let mut scored: Vec<Match> = database
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                if !entry.descriptor.is_finite() {
                    return Err(Error::invalid_entry(
                        index,
                        entry.id.clone(),
                        "descriptor has non-finite components",
                    ));
                }
                Ok(Match {
                    index,
                    id: entry.id.clone(),
                    dissimilarity: dissimilarity(query, &entry.descriptor),
                })
            })
            .collect::<Result<_>>()?;

        // sort_by is stable, so equal scores keep database order
        scored.sort_by(|a, b| a.dissimilarity.total_cmp(&b.dissimilarity));
        scored.truncate(self.top_k);

        debug!(
            candidates = database.len(),
            returned = scored.len(),
            best = scored.first().map(|m| m.dissimilarity),
            "ranked descriptor database"
        );
        Ok(scored)
    }

    /// Identifiers of the best matches, most similar first
    pub fn rank_ids(&self, query: &Descriptor, database: &DescriptorDatabase) -> Result<Vec<String>> {
        Ok(self
            .rank(query, database)?
            .into_iter()
            .map(|m| m.id)
            .collect())
    }
}
