#![deny(unsafe_code)]

//! Misconception clustering.
//!
//! Rubric items that tend to be incurred by the same students are linked by
//! co-occurrence similarity and grouped into connected components with a
//! [`DisjointSet`].

mod cluster;
mod similarity;
mod union_find;

pub use cluster::{ClusterAnalysis, MisconceptionCluster, misconception_clusters};
pub use similarity::{PairSimilarity, incidence, pair_similarity};
pub use union_find::DisjointSet;
