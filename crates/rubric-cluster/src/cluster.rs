use std::collections::BTreeSet;

use rubric_model::{CanonicalRow, ClusterThresholds};
use serde::Serialize;

use crate::similarity::{PairSimilarity, incidence, pair_similarity};
use crate::union_find::DisjointSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MisconceptionCluster {
    pub label: String,
    pub members: Vec<String>,
    pub size: usize,
    /// Distinct students who incurred any member item.
    pub support_students: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterAnalysis {
    pub clusters: Vec<MisconceptionCluster>,
    /// Every evaluated pair, highest Jaccard first.
    pub similarities: Vec<PairSimilarity>,
}

impl ClusterAnalysis {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Clusters with more than one member.
    pub fn multi_item(&self) -> impl Iterator<Item = &MisconceptionCluster> {
        self.clusters.iter().filter(|cluster| cluster.size > 1)
    }
}

/// Groups rubric items whose student sets overlap.
///
/// Items below `min_support` are dropped first. Pairs are visited in
/// lexicographic order; an edge joins two items when either threshold is
/// met. Every surviving item lands in exactly one cluster.
pub fn misconception_clusters<T: AsRef<CanonicalRow>>(
    rows: &[T],
    thresholds: &ClusterThresholds,
) -> ClusterAnalysis {
    let incidence = incidence(rows, thresholds.min_support);
    if incidence.len() < 2 {
        tracing::debug!(items = incidence.len(), "Not enough supported rubric items to cluster");
        return ClusterAnalysis::default();
    }
    let items: Vec<(&str, &BTreeSet<&str>)> =
        incidence.iter().map(|(item, students)| (*item, students)).collect();

    let mut sets = DisjointSet::new(items.len());
    let mut similarities = Vec::new();
    let mut edges = 0usize;
    for (i, &(item_a, students_a)) in items.iter().enumerate() {
        for (offset, &(item_b, students_b)) in items[i + 1..].iter().enumerate() {
            let (jaccard, corr, cooccurrence) = pair_similarity(students_a, students_b);
            if jaccard >= thresholds.jaccard_threshold || corr >= thresholds.corr_threshold {
                sets.union(i, i + 1 + offset);
                edges += 1;
            }
            similarities.push(PairSimilarity {
                rubric_item_a: item_a.to_string(),
                rubric_item_b: item_b.to_string(),
                jaccard,
                corr,
                cooccurrence,
            });
        }
    }
    similarities.sort_by(|a, b| b.jaccard.total_cmp(&a.jaccard));

    let clusters: Vec<MisconceptionCluster> = sets
        .groups()
        .into_iter()
        .enumerate()
        .map(|(index, members)| {
            let support: BTreeSet<&str> = members
                .iter()
                .flat_map(|&member| items[member].1.iter().copied())
                .collect();
            MisconceptionCluster {
                label: format!("Misconception {}", index + 1),
                members: members.iter().map(|&member| items[member].0.to_string()).collect(),
                size: members.len(),
                support_students: support.len(),
            }
        })
        .collect();

    tracing::info!(
        items = items.len(),
        edges,
        clusters = clusters.len(),
        "Clustered rubric items"
    );
    ClusterAnalysis {
        clusters,
        similarities,
    }
}
