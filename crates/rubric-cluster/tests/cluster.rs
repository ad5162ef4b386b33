//! Misconception clustering scenarios and properties.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use rubric_cluster::{misconception_clusters, pair_similarity};
use rubric_model::{CanonicalRow, ClusterThresholds};

fn rows(pairs: &[(&str, &str)]) -> Vec<CanonicalRow> {
    pairs
        .iter()
        .map(|(student, item)| CanonicalRow::new(student, "E1", "Q1", item, 1.0).expect("valid row"))
        .collect()
}

#[test]
fn chained_items_share_a_cluster() {
    let rows = rows(&[
        ("s1", "A"),
        ("s2", "A"),
        ("s2", "B"),
        ("s3", "B"),
        ("s3", "C"),
        ("s4", "C"),
        ("s5", "D"),
        ("s6", "D"),
        ("s7", "E"),
    ]);
    let analysis = misconception_clusters(&rows, &ClusterThresholds::default());

    assert_eq!(analysis.clusters.len(), 2);
    let first = &analysis.clusters[0];
    assert_eq!(first.label, "Misconception 1");
    assert_eq!(first.members, ["A", "B", "C"]);
    assert_eq!(first.size, 3);
    assert_eq!(first.support_students, 4);
    assert_eq!(analysis.clusters[1].members, ["D"]);
    assert_eq!(analysis.multi_item().count(), 1);

    // E is below min_support, so 4 items give 6 pairs.
    assert_eq!(analysis.similarities.len(), 6);
    assert_eq!(analysis.similarities[0].rubric_item_a, "A");
    assert_eq!(analysis.similarities[0].rubric_item_b, "B");
    assert_eq!(analysis.similarities[0].cooccurrence, 1);
    assert!(
        analysis
            .similarities
            .windows(2)
            .all(|pair| pair[0].jaccard >= pair[1].jaccard)
    );
}

#[test]
fn single_supported_item_yields_nothing() {
    let rows = rows(&[("s1", "A"), ("s2", "A"), ("s1", "B")]);
    let analysis = misconception_clusters(&rows, &ClusterThresholds::default());
    assert!(analysis.is_empty());
    assert!(analysis.similarities.is_empty());
}

#[test]
fn correlation_alone_can_link_items() {
    // jaccard 2/10 < 0.25 but corr 2/sqrt(2*10) ~ 0.447
    let mut pairs = vec![("s1", "A"), ("s2", "A")];
    let students = ["s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10"];
    pairs.extend(students.iter().map(|s| (*s, "B")));
    let thresholds = ClusterThresholds {
        jaccard_threshold: 0.25,
        ..ClusterThresholds::default()
    };
    let analysis = misconception_clusters(&rows(&pairs), &thresholds);
    assert_eq!(analysis.clusters.len(), 1);
    assert_eq!(analysis.clusters[0].support_students, 10);
}

fn arb_incidence() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0..8u8, 0..6u8), 0..40)
}

fn to_rows(cells: &[(u8, u8)]) -> Vec<CanonicalRow> {
    cells
        .iter()
        .map(|(student, item)| {
            CanonicalRow::new(&format!("s{student}"), "E1", "Q1", &format!("item {item}"), 1.0)
                .expect("valid row")
        })
        .collect()
}

proptest! {
    #[test]
    fn similarity_is_symmetric(
        a in prop::collection::btree_set("s[0-9]", 0..8),
        b in prop::collection::btree_set("s[0-9]", 0..8),
    ) {
        let a: BTreeSet<&str> = a.iter().map(String::as_str).collect();
        let b: BTreeSet<&str> = b.iter().map(String::as_str).collect();
        prop_assert_eq!(pair_similarity(&a, &b), pair_similarity(&b, &a));
    }

    #[test]
    fn clusters_partition_items_and_respect_edges(cells in arb_incidence()) {
        let rows = to_rows(&cells);
        let thresholds = ClusterThresholds::default();
        let analysis = misconception_clusters(&rows, &thresholds);

        let mut cluster_of: BTreeMap<&str, &str> = BTreeMap::new();
        for cluster in &analysis.clusters {
            prop_assert_eq!(cluster.size, cluster.members.len());
            for member in &cluster.members {
                prop_assert!(cluster_of.insert(member, &cluster.label).is_none());
            }
        }
        for pair in &analysis.similarities {
            prop_assert!(pair.jaccard <= pair.corr + 1e-12);
            if pair.jaccard >= thresholds.jaccard_threshold || pair.corr >= thresholds.corr_threshold {
                prop_assert_eq!(
                    cluster_of.get(pair.rubric_item_a.as_str()),
                    cluster_of.get(pair.rubric_item_b.as_str())
                );
            }
        }
    }

    #[test]
    fn clusters_ignore_row_order(cells in arb_incidence()) {
        let mut reversed = cells.clone();
        reversed.reverse();
        let thresholds = ClusterThresholds::default();
        prop_assert_eq!(
            misconception_clusters(&to_rows(&cells), &thresholds).clusters,
            misconception_clusters(&to_rows(&reversed), &thresholds).clusters
        );
    }
}
