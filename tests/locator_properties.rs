//! Property-based tests for GeneLocator queries
//!
//! Every answer is checked against a brute-force scan over the gene list.

use gene_locator::core::{GeneSlot, IntervalEntry, LocateError, PointIndex};
use gene_locator::{normalize_chrom, DataIntegrityError, GeneLocator, GeneRecord};
use proptest::prelude::*;

/// Linear-scan interval index, the simplest possible `PointIndex`
struct ScanIndex {
    entries: Vec<IntervalEntry>,
}

impl PointIndex for ScanIndex {
    fn build(entries: Vec<IntervalEntry>) -> Self {
        Self { entries }
    }

    fn containing(&self, position: u64) -> Vec<GeneSlot> {
        self.entries
            .iter()
            .filter(|e| e.start <= position && position < e.end)
            .map(|e| e.slot)
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Chromosome names, several of which share a partition
fn arb_chrom() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("chr1"),
        Just("1"),
        Just("chr2"),
        Just("chrMT"),
        Just("M"),
    ]
}

/// Genes with unique ids on a small genome
fn arb_genes() -> impl Strategy<Value = Vec<GeneRecord>> {
    prop::collection::vec((arb_chrom(), 0u64..10_000, 1u64..800), 1..40).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (chrom, start, len))| {
                GeneRecord::new(chrom, start, start + len, format!("G{:03}", i), format!("SYM{}", i))
            })
            .collect()
    })
}

/// Same genes in two different orders
fn arb_genes_shuffled() -> impl Strategy<Value = (Vec<GeneRecord>, Vec<GeneRecord>)> {
    arb_genes().prop_flat_map(|genes| (Just(genes.clone()), Just(genes).prop_shuffle()))
}

fn normalized(gene: &GeneRecord) -> GeneRecord {
    GeneRecord {
        chrom: normalize_chrom(&gene.chrom),
        ..gene.clone()
    }
}

/// Expected answer computed by scanning every gene
fn brute_force(genes: &[GeneRecord], chrom: &str, pos: u64) -> Option<Vec<GeneRecord>> {
    let key = normalize_chrom(chrom);
    let on_chrom: Vec<GeneRecord> = genes
        .iter()
        .map(normalized)
        .filter(|g| g.chrom == key)
        .collect();
    if on_chrom.is_empty() {
        return None;
    }

    let mut overlapping: Vec<GeneRecord> = on_chrom
        .iter()
        .filter(|g| g.start <= pos && pos < g.end)
        .cloned()
        .collect();
    if !overlapping.is_empty() {
        overlapping.sort_by(|a, b| (a.start, a.end, &a.id).cmp(&(b.start, b.end, &b.id)));
        return Some(overlapping);
    }

    // last of the equal ends, first of the equal starts
    let before = on_chrom
        .iter()
        .filter(|g| g.end <= pos)
        .max_by(|a, b| (a.end, &a.id).cmp(&(b.end, &b.id)));
    let after = on_chrom
        .iter()
        .filter(|g| g.start >= pos)
        .min_by(|a, b| (a.start, &a.id).cmp(&(b.start, &b.id)));

    let nearest = match (before, after) {
        (None, None) => return None,
        (Some(g), None) | (None, Some(g)) => g,
        (Some(b), Some(a)) => {
            if a.start - pos < pos - b.end {
                a
            } else {
                b
            }
        }
    };
    Some(vec![nearest.clone()])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every query matches the brute-force answer
    #[test]
    fn prop_locate_matches_brute_force(
        genes in arb_genes(),
        chrom in arb_chrom(),
        pos in 0u64..11_000,
    ) {
        let locator = GeneLocator::new(genes.clone()).unwrap();
        let expected = brute_force(&genes, chrom, pos);

        match locator.locate(chrom, pos) {
            Ok(found) => prop_assert_eq!(Some(found), expected),
            Err(LocateError::UnknownChromosome(_)) => prop_assert_eq!(expected, None),
            Err(e) => prop_assert!(false, "unexpected error {}", e),
        }
    }

    /// Overlap results are never empty and always contain the position
    #[test]
    fn prop_overlap_precedence(
        genes in arb_genes(),
        pick in any::<prop::sample::Index>(),
        offset in 0u64..800,
    ) {
        let target = &genes[pick.index(genes.len())];
        let pos = target.start + offset % (target.end - target.start);

        let locator = GeneLocator::new(genes.clone()).unwrap();
        let found = locator.locate(&target.chrom, pos).unwrap();

        prop_assert!(found.iter().any(|g| g.id == target.id));
        for gene in &found {
            prop_assert!(gene.start <= pos && pos < gene.end);
        }
        for pair in found.windows(2) {
            prop_assert!(pair[0].start <= pair[1].start);
        }
    }

    /// Input order does not change any answer
    #[test]
    fn prop_order_independent(
        (genes, shuffled) in arb_genes_shuffled(),
        chrom in arb_chrom(),
        pos in 0u64..11_000,
    ) {
        let a = GeneLocator::new(genes).unwrap();
        let b = GeneLocator::new(shuffled).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.locate(chrom, pos), b.locate(chrom, pos));
    }

    /// Any PointIndex implementation gives the same answers
    #[test]
    fn prop_point_index_interchangeable(
        genes in arb_genes(),
        chrom in arb_chrom(),
        pos in 0u64..11_000,
    ) {
        let lapper = GeneLocator::new(genes.clone()).unwrap();
        let scan = GeneLocator::<ScanIndex>::with_index(genes).unwrap();
        prop_assert_eq!(lapper.locate(chrom, pos), scan.locate(chrom, pos));
    }

    /// A single query never returns an empty success
    #[test]
    fn prop_never_empty(
        genes in arb_genes(),
        chrom in arb_chrom(),
        pos in 0u64..11_000,
        strict in any::<bool>(),
    ) {
        let locator = GeneLocator::new(genes).unwrap();
        if let Ok(found) = locator.locate_with(chrom, pos, strict) {
            prop_assert!(!found.is_empty());
        }
    }

    /// Any repeated id fails construction
    #[test]
    fn prop_duplicate_id_rejected(
        genes in arb_genes(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut genes = genes;
        let mut dup = genes[pick.index(genes.len())].clone();
        dup.start += 1_000_000;
        dup.end += 1_000_000;
        let id = dup.id.clone();
        genes.push(dup);

        prop_assert_eq!(
            GeneLocator::new(genes).unwrap_err(),
            DataIntegrityError::DuplicateId { id }
        );
    }
}

mod chrom_name_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// "chrN" and "N" resolve to the same partition
        #[test]
        fn prop_chr_prefix_equivalent(
            chrom_num in 1u8..=22,
            pos in 0u64..3_000,
        ) {
            let genes = vec![
                GeneRecord::new(format!("chr{}", chrom_num), 100, 200, "A", "GENEA"),
                GeneRecord::new(format!("{}", chrom_num), 500, 600, "B", "GENEB"),
                GeneRecord::new(format!("chr{}", chrom_num), 1000, 2000, "C", "GENEC"),
            ];
            let locator = GeneLocator::new(genes).unwrap();

            let long = locator.locate(&format!("chr{}", chrom_num), pos);
            let short = locator.locate(&format!("{}", chrom_num), pos);
            prop_assert_eq!(&long, &short);
            prop_assert_eq!(locator.chrom_gene_count(&format!("{}", chrom_num)), 3);
        }
    }
}

#[test]
fn test_end_to_end_example() {
    let locator = GeneLocator::new(vec![GeneRecord::new(
        "19",
        107104,
        117102,
        "G1",
        "OR4F17",
    )])
    .unwrap();

    assert_eq!(
        locator.locate("chr19", 1234).unwrap(),
        vec![GeneRecord::new("19", 107104, 117102, "G1", "OR4F17")]
    );
}

#[test]
fn test_multi_overlap_ordering() {
    let locator = GeneLocator::new(vec![
        GeneRecord::new("chr7", 5_000, 9_000, "LATE", "L"),
        GeneRecord::new("chr7", 1_000, 8_000, "EARLY", "E"),
    ])
    .unwrap();

    let ids: Vec<String> = locator
        .locate("7", 6_000)
        .unwrap()
        .into_iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(ids, vec!["EARLY", "LATE"]);
}

#[test]
fn test_tie_resolves_before() {
    let locator = GeneLocator::new(vec![
        GeneRecord::new("1", 100, 200, "BEFORE", "B"),
        GeneRecord::new("1", 300, 400, "AFTER", "A"),
    ])
    .unwrap();

    assert_eq!(locator.locate("1", 250).unwrap()[0].id, "BEFORE");
    assert_eq!(locator.locate("1", 251).unwrap()[0].id, "AFTER");
    assert_eq!(locator.locate("1", 249).unwrap()[0].id, "BEFORE");
}

#[test]
fn test_concurrent_queries() {
    let genes: Vec<GeneRecord> = (0..1_000u64)
        .map(|i| GeneRecord::new("chr1", i * 100, i * 100 + 50, format!("G{}", i), format!("S{}", i)))
        .collect();
    let locator = GeneLocator::new(genes).unwrap();

    std::thread::scope(|scope| {
        for t in 0..4u64 {
            let locator = &locator;
            scope.spawn(move || {
                for i in 0..1_000u64 {
                    let pos = i * 100 + t * 10;
                    let found = locator.locate("1", pos).unwrap();
                    assert_eq!(found[0].id, format!("G{}", i));
                }
            });
        }
    });
}
