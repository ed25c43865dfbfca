//! Property-based tests for locator snapshots

use gene_locator::{GeneLocator, GeneRecord};
use proptest::prelude::*;
use tempfile::tempdir;

fn arb_genes() -> impl Strategy<Value = Vec<GeneRecord>> {
    prop::collection::vec(
        (prop_oneof![Just("chr1"), Just("chrX"), Just("MT")], 0u64..50_000, 1u64..5_000),
        1..50,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (chrom, start, len))| {
                GeneRecord::new(chrom, start, start + len, format!("ENSG{:05}", i), format!("S{}", i))
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// A restored locator answers every query like the original
    #[test]
    fn prop_restored_locator_is_identical(
        genes in arb_genes(),
        queries in prop::collection::vec(
            (prop_oneof![Just("1"), Just("chrX"), Just("M"), Just("chr2")], 0u64..60_000),
            1..30,
        ),
    ) {
        let locator = GeneLocator::new(genes).unwrap();
        let restored = GeneLocator::from_bytes(&locator.to_bytes().unwrap()).unwrap();

        prop_assert_eq!(&restored, &locator);
        for (chrom, pos) in queries {
            prop_assert_eq!(restored.locate(chrom, pos), locator.locate(chrom, pos));
        }
    }
}

#[test]
fn test_snapshot_file_matches_original() {
    let genes: Vec<GeneRecord> = (0..500u64)
        .map(|i| GeneRecord::new(format!("chr{}", i % 22 + 1), i * 1_000 + 1, i * 1_000 + 700, format!("G{}", i), format!("S{}", i)))
        .collect();
    let locator = GeneLocator::new(genes).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("genes-grch38-gencode32-all.bin.gz");
    locator.save_snapshot(&path).unwrap();
    let restored = GeneLocator::load_snapshot(&path).unwrap();

    assert_eq!(restored.gene_count(), 500);
    assert_eq!(
        restored.chromosomes().collect::<Vec<_>>(),
        locator.chromosomes().collect::<Vec<_>>()
    );
    for pos in (0..500_000).step_by(997) {
        assert_eq!(restored.locate("chr5", pos), locator.locate("chr5", pos));
    }
}
