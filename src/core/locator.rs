//! Nearest-gene resolution
//!
//! The locator follows a simple policy:
//! 1. Return every gene whose interval contains the position
//! 2. Otherwise compare the closest gene end before the position with the
//!    closest gene start after it and return the nearer gene
//! 3. Equal distances favor the gene before the position

use crate::core::boundary::BoundaryIndex;
use crate::core::error::{BuildResult, DataIntegrityError, LocateError, LocateResult};
use crate::core::gene::{normalize_chrom, GeneRecord};
use crate::core::index::{GeneSlot, IntervalEntry, IntervalIndex, PointIndex};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-chromosome indexes, all referring to slots of the canonical store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Partition<I> {
    overlaps: I,
    starts: BoundaryIndex<GeneSlot>,
    ends: BoundaryIndex<GeneSlot>,
}

impl<I: PointIndex> Partition<I> {
    fn build(genes: &[GeneRecord], slots: &[GeneSlot]) -> Option<Self> {
        let gene = |slot: GeneSlot| &genes[slot as usize];
        let starts = BoundaryIndex::new(slots.iter().map(|&s| (gene(s).start, s)).collect())?;
        let ends = BoundaryIndex::new(slots.iter().map(|&s| (gene(s).end, s)).collect())?;
        let overlaps = I::build(
            slots
                .iter()
                .map(|&slot| IntervalEntry {
                    start: gene(slot).start,
                    end: gene(slot).end,
                    slot,
                })
                .collect(),
        );
        Some(Self { overlaps, starts, ends })
    }
}

/// Immutable gene index answering "which gene is at or nearest to chrom:pos"
///
/// The canonical store holds every gene sorted by id; a gene's slot is its
/// position in that store. Because slots follow id order, the built locator
/// does not depend on the order of its input.
///
/// # Example
/// ```
/// use gene_locator::{GeneLocator, GeneRecord};
///
/// let locator = GeneLocator::new(vec![
///     GeneRecord::new("chr19", 107104, 117102, "G1", "OR4F17"),
/// ]).unwrap();
///
/// let genes = locator.locate("chr19", 1234).unwrap();
/// assert_eq!(genes[0].symbol, "OR4F17");
/// assert_eq!(genes[0].chrom, "19");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneLocator<I = IntervalIndex> {
    /// Canonical store, sorted by gene id, chromosomes normalized
    genes: Vec<GeneRecord>,
    /// Normalized chromosome -> indexes
    partitions: BTreeMap<String, Partition<I>>,
}

impl GeneLocator {
    /// Build a locator backed by the lapper interval index
    pub fn new<G>(genes: G) -> BuildResult<Self>
    where
        G: IntoIterator<Item = GeneRecord>,
    {
        Self::with_index(genes)
    }

    /// Check that a decoded locator is internally consistent
    ///
    /// Every slot held by a partition must point into the store at a gene
    /// of that chromosome, and the store must stay sorted by unique id.
    pub(crate) fn check_consistency(&self) -> std::result::Result<(), String> {
        if let Some(pair) = self.genes.windows(2).find(|pair| pair[0].id >= pair[1].id) {
            return Err(format!("gene store is not sorted by id at {:?}", pair[1].id));
        }

        for (chrom, partition) in &self.partitions {
            let count = partition.overlaps.len();
            if partition.starts.len() != count || partition.ends.len() != count {
                return Err(format!(
                    "partition {} has {} intervals, {} starts and {} ends",
                    chrom,
                    count,
                    partition.starts.len(),
                    partition.ends.len()
                ));
            }

            let slots = partition
                .overlaps
                .entries()
                .map(|entry| entry.slot)
                .chain(partition.starts.payloads().iter().copied())
                .chain(partition.ends.payloads().iter().copied());
            for slot in slots {
                match self.genes.get(slot as usize) {
                    Some(gene) if gene.chrom == *chrom => {}
                    Some(gene) => {
                        return Err(format!(
                            "partition {} refers to gene {} on chromosome {}",
                            chrom, gene.id, gene.chrom
                        ))
                    }
                    None => {
                        return Err(format!(
                            "partition {} refers to slot {} but the store holds {} genes",
                            chrom,
                            slot,
                            self.genes.len()
                        ))
                    }
                }
            }
        }
        Ok(())
    }
}

impl<I: PointIndex> GeneLocator<I> {
    /// Build a locator with a caller-chosen interval index
    ///
    /// Fails if any gene has `start >= end` or if a gene id repeats.
    pub fn with_index<G>(genes: G) -> BuildResult<Self>
    where
        G: IntoIterator<Item = GeneRecord>,
    {
        let mut store = Vec::new();
        for mut gene in genes {
            if gene.start >= gene.end {
                return Err(DataIntegrityError::InvalidInterval {
                    id: gene.id,
                    start: gene.start,
                    end: gene.end,
                });
            }
            gene.chrom = normalize_chrom(&gene.chrom);
            store.push(gene);
        }

        if store.len() > GeneSlot::MAX as usize {
            return Err(DataIntegrityError::TooManyGenes(store.len()));
        }

        store.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(pair) = store.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(DataIntegrityError::DuplicateId {
                id: pair[0].id.clone(),
            });
        }

        let mut slots_by_chrom: BTreeMap<&str, Vec<GeneSlot>> = BTreeMap::new();
        for (slot, gene) in store.iter().enumerate() {
            slots_by_chrom
                .entry(gene.chrom.as_str())
                .or_default()
                .push(slot as GeneSlot);
        }

        let partitions: BTreeMap<String, Partition<I>> = slots_by_chrom
            .into_iter()
            .filter_map(|(chrom, slots)| {
                Partition::build(&store, &slots).map(|p| (chrom.to_string(), p))
            })
            .collect();

        debug!(
            "Built gene locator: {} genes on {} chromosomes",
            store.len(),
            partitions.len()
        );

        Ok(Self {
            genes: store,
            partitions,
        })
    }

    /// Locate genes in strict mode (unknown chromosomes are an error)
    pub fn locate(&self, chrom: &str, position: u64) -> LocateResult<Vec<GeneRecord>> {
        self.locate_with(chrom, position, true)
    }

    /// Locate the genes overlapping `position`, or the single nearest gene
    ///
    /// Overlapping genes are sorted by start, then end, then id. With
    /// `strict == false` an unknown chromosome reports `NoResultsFound`
    /// instead of `UnknownChromosome`.
    pub fn locate_with(
        &self,
        chrom: &str,
        position: u64,
        strict: bool,
    ) -> LocateResult<Vec<GeneRecord>> {
        let chrom = normalize_chrom(chrom);

        let Some(partition) = self.partitions.get(&chrom) else {
            return Err(if strict {
                LocateError::UnknownChromosome(chrom)
            } else {
                LocateError::NoResultsFound { chrom, position }
            });
        };

        let mut overlapping = partition.overlaps.containing(position);
        if !overlapping.is_empty() {
            // slot order is id order
            overlapping.sort_unstable_by_key(|&slot| {
                let gene = self.gene_at(slot);
                (gene.start, gene.end, slot)
            });
            return Ok(overlapping
                .into_iter()
                .map(|slot| self.gene_at(slot).clone())
                .collect());
        }

        let prev_gene_end = partition.ends.nearest_at_or_before(position);
        let next_gene_start = partition.starts.nearest_at_or_after(position);

        let slot = match (prev_gene_end, next_gene_start) {
            (None, None) => return Err(LocateError::NoResultsFound { chrom, position }),
            (Some((_, &slot)), None) | (None, Some((_, &slot))) => slot,
            (Some((end, &before)), Some((start, &after))) => {
                if start.abs_diff(position) < end.abs_diff(position) {
                    after
                } else {
                    before
                }
            }
        };

        Ok(vec![self.gene_at(slot).clone()])
    }

    /// Flat record for a gene id, with the normalized chromosome name
    pub fn serialize_gene(&self, id: &str) -> Option<GeneRecord> {
        self.genes
            .binary_search_by(|gene| gene.id.as_str().cmp(id))
            .ok()
            .map(|slot| self.genes[slot].clone())
    }

    /// Check if a chromosome has genes (accepts "chr1" and "1")
    pub fn has_chromosome(&self, chrom: &str) -> bool {
        self.partitions.contains_key(&normalize_chrom(chrom))
    }

    /// Normalized chromosome names, sorted
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.partitions.keys().map(|s| s.as_str())
    }

    /// Number of genes in the store
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Number of genes on one chromosome
    pub fn chrom_gene_count(&self, chrom: &str) -> usize {
        self.partitions
            .get(&normalize_chrom(chrom))
            .map(|p| p.overlaps.len())
            .unwrap_or(0)
    }

    /// All genes, sorted by id
    pub fn genes(&self) -> impl Iterator<Item = &GeneRecord> {
        self.genes.iter()
    }

    fn gene_at(&self, slot: GeneSlot) -> &GeneRecord {
        &self.genes[slot as usize]
    }
}
