//! GeneLocator CLI entry point
//!
//! Prints the closest gene (or genes, if several overlap the location).

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gene_locator::assets::{parse_gencode_version, DEFAULT_GENCODE_VERSION};
use gene_locator::core::{LocateError, LocateResult};
use gene_locator::formats::write_gene_list;
use gene_locator::{
    AssetStore, DatasetKey, FetchPolicy, GeneLocator, GeneRecord, GeneSet, GenomeBuild,
};
use rayon::prelude::*;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "gene-locator")]
#[command(about = "Find the gene(s) overlapping or nearest to a genomic position")]
#[command(version)]
#[command(author = "GeneLocator Contributors")]
struct Cli {
    /// Directory holding prebuilt locator snapshots
    #[arg(
        long = "cache-dir",
        global = true,
        env = "GENE_LOCATOR_CACHE",
        default_value = "data"
    )]
    cache_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for located genes
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    /// chrom, start, end, id, symbol separated by tabs
    #[default]
    Tsv,
    /// One JSON object per gene
    Json,
}

#[derive(Args)]
struct DatasetArgs {
    /// Genome build: GRCh37, GRCh38, hg19 or hg38
    #[arg(value_parser = parse_build)]
    build: GenomeBuild,
    /// GENCODE release (e.g. 32 or gencode32; releases up to 22 are not supported)
    #[arg(long = "gencode", visible_alias = "gencode-version", default_value_t = DEFAULT_GENCODE_VERSION, value_parser = parse_version)]
    gencode_version: u32,
    /// Restrict search to coding-like genes (protein_coding + IG_*_gene + TR_*_gene)
    #[arg(long = "coding-only")]
    coding_only: bool,
}

impl DatasetArgs {
    fn key(&self) -> DatasetKey {
        let gene_set = if self.coding_only {
            GeneSet::CodingLike
        } else {
            GeneSet::All
        };
        DatasetKey::new(self.build, self.gencode_version, gene_set)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Locate the gene(s) at or nearest to one or more positions
    Locate {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// Chromosome (chr19 and 19 are equivalent)
        chromosome: String,
        /// Positions, in coordinates of the selected genome build
        #[arg(required = true)]
        positions: Vec<u64>,
        /// GTF (or JSON gene list) to build the dataset from when it is not cached
        #[arg(long)]
        gtf: Option<PathBuf>,
        /// Report an unknown chromosome as "no results" instead of an error
        #[arg(long)]
        lenient: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "tsv")]
        format: OutputFormat,
        /// Number of threads for batch queries
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
    /// Build a dataset from a GENCODE GTF and store it in the cache
    Build {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// GENCODE GTF (plain, .gz or .bz2) or JSON gene list
        #[arg(long)]
        gtf: PathBuf,
        /// Also write the selected genes as a JSON gene list
        #[arg(long = "gene-list")]
        gene_list: Option<PathBuf>,
    },
}

fn parse_build(value: &str) -> Result<GenomeBuild, String> {
    value.parse::<GenomeBuild>().map_err(|e| e.to_string())
}

fn parse_version(value: &str) -> Result<u32, String> {
    parse_gencode_version(value).map_err(|e| e.to_string())
}

fn load_locator(store: &AssetStore, key: &DatasetKey, gtf: Option<PathBuf>) -> anyhow::Result<GeneLocator> {
    let start = Instant::now();
    let policy = match gtf {
        Some(path) => FetchPolicy::BuildFrom(path),
        None => FetchPolicy::CacheOnly,
    };

    let locator = store
        .load(key, &policy)
        .with_context(|| format!("No source found for the requested dataset ({:?})", key))?;
    log::info!(
        "Dataset {} gencode{} {} ready in {:.2}s",
        key.build,
        key.gencode_version,
        key.gene_set.label(),
        start.elapsed().as_secs_f64()
    );
    Ok(locator)
}

fn write_genes<W: Write>(out: &mut W, genes: &[GeneRecord], format: OutputFormat) -> anyhow::Result<()> {
    for gene in genes {
        match format {
            OutputFormat::Tsv => writeln!(out, "{}", gene)?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(gene)?)?,
        }
    }
    Ok(())
}

/// One stderr line per failed query; `NoResultsFound` already names the position
fn describe_failure(chromosome: &str, position: u64, err: &LocateError) -> String {
    match err {
        LocateError::NoResultsFound { .. } => err.to_string(),
        LocateError::UnknownChromosome(_) => format!("{}:{}: {}", chromosome, position, err),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let store = AssetStore::new(&cli.cache_dir);

    match cli.command {
        Commands::Locate { dataset, chromosome, positions, gtf, lenient, format, threads } => {
            let locator = load_locator(&store, &dataset.key(), gtf)?;
            let strict = !lenient;

            let query = |&position: &u64| -> (u64, LocateResult<Vec<GeneRecord>>) {
                (position, locator.locate_with(&chromosome, position, strict))
            };
            let results: Vec<_> = if threads <= 1 || positions.len() == 1 {
                positions.iter().map(query).collect()
            } else {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .context("Failed to start query threads")?
                    .install(|| positions.par_iter().map(query).collect())
            };

            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let mut failed = 0usize;
            for (position, result) in &results {
                match result {
                    Ok(genes) => write_genes(&mut out, genes, format)?,
                    Err(e) => {
                        eprintln!("{}", describe_failure(&chromosome, *position, e));
                        failed += 1;
                    }
                }
            }
            out.flush()?;

            if failed > 0 {
                anyhow::bail!("{} of {} queries found no gene", failed, results.len());
            }
        }

        Commands::Build { dataset, gtf, gene_list } => {
            let start = Instant::now();
            let key = dataset.key();
            eprintln!("Building {:?} from {:?}", store.cache_path(&key), gtf);

            let locator = store
                .build(&key, &gtf)
                .with_context(|| format!("Could not build dataset from {:?}", gtf))?;

            if let Some(path) = gene_list {
                let genes: Vec<GeneRecord> = locator.genes().cloned().collect();
                write_gene_list(&path, &genes)
                    .with_context(|| format!("Failed to write gene list {:?}", path))?;
            }

            eprintln!("\n=== Build Statistics ===");
            eprintln!("Genes:           {}", locator.gene_count());
            eprintln!("Chromosomes:     {}", locator.chromosomes().count());
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
