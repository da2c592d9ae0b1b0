use std::io::{BufWriter, Write};

use aspath_topology::io::{lines_of, open_lines, write_lines};
use aspath_topology::{
    dedup_paths, export_records, extract_links, extract_nodes, open_records, AsPathExtractor,
    DumpFormat, ExtractorConfig, Limit, SeenSet, TopologyError,
};
use clap::{Parser, Subcommand};
use itertools::process_results;
use log::info;

/// aspath-topology extracts AS paths, AS nodes and AS links from MRT routing-table dumps.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print distinct AS paths of a RIB dump, one comma-separated path per line
    Paths {
        /// File path to a MRT or JSON dump, local or remote.
        #[clap(name = "FILE")]
        file_path: Option<String>,

        /// Stop after this many paths. Empty or negative means no limit.
        #[clap(name = "LIMIT", allow_negative_numbers = true)]
        limit: Option<Limit>,

        /// Dump format: auto, mrt or json
        #[clap(short, long, default_value = "auto")]
        format: DumpFormat,

        /// Accepted TABLE_DUMP_V2 subtype code, repeatable. Defaults to 4 and 10.
        #[clap(short = 's', long = "subtype")]
        subtypes: Vec<u32>,
    },

    /// Print distinct ASes of the path lines read from stdin
    Nodes {
        /// Stop after this many nodes. Empty or negative means no limit.
        #[clap(name = "LIMIT", allow_negative_numbers = true)]
        limit: Option<Limit>,

        /// Read path lines from this file instead of stdin
        #[clap(short, long)]
        input: Option<String>,
    },

    /// Print distinct directed AS links of the path lines read from stdin
    Links {
        /// Stop after this many links. Empty or negative means no limit.
        #[clap(name = "LIMIT", allow_negative_numbers = true)]
        limit: Option<Limit>,

        /// Read path lines from this file instead of stdin
        #[clap(short, long)]
        input: Option<String>,
    },

    /// Print decoded records as JSON, one object per line
    Records {
        /// File path to a MRT or JSON dump, local or remote.
        #[clap(name = "FILE")]
        file_path: Option<String>,

        /// Stop after this many records. Empty or negative means no limit.
        #[clap(name = "LIMIT", allow_negative_numbers = true)]
        limit: Option<Limit>,

        /// Dump format: auto, mrt or json
        #[clap(short, long, default_value = "auto")]
        format: DumpFormat,

        /// Pretty-print JSON output
        #[clap(long)]
        pretty: bool,
    },
}

fn main() {
    let opts: Opts = Opts::parse();

    env_logger::init();

    if let Err(err) = run(opts.command) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), TopologyError> {
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match command {
        Commands::Paths {
            file_path,
            limit,
            format,
            subtypes,
        } => {
            let file_path = file_path.unwrap_or_default();
            let records = open_records(file_path.as_str(), format)?;
            let extractor =
                AsPathExtractor::new(ExtractorConfig::default().with_rib_subtypes(&subtypes));
            info!(
                "extracting paths from {} (subtypes {})",
                file_path,
                extractor.config().rib_subtypes
            );

            let mut scanned = 0u64;
            let (written, duplicates, state) = process_results(records, |records| {
                let records = records.inspect(|_| scanned += 1);
                let mut paths = dedup_paths(
                    extractor.paths(records),
                    SeenSet::new(),
                    limit.unwrap_or_default(),
                );
                write_lines(&mut out, paths.by_ref())
                    .map(|written| (written, paths.duplicates(), paths.state()))
            })??;
            info!(
                "{} distinct paths written, {} repeated paths skipped, {} records scanned ({:?})",
                written, duplicates, scanned, state
            );
        }
        Commands::Nodes { limit, input } => {
            let lines = lines_of(open_lines(input.as_deref())?);
            let (written, duplicates, state) = process_results(lines, |lines| {
                let mut nodes = extract_nodes(lines, SeenSet::new(), limit.unwrap_or_default());
                write_lines(&mut out, nodes.by_ref())
                    .map(|written| (written, nodes.duplicates(), nodes.state()))
            })??;
            info!(
                "{} distinct nodes written, {} repeated tokens skipped ({:?})",
                written, duplicates, state
            );
        }
        Commands::Links { limit, input } => {
            let lines = lines_of(open_lines(input.as_deref())?);
            let (written, duplicates, state) = process_results(lines, |lines| {
                let mut links = extract_links(lines, SeenSet::new(), limit.unwrap_or_default());
                write_lines(&mut out, links.by_ref())
                    .map(|written| (written, links.duplicates(), links.state()))
            })??;
            info!(
                "{} distinct links written, {} repeated links skipped ({:?})",
                written, duplicates, state
            );
        }
        Commands::Records {
            file_path,
            limit,
            format,
            pretty,
        } => {
            let file_path = file_path.unwrap_or_default();
            let records = open_records(file_path.as_str(), format)?;
            let written = process_results(records, |records| {
                export_records(&mut out, records, limit.unwrap_or_default(), pretty)
            })??;
            info!("{} records written", written);
        }
    }

    out.flush().or_else(|e| match e.kind() {
        std::io::ErrorKind::BrokenPipe => Ok(()),
        _ => Err(e),
    })?;
    Ok(())
}
