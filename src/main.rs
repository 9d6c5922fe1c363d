use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use pblast_rust::align::{KarlinParams, SearchOpt, Searcher};
use pblast_rust::eval::{self, EvalOpt};
use pblast_rust::index::KmerIndex;
use pblast_rust::io::{self, QueryRecord};
use pblast_rust::model::{self, ProbSequence, ScoringScheme};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "pblast-rust", author, version, about = "BLAST-style search over probabilistic genomes", arg_required_else_help = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GenomeArgs {
    /// Single-line genome sequence file
    sequence: String,
    /// Single-line file of whitespace separated confidences, one per base
    probabilities: String,
    /// Scoring scheme: linear, sqrt or pow1.5
    #[arg(long, default_value = "linear")]
    scheme: String,
}

impl GenomeArgs {
    fn load(&self) -> Result<ProbSequence> {
        let scheme: ScoringScheme = self.scheme.parse()?;
        io::load_prob_sequence(&self.sequence, &self.probabilities, scheme)
            .with_context(|| format!("cannot load genome '{}' / '{}'", self.sequence, self.probabilities))
    }
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Seed word length used to build the k-mer index
    #[arg(short = 'w', long = "word-len", default_value_t = 11)]
    word_len: usize,
    /// Report alignments with E-value strictly below this
    #[arg(short = 'e', long = "threshold", default_value_t = 1.0)]
    threshold: f64,
    /// Karlin-Altschul K parameter
    #[arg(short = 'k', long = "karlin-k", default_value_t = 1.0)]
    k: f64,
    /// Karlin-Altschul lambda parameter
    #[arg(short = 'l', long = "lambda", default_value_t = 1.0)]
    lambda: f64,
    /// Stop ungapped extension once the score falls this far below its maximum
    #[arg(long = "x-drop", default_value_t = 10.0)]
    x_drop: f64,
    /// Number of worker threads
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,
}

impl SearchArgs {
    fn to_opt(&self) -> SearchOpt {
        SearchOpt {
            word_len: self.word_len,
            threshold: self.threshold,
            karlin: KarlinParams::new(self.k, self.lambda),
            x_drop: self.x_drop,
            threads: self.threads,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search queries against a probabilistic genome
    Search {
        #[command(flatten)]
        genome: GenomeArgs,
        #[command(flatten)]
        search: SearchArgs,
        /// Query sequence given inline
        #[arg(short = 'q', long, conflicts_with = "queries")]
        query: Option<String>,
        /// FASTA (or one-per-line) file of queries
        #[arg(long, required_unless_present = "query")]
        queries: Option<String>,
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
        /// Emit JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
    /// Sample a query from the genome with random insertions and deletions
    Generate {
        #[command(flatten)]
        genome: GenomeArgs,
        /// Genome position the query is sampled from
        #[arg(long)]
        start: usize,
        /// Number of genome positions to sample
        #[arg(long, default_value_t = 50)]
        length: usize,
        /// Per-position insertion probability
        #[arg(long = "ins", default_value_t = 0.07)]
        ins_prob: f64,
        /// Per-position deletion probability
        #[arg(long = "del", default_value_t = 0.07)]
        del_prob: f64,
        /// Random seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Measure sensitivity and false-positive rate over random trials
    Evaluate {
        #[command(flatten)]
        genome: GenomeArgs,
        #[command(flatten)]
        search: SearchArgs,
        /// Length of each generated query
        #[arg(long = "query-len", default_value_t = 50)]
        query_len: usize,
        /// Number of random trials
        #[arg(short = 'n', long, default_value_t = 100)]
        trials: usize,
        /// Insertion and deletion probability of generated queries
        #[arg(long = "gap-prob", default_value_t = 0.07)]
        gap_prob: f64,
        /// Random seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_verbose(verbosity: u8) {
    let filter_level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match level {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };
            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(cli.verbose);
    log::info!("Running {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Search { genome, search, query, queries, out, json } => {
            run_search(&genome, search.to_opt(), query, queries.as_deref(), out.as_deref(), json)
        }
        Commands::Generate { genome, start, length, ins_prob, del_prob, seed } => {
            let g = genome.load()?;
            let mut rng = StdRng::seed_from_u64(seed);
            let q = model::generate_query(&g, start, length, ins_prob, del_prob, &mut rng)?;
            println!("{}", String::from_utf8_lossy(&q));
            Ok(())
        }
        Commands::Evaluate { genome, search, query_len, trials, gap_prob, seed, json } => {
            let g = genome.load()?;
            let opt = EvalOpt { query_len, trials, gap_prob, seed, search: search.to_opt() };
            let report = eval::evaluate(&g, &opt)?;
            if json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                println!("sensitivity\t{:.4}", report.sensitivity);
                println!("false_positive_rate\t{:.4}", report.false_positive_rate);
            }
            Ok(())
        }
    }
}

fn run_search(
    genome: &GenomeArgs,
    opt: SearchOpt,
    query: Option<String>,
    queries_path: Option<&str>,
    out_path: Option<&str>,
    json: bool,
) -> Result<()> {
    let queries: Vec<QueryRecord> = match (query, queries_path) {
        (Some(q), _) => vec![QueryRecord { id: "query".to_string(), seq: q.into_bytes() }],
        (None, Some(path)) => {
            let fh = std::fs::File::open(path).map_err(|e| anyhow::anyhow!("cannot open queries '{}': {}", path, e))?;
            io::read_queries(std::io::BufReader::new(fh))?
        }
        (None, None) => anyhow::bail!("either --query or --queries is required"),
    };
    if queries.is_empty() {
        anyhow::bail!("no queries to search");
    }

    let g = genome.load()?;
    let index = KmerIndex::build(&g, opt.word_len)?;
    let searcher = Searcher::new(&g, &index, opt)?;

    let mut out: Box<dyn Write> = if let Some(p) = out_path {
        Box::new(std::io::BufWriter::new(std::fs::File::create(p)?))
    } else {
        Box::new(std::io::BufWriter::new(std::io::stdout()))
    };

    for rec in &queries {
        let hits = searcher
            .search(&rec.seq)
            .with_context(|| format!("search failed for query '{}'", rec.id))?;
        log::info!("{}: {} alignment(s)", rec.id, hits.len());
        for aln in &hits {
            if json {
                let line = serde_json::json!({ "query_id": rec.id, "alignment": aln });
                writeln!(out, "{}", line)?;
            } else {
                writeln!(out, "# {}", rec.id)?;
                write!(out, "{}", aln)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn every_argument_has_help() {
        let cmd = Cli::command();
        cmd.clone().debug_assert();
        for sub in cmd.get_subcommands() {
            for arg in sub.get_arguments() {
                assert!(arg.get_help().is_some(), "{} {} has no help text", sub.get_name(), arg.get_id());
            }
        }
    }

    #[test]
    fn search_args_map_to_options() {
        let cli = Cli::try_parse_from(["pblast-rust", "search", "g.txt", "p.txt", "-q", "ACGT", "-w", "4", "-k", "0.5", "-t", "2"])
            .unwrap();
        let Commands::Search { search, .. } = cli.command else {
            panic!("expected search");
        };
        let opt = search.to_opt();
        assert_eq!(opt.word_len, 4);
        assert_eq!(opt.karlin, KarlinParams::new(0.5, 1.0));
        assert_eq!(opt.threads, 2);
        assert_eq!(opt.x_drop, 10.0);
    }
}
