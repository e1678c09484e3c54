//! logq - filter, sort and paginate JSONL records with SQL-like expressions

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use logq::executor::{TimeFilter, DEFAULT_TIME_FIELD};
use logq::query::{run_query, QueryOptions, QueryOutput};
use logq::record::{read_records, record_to_json, Record};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// logq - query JSONL records with SQL-like filter expressions
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter, sort and paginate records
    Query(QueryArgs),

    /// Validate a filter expression and print its canonical form
    Parse {
        /// Filter expression
        expression: String,
    },
}

#[derive(clap::Args, Debug)]
struct QueryArgs {
    /// JSONL input file (defaults to stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Keep records since a relative time, e.g. "5 minutes ago"
    #[arg(long)]
    since: Option<String>,

    /// Keep only the last N records
    #[arg(long = "last-n-turns", default_value = "0")]
    last_n_turns: usize,

    /// Start of the time window (Unix seconds)
    #[arg(long = "from-ts", default_value = "0")]
    from_ts: i64,

    /// End of the time window (Unix seconds)
    #[arg(long = "to-ts", default_value = "0")]
    to_ts: i64,

    /// Field holding each record's RFC 3339 timestamp
    #[arg(long = "time-field", default_value = DEFAULT_TIME_FIELD)]
    time_field: String,

    /// Filter expression, e.g. "tool='Bash' AND duration>100"
    #[arg(short = 'w', long = "where", visible_alias = "filter")]
    filter: Option<String>,

    /// Field to sort by (repeatable, most significant first)
    #[arg(short, long = "sort-by")]
    sort_by: Vec<String>,

    /// Sort in descending order
    #[arg(short, long)]
    reverse: bool,

    /// Maximum number of records to output (0 for no limit)
    #[arg(short, long, default_value = "0")]
    limit: usize,

    /// Number of records to skip
    #[arg(short, long, default_value = "0")]
    offset: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "jsonl")]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// One JSON object per line
    Jsonl,
    /// A single JSON document with records and pagination metadata
    Json,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Query(query) => run(query),
        Command::Parse { expression } => {
            let query = logq::query::Query::parse(&expression)
                .with_context(|| format!("Invalid filter '{}'", expression))?;
            println!("{}", query);
            Ok(())
        }
    }
}

fn run(args: QueryArgs) -> Result<()> {
    let records = load_records(args.input.as_ref())?;
    log::debug!("loaded {} records", records.len());

    let options = QueryOptions {
        time: TimeFilter {
            field: args.time_field,
            since: args.since,
            last_n: args.last_n_turns,
            from_ts: args.from_ts,
            to_ts: args.to_ts,
        },
        filter: args.filter,
        sort_by: args.sort_by,
        reverse: args.reverse,
        limit: args.limit,
        offset: args.offset,
    };
    let output = run_query(records, &options)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_output(&mut out, &output, args.format)?;
    out.flush().context("Failed to write output")?;

    Ok(())
}

fn load_records(input: Option<&PathBuf>) -> Result<Vec<Record>> {
    match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            read_records(BufReader::new(file))
                .with_context(|| format!("Failed to read records from {}", path.display()))
        }
        None => read_records(io::stdin().lock()).context("Failed to read records from stdin"),
    }
}

fn write_output(out: &mut impl Write, output: &QueryOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Jsonl => {
            for record in &output.records {
                serde_json::to_writer(&mut *out, &record_to_json(record))?;
                writeln!(out)?;
            }
        }
        OutputFormat::Json => {
            let records: Vec<serde_json::Value> = output.records.iter().map(record_to_json).collect();
            let document = serde_json::json!({
                "records": records,
                "pagination": output.pagination,
            });
            serde_json::to_writer_pretty(&mut *out, &document)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
