use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use taxdiv_split::category_map::{CategoryMap, TABLE_VERSION};
use taxdiv_split::{split_archive, CoarseCategory, SplitConfig, SplitError, SplitStats};

#[derive(Parser)]
#[command(name = "taxdiv-split")]
#[command(about = "Keep only the FASTA records of one taxonomic category")]
#[command(version)]
#[command(long_about = "
Streams a FASTA archive (stdin by default) and writes to stdout the records whose
label row falls into CATEGORY. The label file has one tab-delimited row per FASTA
record, in the same order: <id>\\t<unused>\\t<division code>.

Examples:
  blastdbcmd -db nr -entry all -ctrl_a | taxdiv-split nr_headers MAM > nr_mam.fa
  taxdiv-split nr_headers.gz VRL -i nr.fa.gz -o nr_vrl.fa
  taxdiv-split --list-codes
")]
struct Cli {
    /// Label file (tab-delimited, optionally .gz)
    #[arg(required_unless_present = "list_codes")]
    labels: Option<PathBuf>,

    /// Category to keep: MAM, BCT, VRL or OTR
    #[arg(required_unless_present = "list_codes")]
    category: Option<String>,

    /// FASTA input (default: stdin; .gz is decompressed)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Label rows buffered per read
    #[arg(long, default_value_t = taxdiv_split::config::DEFAULT_LABEL_BATCH_SIZE)]
    batch_size: usize,

    /// Print the division code table and exit
    #[arg(long)]
    list_codes: bool,

    /// Hide the progress spinner
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = run(cli, &mut io::stdout().lock());
    if let Err(e) = &result {
        eprintln!("error: {e}");
    }
    process::exit(exit_code(&result));
}

/// 0 on a clean pass, 1 on any fatal error.
fn exit_code<T>(result: &Result<T, SplitError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Executes one invocation. `listing` receives `--list-codes` output; FASTA
/// output goes where `cli.output` says.
fn run<W: Write>(cli: Cli, listing: &mut W) -> Result<Option<SplitStats>, SplitError> {
    if cli.list_codes {
        writeln!(listing, "# division table v{TABLE_VERSION}")?;
        for (code, category) in CategoryMap::canonical().codes() {
            writeln!(listing, "{code}\t{category}")?;
        }
        listing.flush()?;
        return Ok(None);
    }

    // clap enforces both positionals unless --list-codes is set
    let (Some(labels), Some(category)) = (cli.labels, cli.category) else {
        return Ok(None);
    };
    // checked before any input is opened
    let category: CoarseCategory = category.parse()?;

    let mut config = SplitConfig::new(labels, category).with_label_batch_size(cli.batch_size);
    config.fasta_path = cli.input;
    config.output_path = cli.output;

    let spinner = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&[
                    "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
                ])
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message(format!("Splitting out {category} records..."));
        spinner
    };

    let stats = split_archive(&config, spinner)?;
    log::info!("Done: {stats}");
    Ok(Some(stats))
}
