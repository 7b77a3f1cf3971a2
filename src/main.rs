use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use trueno_lcs::algorithms::DEFAULT_MIN_PARALLEL_WIDTH;
use trueno_lcs::{
    compute_lcs, verify_against_sequential, BackendPreference, ComputeBackend, LcsConfig,
    LcsError, SequencePair,
};

#[derive(Parser)]
#[command(name = "trueno-lcs")]
#[command(about = "Longest common subsequence with a wavefront-parallel table fill", long_about = None)]
#[command(version)]
struct Cli {
    /// First sequence (prompted for on stdin when omitted)
    #[arg(value_name = "A")]
    a: Option<String>,

    /// Second sequence (prompted for on stdin when omitted)
    #[arg(value_name = "B")]
    b: Option<String>,

    // ===== Backend Options =====
    /// Compute backend; `auto` tries the GPU and falls back to the CPU wavefront
    #[arg(long, value_enum, default_value_t = BackendPreference::Auto)]
    backend: BackendPreference,

    /// Worker threads for the CPU wavefront (default: all cores)
    #[arg(short = 't', long, value_name = "INT")]
    threads: Option<usize>,

    /// Diagonals narrower than INT are filled on one thread
    #[arg(long, value_name = "INT", default_value_t = DEFAULT_MIN_PARALLEL_WIDTH)]
    min_parallel_width: usize,

    // ===== Output Options =====
    /// Do not print the filled table
    #[arg(long)]
    no_table: bool,

    /// Re-fill sequentially and check the table cell by cell
    #[arg(long)]
    verify: bool,

    /// Verbose level: 1=error, 2=warning, 3=message, 4=debug, 5+=trace
    #[arg(short = 'v', long, value_name = "INT", default_value = "3")]
    verbosity: u8,
}

impl Cli {
    fn config(&self) -> LcsConfig {
        let config = LcsConfig::default()
            .with_backend(self.backend)
            .with_min_parallel_width(self.min_parallel_width);
        match self.threads {
            Some(threads) => config.with_threads(threads),
            None => config,
        }
    }
}

fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::from_default_env();
    // RUST_LOG wins over -v when set
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log_level);
    }
    builder.format_timestamp(None).format_target(false).init();
}

fn read_sequence(input: &mut impl BufRead, label: &str) -> anyhow::Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "Enter sequence {label}: ")?;
    stdout.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_context(|| format!("failed to read sequence {label} from stdin"))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut stdin = io::stdin().lock();
    let a = match cli.a.clone() {
        Some(a) => a,
        None => read_sequence(&mut stdin, "A")?,
    };
    let b = match cli.b.clone() {
        Some(b) => b,
        None => read_sequence(&mut stdin, "B")?,
    };
    drop(stdin);

    let pair = SequencePair::from_strs(&a, &b);
    log::info!("Sequence lengths: m={}, n={}", pair.m(), pair.n());

    let mut backend = ComputeBackend::acquire(&cli.config()).await?;
    let outcome = compute_lcs(&mut backend, &pair)?;

    if cli.verify {
        verify_against_sequential(&pair.encode(), &outcome.table)?;
        log::info!("Table verified against the sequential fill");
    }

    let mut stdout = io::stdout().lock();
    if !cli.no_table {
        write!(stdout, "{}", outcome.table).context("failed to write table")?;
    }
    writeln!(stdout, "The LCS: {}", outcome.as_string()).context("failed to write result")?;

    backend.release();
    Ok(())
}

/// Process exit status for a failed run
///
/// 2 when the requested device could not be acquired or its kernel failed to
/// build, 1 for everything else.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<LcsError>() {
        Some(LcsError::DeviceUnavailable(_) | LcsError::Build { .. }) => 2,
        _ => 1,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}
