use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossbeam_channel::bounded;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use keysearch::oracle::{DigestVerifier, Verifier};
use keysearch::progress::{BarProgress, NoProgress, ProgressObserver};
use keysearch::search::config::{load_dictionary, Slot};
use keysearch::search::{
    chunk_range, run_parallel_search, ParallelConfig, SearchConfig, SearchSpace,
};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "keysearch")]
#[command(about = "keysearch - recover a credential passphrase by keyspace search")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the passphrase space of a credential
    #[command(alias = "bf")]
    Bruteforce {
        /// Target credential identifier
        target: String,

        // --- Space selection ---
        /// Characters for unknown positions (default: printable ASCII)
        #[arg(long)]
        charset: Option<String>,
        /// Password pattern, '?' marks an unknown position (e.g. "pa??w0rd")
        #[arg(long)]
        pattern: Option<String>,
        /// Password length when no pattern is given
        #[arg(long)]
        pwlen: Option<usize>,
        /// File with one candidate passphrase per line
        #[arg(long)]
        dictionary: Option<PathBuf>,

        // --- Work split ---
        /// Number of worker threads (default: CPU count)
        #[arg(long, short = 'j')]
        workers: Option<usize>,
        /// Zero-based chunk to search
        #[arg(long, default_value = "0")]
        chunk: u64,
        /// Number of chunks the space is split into
        #[arg(long, default_value = "1")]
        chunks: u64,
        /// Resume offset reported by an interrupted run
        #[arg(long, default_value = "0")]
        resume: u64,

        // --- Output ---
        /// Minimum milliseconds between progress updates
        #[arg(long, default_value = "250")]
        progress_ms: u64,
        /// Do not draw the progress bar
        #[arg(long, short)]
        quiet: bool,
    },
    /// Check a single passphrase against a credential
    #[command(alias = "ul")]
    Unlock {
        /// Target credential identifier
        target: String,
        /// Passphrase to try; read from stdin when omitted
        passphrase: Option<String>,
    },
    /// Print the credential identifier the bundled verifier expects for a passphrase
    Digest {
        /// Passphrase to derive the identifier from
        passphrase: String,
    },
}

fn init_tracing(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print what is about to be searched.
fn print_summary(space: &SearchSpace, config: &ParallelConfig) {
    match (space.charset(), space.slots()) {
        (Some(charset), Some(slots)) => {
            let charset: String = charset.iter().collect();
            let pattern: String = slots
                .iter()
                .map(|s| match s {
                    Slot::Literal(c) => *c,
                    Slot::Wildcard => '?',
                })
                .collect();
            let unknown = slots.iter().filter(|s| s.is_wildcard()).count();
            eprintln!("Using character set: {}", charset);
            eprintln!("Pattern: {}", pattern);
            eprintln!("Unknown chars: {}", unknown);
            eprintln!("Password length: {}", slots.len());
            eprintln!("Total passphrase space size: {}", space.size());
        }
        _ => eprintln!("Number of passphrases to try: {}", space.size()),
    }

    if config.chunks > 1 {
        if let Ok(range) = chunk_range(space.size(), config.chunk, config.chunks) {
            eprintln!(
                "Chunk passphrase space size: {}  Starting from point: {}",
                range.size, range.start
            );
        }
    }
    if config.resume_offset > 0 {
        eprintln!("Resuming each worker at offset: {}", config.resume_offset);
    }
    eprintln!("Workers: {}", config.num_workers);
}

#[allow(clippy::too_many_arguments)]
fn bruteforce(
    target: String,
    charset: Option<String>,
    pattern: Option<String>,
    pwlen: Option<usize>,
    dictionary: Option<PathBuf>,
    parallel_config: ParallelConfig,
    quiet: bool,
) -> Result<()> {
    let mut search_config = SearchConfig::default()
        .with_charset_option(charset)
        .with_pattern_option(pattern)
        .with_pwlen_option(pwlen);
    if let Some(path) = dictionary {
        let words = load_dictionary(&path)?;
        search_config = search_config.with_dictionary(words);
    }

    let space = SearchSpace::from_config(&search_config).context("invalid search space")?;
    print_summary(&space, &parallel_config);

    let (interrupt_tx, interrupt_rx) = bounded(1);
    ctrlc::set_handler(move || {
        eprintln!("\n(interrupt)");
        let _ = interrupt_tx.try_send(());
    })
    .context("failed to install interrupt handler")?;

    let observer: Box<dyn ProgressObserver> = if quiet {
        Box::new(NoProgress)
    } else {
        let total = chunk_range(space.size(), parallel_config.chunk, parallel_config.chunks)
            .map(|r| r.size)
            .unwrap_or_else(|_| space.size());
        Box::new(BarProgress::new(total))
    };

    let result = run_parallel_search(
        &target,
        &space,
        Arc::new(DigestVerifier),
        &parallel_config,
        observer,
        interrupt_rx,
    )?;

    println!("{}", result.outcome.terminal_line(&target));
    for line in result.statistics.format_summary().lines() {
        info!("{}", line);
    }
    Ok(())
}

/// Read one passphrase line from stdin, without its line ending.
fn read_passphrase() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read passphrase from stdin")?;
    let passphrase = line.strip_suffix('\n').unwrap_or(&line);
    let passphrase = passphrase.strip_suffix('\r').unwrap_or(passphrase);
    Ok(passphrase.to_string())
}

fn unlock(target: &str, passphrase: Option<String>) -> Result<()> {
    let passphrase = match passphrase {
        Some(passphrase) => passphrase,
        None => read_passphrase()?,
    };
    let unlocked = DigestVerifier
        .verify(target, &passphrase)
        .context("unlock failed")?;
    if unlocked.is_some() {
        println!("unlock succeeded");
    } else {
        println!("unlock failed");
    }
    Ok(())
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Bruteforce {
            target,
            charset,
            pattern,
            pwlen,
            dictionary,
            workers,
            chunk,
            chunks,
            resume,
            progress_ms,
            quiet,
        } => {
            let parallel_config = ParallelConfig::default()
                .with_workers_option(workers)
                .with_chunk(chunk, chunks)
                .with_resume_offset(resume)
                .with_progress_interval(Duration::from_millis(progress_ms));
            bruteforce(
                target,
                charset,
                pattern,
                pwlen,
                dictionary,
                parallel_config,
                quiet,
            )
        }
        Commands::Unlock { target, passphrase } => unlock(&target, passphrase),
        Commands::Digest { passphrase } => {
            println!("{}", DigestVerifier::identifier_for(&passphrase));
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if let Err(e) = run(args.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
