use crate::config::Config;
use crate::expected::ExpectedBalances;
use crate::workload::Workload;
use anyhow::{Context, Result};
use ledger_core::{Block, KvBackend, Ledger, MemoryBackend, RocksBackend};
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of one benchmark run
#[derive(Debug, Default)]
pub struct Report {
    /// Wall-clock time of every timed round, genesis excluded
    pub round_times: Vec<Duration>,
    /// `Some` when final balances were checked against sequential application
    pub verified: Option<bool>,
    /// Blocks fed to the sequential model, 0 without verification
    pub replayed_blocks: usize,
}

/// Run the benchmark, writing progress and timing lines to `out`.
pub fn run<C: Config, W: Write>(config: &C, out: &mut W) -> Result<Report> {
    if config.in_memory() {
        let mut ledger = ledger_for(config, MemoryBackend::new());
        return bench(config, &mut ledger, out);
    }

    reset_data_dir(config.data_dir())?;
    let backend = RocksBackend::open(config.data_dir())
        .with_context(|| format!("Failed to open store at {}", config.data_dir().display()))?;
    let mut ledger = ledger_for(config, backend);

    let report = bench(config, &mut ledger, out)?;

    ledger
        .into_backend()
        .close()
        .context("Failed to close store")?;

    Ok(report)
}

fn ledger_for<C: Config, B: KvBackend>(config: &C, backend: B) -> Ledger<B> {
    Ledger::new(backend)
        .with_read_mode(config.read_mode())
        .with_genesis(config.genesis())
}

fn reset_data_dir(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            info!("Removed existing data directory {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to remove data directory {}", path.display()))
        }
    }
}

fn bench<C: Config, B: KvBackend, W: Write>(
    config: &C,
    ledger: &mut Ledger<B>,
    out: &mut W,
) -> Result<Report> {
    let genesis = config.genesis();
    let mut workload = Workload::new(
        genesis.issuer.as_str(),
        config.accounts(),
        config.prefix_len(),
        config.genesis_value(),
        config.transfer_value(),
        config.seed(),
    );
    let mut expected = config.verify().then(|| ExpectedBalances::new(genesis));

    let block = workload.genesis_block();
    info!("Applying genesis block with {} transactions", block.len());
    apply(ledger, &block, out)?;
    if let Some(expected) = expected.as_mut() {
        expected.apply(&block);
    }

    let mut report = Report::default();

    for round in 0..config.rounds() {
        let block = workload.round_block(round as u64 + 1);

        let start = Instant::now();
        let outcome = apply(ledger, &block, out)?;
        let elapsed = start.elapsed();

        writeln!(out, "execution time:{} ms", elapsed.as_millis())
            .context("Failed to write timing")?;
        debug!(
            "Round {}: applied {}, skipped {}",
            round + 1,
            outcome.applied,
            outcome.skipped
        );

        report.round_times.push(elapsed);
        if let Some(expected) = expected.as_mut() {
            expected.apply(&block);
        }
    }

    if let Some(expected) = expected {
        let matched = verify(ledger, &expected, workload.accounts())?;
        writeln!(out, "expected: {matched}").context("Failed to write verification")?;
        report.verified = Some(matched);
        report.replayed_blocks = expected.blocks();
    }

    info!("Completed {} rounds", report.round_times.len());

    Ok(report)
}

fn apply<B: KvBackend, W: Write>(
    ledger: &mut Ledger<B>,
    block: &Block,
    out: &mut W,
) -> Result<ledger_core::BlockOutcome> {
    writeln!(out, "begin process block").context("Failed to write progress")?;
    ledger
        .apply_block(block)
        .with_context(|| format!("Failed to apply block {}", block.index))
}

/// Compare the issuer and every account against the sequential model.
fn verify<B: KvBackend>(
    ledger: &Ledger<B>,
    expected: &ExpectedBalances,
    accounts: &[String],
) -> Result<bool> {
    let issuer = &ledger.genesis().issuer;
    let mut mismatches = 0;

    for account in std::iter::once(issuer).chain(accounts) {
        let want = expected.balance(account);
        let got = ledger.balance(account)?;
        if want != got {
            warn!("Balance mismatch for {account}: expected {want}, got {got}");
            mismatches += 1;
        }
    }

    if mismatches > 0 {
        warn!("{mismatches} balances differ from sequential application");
    }

    Ok(mismatches == 0)
}
