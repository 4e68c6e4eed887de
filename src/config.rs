use clap::{Parser, ValueEnum};
use ledger_core::{ledger, Genesis, ReadMode};
use std::path::{Path, PathBuf};

/// Trait for reading benchmark parameters
pub trait Config {
    fn data_dir(&self) -> &Path;
    fn accounts(&self) -> usize;
    fn rounds(&self) -> usize;
    fn prefix_len(&self) -> usize;
    fn genesis_value(&self) -> u64;
    fn transfer_value(&self) -> u64;
    fn genesis(&self) -> Genesis;
    fn read_mode(&self) -> ReadMode;
    fn seed(&self) -> Option<u64>;
    fn verify(&self) -> bool;
    fn in_memory(&self) -> bool;
}

/// How balance reads behave inside a block
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadModeArg {
    /// Read committed state only; same-block transfers can double spend
    Committed,
    /// Read writes staged earlier in the same block first
    Pending,
}

impl From<ReadModeArg> for ReadMode {
    fn from(arg: ReadModeArg) -> Self {
        match arg {
            ReadModeArg::Committed => Self::Committed,
            ReadModeArg::Pending => Self::Pending,
        }
    }
}

/// CLI configuration
#[derive(Parser, Debug)]
#[command(
    name = "ledger-bench",
    about = "Measures per-block write latency of an account ledger on RocksDB",
    version
)]
pub struct CliConfig {
    /// Store directory; deleted at startup if it exists
    #[arg(long, default_value = "testdata")]
    data_dir: PathBuf,

    /// Number of synthetic accounts, also the number of transfers per round
    #[arg(short = 'n', long, default_value_t = 100_000)]
    accounts: usize,

    /// Number of timed rounds after the genesis block
    #[arg(short, long, default_value_t = 200)]
    rounds: usize,

    /// Length of the shared account key prefix
    #[arg(long, default_value_t = 60)]
    prefix_len: usize,

    /// Amount the issuer sends to each account in the genesis block
    #[arg(long, default_value_t = 1_000)]
    genesis_value: u64,

    /// Amount moved by each random transfer
    #[arg(long, default_value_t = 1)]
    transfer_value: u64,

    /// Issuer account seeded by the genesis block
    #[arg(long, default_value = ledger::DEFAULT_ISSUER)]
    issuer: String,

    /// Balance the issuer is seeded with
    #[arg(long, default_value_t = ledger::INITIAL_ISSUANCE)]
    issuance: u64,

    #[arg(long, value_enum, default_value_t = ReadModeArg::Committed)]
    read_mode: ReadModeArg,

    /// Seed for the transfer generator; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Check final balances against applying every transfer in sequence
    #[arg(long, conflicts_with = "memory")]
    verify: bool,

    /// Use the in-memory backend instead of RocksDB
    #[arg(long)]
    memory: bool,
}

impl Config for CliConfig {
    fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn accounts(&self) -> usize {
        self.accounts
    }

    fn rounds(&self) -> usize {
        self.rounds
    }

    fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    fn genesis_value(&self) -> u64 {
        self.genesis_value
    }

    fn transfer_value(&self) -> u64 {
        self.transfer_value
    }

    fn genesis(&self) -> Genesis {
        Genesis {
            issuer: self.issuer.clone(),
            balance: self.issuance,
        }
    }

    fn read_mode(&self) -> ReadMode {
        self.read_mode.into()
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn verify(&self) -> bool {
        self.verify
    }

    fn in_memory(&self) -> bool {
        self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = CliConfig::parse_from(["ledger-bench"]);

        assert_eq!(config.data_dir(), Path::new("testdata"));
        assert_eq!(config.accounts(), 100_000);
        assert_eq!(config.rounds(), 200);
        assert_eq!(config.prefix_len(), 60);
        assert_eq!(config.genesis_value(), 1_000);
        assert_eq!(config.transfer_value(), 1);
        assert_eq!(config.genesis(), Genesis::default());
        assert_eq!(config.read_mode(), ReadMode::Committed);
        assert_eq!(config.seed(), None);
        assert!(!config.verify());
        assert!(!config.in_memory());
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::parse_from([
            "ledger-bench",
            "-n",
            "10",
            "--rounds",
            "3",
            "--read-mode",
            "pending",
            "--seed",
            "7",
            "--issuer",
            "mint",
            "--verify",
        ]);

        assert_eq!(config.accounts(), 10);
        assert_eq!(config.rounds(), 3);
        assert_eq!(config.read_mode(), ReadMode::Pending);
        assert_eq!(config.seed(), Some(7));
        assert_eq!(config.genesis().issuer, "mint");
        assert!(config.verify());
    }

    #[test]
    fn test_rejects_verify_with_memory_backend() {
        let result = CliConfig::try_parse_from(["ledger-bench", "--memory", "--verify"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_unknown_read_mode() {
        let result = CliConfig::try_parse_from(["ledger-bench", "--read-mode", "eventual"]);
        assert!(result.is_err());
    }
}
