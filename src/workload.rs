use ledger_core::{Block, Transaction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic accounts and the blocks that move value between them
pub struct Workload {
    issuer: String,
    accounts: Vec<String>,
    genesis_value: u64,
    transfer_value: u64,
    rng: StdRng,
}

impl Workload {
    /// Accounts are named by a run of `prefix_len` `x` characters followed
    /// by their position, so every key shares a long common prefix.
    pub fn new(
        issuer: impl Into<String>,
        count: usize,
        prefix_len: usize,
        genesis_value: u64,
        transfer_value: u64,
        seed: Option<u64>,
    ) -> Self {
        let prefix = "x".repeat(prefix_len);
        let accounts = (0..count).map(|i| format!("{prefix}{i}")).collect();
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Self {
            issuer: issuer.into(),
            accounts,
            genesis_value,
            transfer_value,
            rng,
        }
    }

    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    /// Index-0 block funding every account from the issuer
    pub fn genesis_block(&self) -> Block {
        let txs = self
            .accounts
            .iter()
            .map(|to| Transaction::new(self.issuer.as_str(), to.as_str(), self.genesis_value))
            .collect();

        Block::new(txs, 0)
    }

    /// One transfer per account between uniformly random pairs
    pub fn round_block(&mut self, index: u64) -> Block {
        let n = self.accounts.len();
        if n == 0 {
            return Block::new(Vec::new(), index);
        }

        let txs = (0..n)
            .map(|_| {
                let from = &self.accounts[self.rng.gen_range(0..n)];
                let to = &self.accounts[self.rng.gen_range(0..n)];
                Transaction::new(from.as_str(), to.as_str(), self.transfer_value)
            })
            .collect();

        Block::new(txs, index)
    }
}
