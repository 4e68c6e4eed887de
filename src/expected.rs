use ledger_core::{Block, Genesis};
use std::collections::HashMap;

/// Balances every account should hold if each block were applied one
/// transfer at a time, with no store involved.
pub struct ExpectedBalances {
    genesis: Genesis,
    balances: HashMap<String, u64>,
    blocks: usize,
}

impl ExpectedBalances {
    pub fn new(genesis: Genesis) -> Self {
        Self {
            genesis,
            balances: HashMap::new(),
            blocks: 0,
        }
    }

    pub fn apply(&mut self, block: &Block) {
        if block.is_genesis() {
            self.balances
                .insert(self.genesis.issuer.clone(), self.genesis.balance);
        }

        for tx in &block.transactions {
            let from = self.balance(&tx.from);
            let to = self.balance(&tx.to);
            if from < tx.value || (tx.from != tx.to && to.checked_add(tx.value).is_none()) {
                continue;
            }
            if tx.from != tx.to {
                self.balances.insert(tx.from.clone(), from - tx.value);
                self.balances.insert(tx.to.clone(), to + tx.value);
            }
        }

        self.blocks += 1;
    }

    pub fn balance(&self, account: &str) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Number of blocks applied so far
    pub const fn blocks(&self) -> usize {
        self.blocks
    }
}
