use crate::error::{LedgerError, Result};
use crate::storage::{Durability, KvBackend, WriteBatch};
use crate::transaction::{Block, Transaction};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Account seeded by every genesis block unless configured otherwise
pub const DEFAULT_ISSUER: &str = "a";

/// Balance written to the issuer by every genesis block unless configured otherwise
pub const INITIAL_ISSUANCE: u64 = 1_000_000_000;

/// Where balance reads go while a block is being applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Reads see only committed state. Transfers in the same block that
    /// touch the same account do not observe each other, so a sender can
    /// spend the same balance twice within one block.
    #[default]
    Committed,
    /// Reads consult the writes already staged for the block first, giving
    /// sequential semantics.
    Pending,
}

/// Issuer account and the balance it receives on every index-0 block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genesis {
    pub issuer: String,
    pub balance: u64,
}

impl Default for Genesis {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_owned(),
            balance: INITIAL_ISSUANCE,
        }
    }
}

/// Summary of one [`Ledger::apply_block`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockOutcome {
    pub applied: usize,
    /// Transfers dropped because the sender could not cover them or the
    /// recipient balance would overflow
    pub skipped: usize,
    /// Puts in the committed batch
    pub writes: usize,
}

/// Account balances stored in a key-value backend, one key per account
pub struct Ledger<B> {
    backend: B,
    read_mode: ReadMode,
    genesis: Genesis,
}

impl<B: KvBackend> Ledger<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            read_mode: ReadMode::default(),
            genesis: Genesis::default(),
        }
    }

    #[must_use]
    pub fn with_read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }

    #[must_use]
    pub fn with_genesis(mut self, genesis: Genesis) -> Self {
        self.genesis = genesis;
        self
    }

    pub const fn genesis(&self) -> &Genesis {
        &self.genesis
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Committed balance of `account`, 0 if it was never written
    pub fn balance(&self, account: &str) -> Result<u64> {
        match self.backend.get(account.as_bytes())? {
            Some(bytes) => {
                bincode::deserialize(&bytes).map_err(|source| LedgerError::MalformedBalance {
                    account: account.to_owned(),
                    source,
                })
            }
            None => Ok(0),
        }
    }

    /// Apply every fundable transfer in `block` and commit them with one
    /// synced batch write.
    ///
    /// A genesis block first overwrites the issuer balance with a synced
    /// put, whatever the issuer held before.
    pub fn apply_block(&mut self, block: &Block) -> Result<BlockOutcome> {
        debug!(
            index = block.index,
            transactions = block.len(),
            "applying block"
        );

        if block.is_genesis() {
            let seed = encode(self.genesis.balance)?;
            self.backend.put(
                self.genesis.issuer.as_bytes(),
                &seed,
                Durability::Sync,
            )?;
            debug!(issuer = %self.genesis.issuer, balance = self.genesis.balance, "seeded issuer");
        }

        let mut pending = match self.read_mode {
            ReadMode::Committed => None,
            ReadMode::Pending => Some(HashMap::new()),
        };
        let mut batch = WriteBatch::new();
        let mut outcome = BlockOutcome::default();

        for tx in &block.transactions {
            match self.transfer(tx, pending.as_ref())? {
                Some((debited, credited)) => {
                    stage(&mut batch, pending.as_mut(), &tx.from, debited)?;
                    stage(&mut batch, pending.as_mut(), &tx.to, credited)?;
                    outcome.applied += 1;
                }
                None => {
                    trace!(from = %tx.from, to = %tx.to, value = tx.value, "skipping transfer");
                    outcome.skipped += 1;
                }
            }
        }

        outcome.writes = batch.len();
        self.backend.write_batch(batch, Durability::Sync)?;

        debug!(
            index = block.index,
            applied = outcome.applied,
            skipped = outcome.skipped,
            "committed block"
        );

        Ok(outcome)
    }

    /// New sender and recipient balances, or `None` when the transfer
    /// cannot be applied.
    fn transfer(
        &self,
        tx: &Transaction,
        pending: Option<&HashMap<String, u64>>,
    ) -> Result<Option<(u64, u64)>> {
        let Some(debited) = self.read(&tx.from, pending)?.checked_sub(tx.value) else {
            return Ok(None);
        };

        // With pending reads a self-transfer must see its own debit.
        let to = if pending.is_some() && tx.to == tx.from {
            debited
        } else {
            self.read(&tx.to, pending)?
        };

        Ok(to.checked_add(tx.value).map(|credited| (debited, credited)))
    }

    fn read(&self, account: &str, pending: Option<&HashMap<String, u64>>) -> Result<u64> {
        match pending.and_then(|staged| staged.get(account)) {
            Some(&balance) => Ok(balance),
            None => self.balance(account),
        }
    }
}

fn stage(
    batch: &mut WriteBatch,
    pending: Option<&mut HashMap<String, u64>>,
    account: &str,
    balance: u64,
) -> Result<()> {
    trace!(account, balance, "batch put");
    batch.put(account.as_bytes(), encode(balance)?);
    if let Some(staged) = pending {
        staged.insert(account.to_owned(), balance);
    }
    Ok(())
}

fn encode(balance: u64) -> Result<Vec<u8>> {
    bincode::serialize(&balance).map_err(LedgerError::Encode)
}
