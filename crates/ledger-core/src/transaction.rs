/// Value minted by [`Transaction::coinbase`]
pub const COINBASE_VALUE: u64 = 1_000_000_000;

/// Transfer of `value` from one account to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub value: u64,
}

impl Transaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, value: u64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            value,
        }
    }

    /// Issuance to the default issuer; an empty `from` marks it as minted.
    pub fn coinbase() -> Self {
        Self::new("", crate::ledger::DEFAULT_ISSUER, COINBASE_VALUE)
    }

    pub fn is_coinbase(&self) -> bool {
        self.from.is_empty()
    }
}

/// Ordered list of transfers applied together with one durable write.
///
/// `index` only labels the block; it is not derived from the contents.
/// Index 0 marks the genesis block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub transactions: Vec<Transaction>,
    pub index: u64,
}

impl Block {
    pub const fn new(transactions: Vec<Transaction>, index: u64) -> Self {
        Self {
            transactions,
            index,
        }
    }

    pub const fn is_genesis(&self) -> bool {
        self.index == 0
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
