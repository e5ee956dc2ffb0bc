//! Purchase-order ledger seam.
//!
//! The store hands every approved purchase order to a [`Ledger`] and records
//! the returned receipt. [`MockLedger`] stands in for the real chain: it
//! derives the transaction hash from the PO number and draws a block number
//! from a seeded RNG.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

use crate::error::LedgerError;
use crate::model::{LedgerReceipt, PurchaseOrder};

/// Lowest block number handed out by the mock ledger.
pub const BASE_BLOCK_NUMBER: u64 = 18_000_000;
const BLOCK_NUMBER_SPAN: u64 = 10_000_000;
const HASH_HEX_LEN: usize = 64;

pub trait Ledger {
    fn submit(&mut self, po: &PurchaseOrder) -> Result<LedgerReceipt, LedgerError>;
}

impl<L: Ledger + ?Sized> Ledger for Box<L> {
    fn submit(&mut self, po: &PurchaseOrder) -> Result<LedgerReceipt, LedgerError> {
        (**self).submit(po)
    }
}

/// `0x` + the PO number's `[0-9A-Z]` characters, right-padded with `0` to 64.
pub fn transaction_hash(po_number: &str) -> String {
    let body: String = po_number
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        .take(HASH_HEX_LEN)
        .collect();
    format!("0x{body:0<width$}", width = HASH_HEX_LEN)
}

/// Deterministic stand-in for the purchase-order chain.
#[derive(Debug, Clone)]
pub struct MockLedger {
    rng: Mcg128Xsl64,
    submitted: usize,
}

impl MockLedger {
    /// Ledger seeded from entropy.
    pub fn new() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
            submitted: 0,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
            submitted: 0,
        }
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for MockLedger {
    fn submit(&mut self, po: &PurchaseOrder) -> Result<LedgerReceipt, LedgerError> {
        let block_number = BASE_BLOCK_NUMBER + self.rng.gen_range(0..BLOCK_NUMBER_SPAN);
        self.submitted += 1;

        let receipt = LedgerReceipt {
            transaction_hash: transaction_hash(&po.number),
            block_number,
        };
        tracing::debug!(po = %po.number, block = block_number, "purchase order recorded on ledger");
        Ok(receipt)
    }
}

/// Ledger that rejects everything, for exercising failure paths.
#[derive(Debug, Clone, Default)]
pub struct RejectingLedger {
    pub reason: String,
}

impl Ledger for RejectingLedger {
    fn submit(&mut self, po: &PurchaseOrder) -> Result<LedgerReceipt, LedgerError> {
        Err(LedgerError::Rejected {
            po_number: po.number.clone(),
            message: self.reason.clone(),
        })
    }
}
