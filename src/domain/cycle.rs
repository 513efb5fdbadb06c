//! Wallet Cycle State
//!
//! Per-wallet accumulator for one forward + reverse pass. Owned by a single
//! wallet run and dropped once its reverses complete.

use alloy::primitives::{Address, U256};
use std::collections::BTreeSet;

use super::swap::SwapReport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleState {
    touched: BTreeSet<Address>,
    pub forward_succeeded: u32,
    pub forward_failed: u32,
    pub reverse_succeeded: u32,
    pub reverse_attempted: u32,
}

impl CycleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a token as touched. Called before the forward swap runs, so a
    /// failed attempt still makes the token eligible for reversal.
    pub fn touch(&mut self, token: Address) {
        self.touched.insert(token);
    }

    pub fn touched(&self) -> impl Iterator<Item = &Address> {
        self.touched.iter()
    }

    pub fn touched_count(&self) -> usize {
        self.touched.len()
    }

    pub fn record_forward(&mut self, report: &SwapReport) {
        if report.is_success() {
            self.forward_succeeded += 1;
        } else {
            self.forward_failed += 1;
        }
    }

    pub fn record_reverse(&mut self, report: &SwapReport) {
        self.reverse_attempted += 1;
        if report.is_success() {
            self.reverse_succeeded += 1;
        }
    }

    pub fn forward_total(&self) -> u32 {
        self.forward_succeeded + self.forward_failed
    }

    pub fn into_report(self, final_native: Option<U256>) -> CycleReport {
        CycleReport {
            tokens_touched: self.touched.len(),
            forward_succeeded: self.forward_succeeded,
            forward_failed: self.forward_failed,
            reverse_succeeded: self.reverse_succeeded,
            reverse_attempted: self.reverse_attempted,
            final_native,
        }
    }
}

/// Summary of one wallet's cycle, used for logging and loop control only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub tokens_touched: usize,
    pub forward_succeeded: u32,
    pub forward_failed: u32,
    pub reverse_succeeded: u32,
    pub reverse_attempted: u32,
    pub final_native: Option<U256>,
}
