use std::collections::BTreeSet;

use tracing::{info, warn};

use super::keys::AssetKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    NotLoaded,
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    /// The key was accounted for but other assets are still outstanding.
    Pending,
    /// The last outstanding key completed; reported once per gate.
    Opened,
    /// Unknown, repeated or late completion; state unchanged.
    Ignored,
}

/// Tracks which required assets are still outstanding. Drawing is allowed only
/// in `Ready`, which is terminal.
#[derive(Debug)]
pub struct AssetGate {
    state: GateState,
    pending: BTreeSet<AssetKey>,
    failed: BTreeSet<AssetKey>,
}

impl Default for AssetGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetGate {
    pub fn new() -> Self {
        Self {
            state: GateState::NotLoaded,
            pending: BTreeSet::new(),
            failed: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == GateState::Ready
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn failed(&self) -> impl Iterator<Item = AssetKey> + '_ {
        self.failed.iter().copied()
    }

    /// Starts tracking `keys`. Only valid from `NotLoaded`; an empty key set
    /// opens the gate immediately.
    pub fn begin(&mut self, keys: &[AssetKey]) -> GateTransition {
        if self.state != GateState::NotLoaded {
            return GateTransition::Ignored;
        }
        self.pending = keys.iter().copied().collect();
        self.state = GateState::Loading;
        info!(pending = self.pending.len(), "asset_gate_loading");
        self.open_if_drained()
    }

    pub fn mark_loaded(&mut self, key: AssetKey) -> GateTransition {
        self.complete(key)
    }

    pub fn mark_failed(&mut self, key: AssetKey, reason: &str) -> GateTransition {
        if self.state != GateState::Loading || !self.pending.contains(&key) {
            return GateTransition::Ignored;
        }
        if self.failed.insert(key) {
            warn!(
                asset = %key,
                reason,
                "asset_load_failed_using_placeholder"
            );
        }
        self.complete(key)
    }

    fn complete(&mut self, key: AssetKey) -> GateTransition {
        if self.state != GateState::Loading || !self.pending.remove(&key) {
            return GateTransition::Ignored;
        }
        self.open_if_drained()
    }

    fn open_if_drained(&mut self) -> GateTransition {
        if !self.pending.is_empty() {
            return GateTransition::Pending;
        }
        self.state = GateState::Ready;
        info!(failed = self.failed.len(), "asset_gate_opened");
        GateTransition::Opened
    }
}
