//! Records that keep a stable identity for as long as they are stored.

/// A stored record addressed by a typed key (a vehicle by VIN, a contract by ledger id).
pub trait Entity {
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;
}
