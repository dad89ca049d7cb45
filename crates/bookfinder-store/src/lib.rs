// SQLite-backed key-value slots
// Each slot holds one serialized value that is overwritten as a whole

pub mod slots;

pub use slots::{SlotStore, StoreError};
