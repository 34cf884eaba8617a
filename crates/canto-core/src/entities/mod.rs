//! Phrasebook entity structs.
//!
//! Entries are deserialized from the per-section JSON data files written by
//! the phrasebook export step. All structs derive `Serialize` and
//! `Deserialize` so they can be echoed back in JSON output.

mod entry;

pub use entry::{Entry, EntryId};
