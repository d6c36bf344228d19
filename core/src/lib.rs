pub mod analysis;
pub mod error;
pub mod extract;
pub mod index;
pub mod matcher;
pub mod persist;
pub mod query;

/// Document id, assigned by corpus enumeration order starting at 1.
pub type DocId = u32;
/// Dense term id, assigned in first-seen scan order.
pub type TermId = u32;
/// Zero-based token offset within a document's whitespace-split sequence.
/// Stopwords occupy position slots even though they are never stored.
pub type Position = u32;

pub use error::Error;
pub use index::{Index, PostingsStore, TermDictionary};
pub use query::{Query, QueryKind};
