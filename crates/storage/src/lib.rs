//! Storage for the Comb genesis and chain state: dense columns, typed tables over
//! them, the codecs those tables use and write batches applied as one unit.
//!
//! The crate holds no backend of its own. Anything implementing
//! [`kv_store::KeyValueInspect`] with [`column::Column`] gets typed table access.

#![deny(clippy::arithmetic_side_effects)]
#![deny(clippy::cast_possible_truncation)]
#![deny(missing_docs)]

pub mod codec;
pub mod column;
pub mod kv_store;
pub mod storage_key;
pub mod structured_storage;
pub mod tables;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
pub mod transactional;

pub use storage_key::StorageKey;

/// The storage result alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Failure of a storage read or write.
#[derive(Debug, derive_more::Display, derive_more::From)]
#[non_exhaustive]
pub enum Error {
    /// A stored value doesn't decode into the table's value type.
    #[display(fmt = "corrupted table entry: {_0}")]
    Codec(anyhow::Error),
    /// The backend refused the operation.
    #[display(fmt = "storage backend failure: {_0:?}")]
    Backend(Box<dyn core::fmt::Debug + Send + Sync>),
    /// Anything else, like a write batch naming an unknown column.
    #[from]
    Other(anyhow::Error),
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_layer() {
        assert_eq!(
            Error::Codec(anyhow::anyhow!("unexpected end of input")).to_string(),
            "corrupted table entry: unexpected end of input"
        );
        assert_eq!(
            Error::Backend(Box::new("disk is full")).to_string(),
            "storage backend failure: \"disk is full\""
        );
        let other: Error = anyhow::anyhow!("unknown column 42").into();
        assert_eq!(other.to_string(), "unknown column 42");
    }
}
