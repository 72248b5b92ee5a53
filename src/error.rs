//! Error types for collection operations.
//!
//! Every fallible operation in this crate fails immediately and synchronously
//! with a [`CollectionError`]. Since no container is ever mutated in place, a
//! failed call leaves all existing instances exactly as they were.

/// Represents errors raised by collection operations.
///
/// # Examples
///
/// ```rust
/// use condensed::error::CollectionError;
/// use condensed::persistent::list_of;
///
/// let list = list_of([1, 2, 3]);
/// assert_eq!(
///     list.get(5),
///     Err(CollectionError::OutOfRange { index: 5, length: 3 })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// A required value was absent, e.g. a serialized payload ended before
    /// the declared number of elements.
    MissingArgument {
        /// Name of the missing argument.
        argument: &'static str,
    },
    /// An index was outside the valid bounds of the operation.
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The length the index was checked against.
        length: usize,
    },
    /// An ordering or element type was incompatible with what the container
    /// expects.
    TypeMismatch {
        /// What the container expected.
        expected: &'static str,
        /// What was actually supplied.
        found: String,
    },
    /// A positional set/map accessor was called beyond the live entry count.
    NoSuchKey {
        /// The requested position.
        index: usize,
        /// The number of live entries.
        length: usize,
    },
}

impl std::fmt::Display for CollectionError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingArgument { argument } => {
                write!(formatter, "missing argument: {argument}")
            }
            Self::OutOfRange { index, length } => {
                write!(
                    formatter,
                    "index {index} out of range for length {length}"
                )
            }
            Self::TypeMismatch { expected, found } => {
                write!(formatter, "type mismatch: expected {expected}, found {found}")
            }
            Self::NoSuchKey { index, length } => {
                write!(
                    formatter,
                    "no entry at position {index}, collection has {length} entries"
                )
            }
        }
    }
}

impl std::error::Error for CollectionError {}
