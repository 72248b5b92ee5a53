//! # condensed
//!
//! Persistent, immutable collections that store their content in flat arrays
//! and always pick the smallest representation for their size.
//!
//! ## Overview
//!
//! - **Collections**: [`List`](persistent::List), [`Set`](persistent::Set),
//!   [`Map`](persistent::Map), [`SortedSet`](persistent::SortedSet) and
//!   [`SortedMap`](persistent::SortedMap)
//! - **Array primitives**: [`persistent::array_ops`], the copy, splice,
//!   union and merge functions every collection is built on
//! - **Factories**: `empty_*`, `*_of`, `as_*` and `condense_*` entry points
//! - **Errors**: [`CollectionError`](error::CollectionError)
//!
//! ## Feature Flags
//!
//! - `serde` (default): serialization proxies for every collection
//! - `arc`: share storage through `Arc` instead of `Rc`, which makes every
//!   collection `Send + Sync`
//!
//! ## Example
//!
//! ```rust
//! use condensed::prelude::*;
//!
//! let list = empty_list().with(1);
//! assert_eq!(list.tier(), Tier::Single);
//! assert_eq!(list, list_of([1]));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the collections, their factories and the error type.
///
/// # Usage
///
/// ```rust
/// use condensed::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::CollectionError;
    pub use crate::persistent::*;
}

pub mod error;
pub mod persistent;
