//! Collection stores.
//!
//! A [`CollectionStore`] owns one file-backed element tree. [`Collection<T>`]
//! layers typed access on top of it via the [`RecordCodec`] and
//! [`NamedRecord`] traits.

mod codec;
mod store;
mod typed;

pub use codec::{NamedRecord, RecordCodec};
pub use store::{CollectionStore, RecordSpec};
pub use typed::{Collection, RecordIter};
