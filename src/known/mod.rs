mod entry;
mod errors;
mod loader;
mod store;
mod writer;

pub use entry::{DigestSet, EntryId, KnownEntry};
pub use errors::KnownSetError;
pub use loader::{HASHDEEP_MAGIC, load_from_reader, load_known_set};
pub use store::{DigestIndex, KnownStore};
pub use writer::{HashdeepWriter, format_record};

#[cfg(test)]
mod tests;
