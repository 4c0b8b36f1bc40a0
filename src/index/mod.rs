pub mod catalog;
pub mod field_index;
pub mod trie;

pub use catalog::Catalog;
pub use field_index::FieldIndex;
pub use trie::PrefixTrie;
