use std::collections::HashMap;

use roaring::RoaringBitmap;

use crate::core::{Record, SearchField};
use crate::index::trie::PrefixTrie;

/// 单字段索引：posting 表（精确 key -> RecordId 集合）+ 该字段 key 的前缀树。
///
/// ## 不变量
/// - id 出现在 `postings[k]` 中 ⇔ 该记录在此字段上的归一化值等于 k（精确匹配）。
/// - k 在 trie 中为 terminal ⇔ k 是 `postings` 的 key。
#[derive(Clone, Debug)]
pub struct FieldIndex {
    field: SearchField,
    postings: HashMap<String, RoaringBitmap>,
    trie: PrefixTrie,
}

impl FieldIndex {
    /// 从全量记录构建。输入假定已校验，无可恢复错误路径。
    pub fn build<'a, I>(records: I, field: SearchField) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut postings: HashMap<String, RoaringBitmap> = HashMap::new();
        let mut trie = PrefixTrie::new();

        for record in records {
            for key in field.keys(record) {
                // 每个 key 只进 trie 一次
                if !postings.contains_key(&key) {
                    trie.insert(&key);
                }
                postings.entry(key).or_default().insert(record.id);
            }
        }

        Self {
            field,
            postings,
            trie,
        }
    }

    pub fn field(&self) -> SearchField {
        self.field
    }

    pub fn trie(&self) -> &PrefixTrie {
        &self.trie
    }

    /// 精确 key 的 posting
    pub fn postings(&self, key: &str) -> Option<&RoaringBitmap> {
        self.postings.get(key)
    }

    /// 前缀匹配：所有以 `prefix` 开头的 key 的 posting 并集（已去重）
    pub fn ids_with_prefix(&self, prefix: &str) -> RoaringBitmap {
        let mut out = RoaringBitmap::new();
        for key in self.trie.query(prefix) {
            if let Some(ids) = self.postings.get(&key) {
                out |= ids;
            }
        }
        out
    }

    pub fn key_count(&self) -> usize {
        self.postings.len()
    }

    /// 所有 posting 的 id 总数（一个记录在多个 key 下会被计多次）
    pub fn postings_total(&self) -> u64 {
        self.postings.values().map(|b| b.len()).sum()
    }
}
