use std::time::Instant;

use crate::core::{QueryError, RecordStore, SearchField};
use crate::index::field_index::FieldIndex;
use crate::query::paginator::{paginate, Page};
use crate::query::resolver::{resolve, ResultSet};
use crate::query::SearchRequest;
use crate::stats::{FieldStats, IndexReport};

/// 只读目录：Record Store + 四个字段索引。
///
/// 启动时一次性构建，之后以 `Arc<Catalog>` 共享给所有查询；没有任何可变状态，
/// 并发读取无需加锁。
#[derive(Clone, Debug)]
pub struct Catalog {
    store: RecordStore,
    fields: [FieldIndex; 4],
}

impl Catalog {
    pub fn build(store: RecordStore) -> Self {
        let t0 = Instant::now();
        let fields = SearchField::ALL.map(|f| FieldIndex::build(store.iter(), f));

        for idx in &fields {
            tracing::debug!(
                "field index {}: {} keys, {} trie nodes",
                idx.field(),
                idx.key_count(),
                idx.trie().node_count()
            );
        }
        tracing::info!(
            "Catalog built: {} records in {:.2?}",
            store.len(),
            t0.elapsed()
        );

        Self { store, fields }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn field(&self, field: SearchField) -> &FieldIndex {
        &self.fields[field.slot()]
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// 前缀查询（未排序、未分页）
    pub fn resolve(&self, query: &str, restriction: Option<SearchField>) -> ResultSet<'_> {
        resolve(self, query, restriction)
    }

    /// resolve + paginate 一条龙
    pub fn search(&self, req: &SearchRequest) -> Result<Page<'_>, QueryError> {
        if req.page_size <= 0 {
            return Err(QueryError::InvalidPageSize(req.page_size));
        }
        let t0 = Instant::now();
        let results = self.resolve(&req.query, req.search_field);
        let matched = results.len();
        let page = paginate(&results, req.sort_field, req.reverse, req.page_size, req.page)?;
        tracing::debug!(
            "search q={:?} field={:?} matched={} page={}/{} in {:.2?}",
            req.query,
            req.search_field,
            matched,
            page.page_num,
            page.max_page,
            t0.elapsed()
        );
        Ok(page)
    }

    pub fn report(&self) -> IndexReport {
        IndexReport {
            record_count: self.store.len(),
            fields: self
                .fields
                .iter()
                .map(|idx| FieldStats {
                    field: idx.field(),
                    key_count: idx.key_count(),
                    trie_nodes: idx.trie().node_count(),
                    postings_total: idx.postings_total(),
                })
                .collect(),
            process_rss_bytes: IndexReport::read_process_rss(),
        }
    }
}
