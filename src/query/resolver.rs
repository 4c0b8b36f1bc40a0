use roaring::RoaringBitmap;

use crate::core::{normalize_key, Record, RecordId, SearchField};
use crate::index::Catalog;

/// 查询结果集：RecordId -> Record。
///
/// 以整数 ID 去重（bitmap），不依赖 Record 的 Eq/Hash；迭代顺序为 ID 升序。
#[derive(Clone, Debug)]
pub struct ResultSet<'a> {
    catalog: &'a Catalog,
    ids: RoaringBitmap,
}

impl<'a> ResultSet<'a> {
    pub fn len(&self) -> usize {
        self.ids.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(id)
    }

    pub fn get(&self, id: RecordId) -> Option<&'a Record> {
        if !self.ids.contains(id) {
            return None;
        }
        self.catalog.store().get(id)
    }

    pub fn ids(&self) -> &RoaringBitmap {
        &self.ids
    }

    /// 按 ID 升序遍历
    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let store = self.catalog.store();
        self.ids.iter().filter_map(move |id| store.get(id))
    }
}

/// 前缀解析：查询串按 key 规则归一化后，在限定字段（或全部四个字段）的 trie 中
/// 取前缀匹配的 key，再把它们的 posting 并起来。空串匹配所有 key。
///
/// 不排序、不分页。
pub fn resolve<'a>(
    catalog: &'a Catalog,
    query: &str,
    restriction: Option<SearchField>,
) -> ResultSet<'a> {
    let prefix = normalize_key(query);

    let mut ids = RoaringBitmap::new();
    match restriction {
        Some(field) => ids |= catalog.field(field).ids_with_prefix(&prefix),
        None => {
            for field in SearchField::ALL {
                ids |= catalog.field(field).ids_with_prefix(&prefix);
            }
        }
    }

    ResultSet { catalog, ids }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MovieEntry, RecordStore};
    use proptest::prelude::*;

    fn entry(title: &str, year: i32, actors: &[&str], genres: &[&str]) -> MovieEntry {
        MovieEntry {
            title: title.to_string(),
            year,
            actor_names: actors.iter().map(|s| s.to_string()).collect(),
            genre_names: genres.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn three() -> Catalog {
        let store = RecordStore::from_entries(vec![
            entry("Saw", 2004, &["Cary Elwes"], &["Horror"]),
            entry("Saw II", 2005, &["Tobin Bell"], &["Horror"]),
            entry("Scream", 1996, &["Neve Campbell"], &["Horror", "Mystery"]),
        ])
        .unwrap();
        Catalog::build(store)
    }

    fn ids(rs: &ResultSet<'_>) -> Vec<u32> {
        rs.ids().iter().collect()
    }

    #[test]
    fn title_prefix_is_case_insensitive() {
        let c = three();
        assert_eq!(ids(&c.resolve("saw", Some(SearchField::Title))), vec![0, 1]);
        assert_eq!(ids(&c.resolve("  SaW ", Some(SearchField::Title))), vec![0, 1]);
        assert_eq!(ids(&c.resolve("saw ii", Some(SearchField::Title))), vec![1]);
    }

    #[test]
    fn empty_query_without_restriction_returns_everything() {
        let c = three();
        let rs = c.resolve("", None);
        assert_eq!(ids(&rs), vec![0, 1, 2]);
        assert_eq!(rs.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(), vec![
            "Saw", "Saw II", "Scream"
        ]);
    }

    #[test]
    fn no_match_is_empty() {
        let c = three();
        let rs = c.resolve("zz", None);
        assert!(rs.is_empty());
        assert_eq!(rs.len(), 0);
    }

    #[test]
    fn all_fields_union_dedups() {
        let c = three();
        // "horror" 命中三条记录的 genre；不会重复计数
        assert_eq!(c.resolve("hor", None).len(), 3);
        // "s" 同时命中 title（saw/scream）与其它字段
        let rs = c.resolve("s", None);
        assert_eq!(ids(&rs), vec![0, 1, 2]);
    }

    #[test]
    fn year_is_matched_as_decimal_prefix() {
        let c = three();
        assert_eq!(ids(&c.resolve("20", Some(SearchField::Year))), vec![0, 1]);
        assert_eq!(ids(&c.resolve("20", None)), vec![0, 1]);
        assert_eq!(ids(&c.resolve("199", None)), vec![2]);
    }

    #[test]
    fn restriction_limits_fields() {
        let c = three();
        assert!(c.resolve("neve", Some(SearchField::Title)).is_empty());
        assert_eq!(ids(&c.resolve("neve", Some(SearchField::Actor))), vec![2]);
        assert_eq!(ids(&c.resolve("myst", Some(SearchField::Genre))), vec![2]);
    }

    #[test]
    fn get_respects_membership() {
        let c = three();
        let rs = c.resolve("scr", Some(SearchField::Title));
        assert!(rs.get(0).is_none());
        assert_eq!(rs.get(2).map(|r| r.year), Some(1996));
        assert!(rs.contains(2));
    }

    proptest! {
        #[test]
        fn resolved_records_really_match(
            titles in prop::collection::vec("[ab]{1,4}", 1..12),
            q in "[ab]{0,2}",
        ) {
            let store = RecordStore::from_entries(
                titles.iter().map(|t| entry(t, 2000, &[t.as_str()], &[])),
            )
            .unwrap();
            let c = Catalog::build(store);
            let rs = c.resolve(&q, None);
            let seen: Vec<u32> = rs.iter().map(|r| r.id).collect();
            let mut dedup = seen.clone();
            dedup.dedup();
            prop_assert_eq!(&seen, &dedup);

            for r in c.store().iter() {
                let hit = normalize_key(&r.title).starts_with(q.as_str())
                    || r.year.to_string().starts_with(q.as_str());
                prop_assert_eq!(rs.contains(r.id), hit);
            }
        }
    }
}
