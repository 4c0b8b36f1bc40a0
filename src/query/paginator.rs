use std::borrow::Cow;
use std::cmp::Ordering;

use crate::core::{QueryError, Record, SortField};
use crate::query::resolver::ResultSet;

/// 一页结果 + 页码状态（调用方无需再算一次）
#[derive(Clone, Debug)]
pub struct Page<'a> {
    pub items: Vec<&'a Record>,
    /// 总页数，至少为 1（空结果也有一页）
    pub max_page: u64,
    /// 钳位后的实际页码，∈ [1, max_page]
    pub page_num: u64,
    /// 命中总数（分页前）
    pub total: usize,
}

impl Page<'_> {
    pub fn has_prev(&self) -> bool {
        self.page_num > 1
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Text(Cow<'a, str>),
    Number(i32),
}

fn sort_key(record: &Record, field: SortField) -> SortKey<'_> {
    match field {
        SortField::Title => SortKey::Text(Cow::Borrowed(record.title.as_str())),
        SortField::Year => SortKey::Number(record.year),
        SortField::Actors => SortKey::Text(Cow::Owned(record.actors_joined())),
        SortField::Genres => SortKey::Text(Cow::Owned(record.genres_joined())),
    }
}

/// `max(1, ceil(count / page_size))`；page_size 必须 >= 1
pub fn max_page(count: usize, page_size: u64) -> u64 {
    (count as u64).div_ceil(page_size).max(1)
}

/// 页码钳位到 `[1, max_page]`
pub fn effective_page(requested: i64, max_page: u64) -> u64 {
    if requested < 1 {
        1
    } else {
        (requested as u64).min(max_page)
    }
}

/// 排序 + 切页。
///
/// 排序前的顺序是 ID 升序；排序是稳定的，`reverse` 只翻转比较方向，
/// 相等 key 之间依旧保持 ID 升序。
pub fn paginate<'a>(
    results: &ResultSet<'a>,
    sort_field: SortField,
    reverse: bool,
    page_size: i64,
    requested_page: i64,
) -> Result<Page<'a>, QueryError> {
    if page_size <= 0 {
        return Err(QueryError::InvalidPageSize(page_size));
    }
    let page_size = page_size as u64;

    let mut keyed: Vec<(SortKey<'a>, &'a Record)> = results
        .iter()
        .map(|r| (sort_key(r, sort_field), r))
        .collect();
    // sort_by 为稳定排序
    keyed.sort_by(|(a, _), (b, _)| {
        let ord: Ordering = a.cmp(b);
        if reverse {
            ord.reverse()
        } else {
            ord
        }
    });

    let total = keyed.len();
    let max_page = max_page(total, page_size);
    let page_num = effective_page(requested_page, max_page);

    let start = usize::try_from((page_num - 1).saturating_mul(page_size))
        .unwrap_or(usize::MAX)
        .min(total);
    let end = usize::try_from(page_num.saturating_mul(page_size))
        .unwrap_or(usize::MAX)
        .min(total);
    let items = keyed[start..end].iter().map(|(_, r)| *r).collect();

    Ok(Page {
        items,
        max_page,
        page_num,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MovieEntry, RecordStore, SearchField};
    use crate::index::Catalog;
    use proptest::prelude::*;

    fn entry(title: &str, year: i32, actors: &[&str]) -> MovieEntry {
        MovieEntry {
            title: title.to_string(),
            year,
            actor_names: actors.iter().map(|s| s.to_string()).collect(),
            genre_names: Vec::new(),
        }
    }

    fn catalog(entries: Vec<MovieEntry>) -> Catalog {
        Catalog::build(RecordStore::from_entries(entries).unwrap())
    }

    fn three() -> Catalog {
        catalog(vec![
            entry("Saw", 2004, &["Cary Elwes"]),
            entry("Saw II", 2005, &["Tobin Bell"]),
            entry("Scream", 1996, &["Neve Campbell"]),
        ])
    }

    fn page_ids(p: &Page<'_>) -> Vec<u32> {
        p.items.iter().map(|r| r.id).collect()
    }

    #[test]
    fn page_arithmetic() {
        assert_eq!(max_page(0, 10), 1);
        assert_eq!(max_page(10, 10), 1);
        assert_eq!(max_page(11, 10), 2);
        assert_eq!(effective_page(-3, 4), 1);
        assert_eq!(effective_page(0, 4), 1);
        assert_eq!(effective_page(3, 4), 3);
        assert_eq!(effective_page(99, 4), 4);
    }

    #[test]
    fn title_prefix_second_page_of_one() {
        let c = three();
        let rs = c.resolve("saw", Some(SearchField::Title));
        let p = paginate(&rs, SortField::Title, false, 1, 2).unwrap();
        assert_eq!(page_ids(&p), vec![1]);
        assert_eq!(p.max_page, 2);
        assert_eq!(p.page_num, 2);
        assert!(p.has_prev());
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let c = three();
        let rs = c.resolve("", None);
        let p = paginate(&rs, SortField::Title, false, 10, 99).unwrap();
        assert_eq!(p.page_num, 1);
        assert_eq!(p.max_page, 1);
        assert_eq!(p.items.len(), 3);
        assert!(!p.has_prev());
    }

    #[test]
    fn empty_results_have_one_empty_page() {
        let c = three();
        let rs = c.resolve("zz", None);
        let p = paginate(&rs, SortField::Year, true, 5, 3).unwrap();
        assert!(p.items.is_empty());
        assert_eq!(p.max_page, 1);
        assert_eq!(p.page_num, 1);
        assert_eq!(p.total, 0);
    }

    #[test]
    fn non_positive_page_size_rejected() {
        let c = three();
        let rs = c.resolve("", None);
        assert_eq!(
            paginate(&rs, SortField::Title, false, 0, 1).unwrap_err(),
            QueryError::InvalidPageSize(0)
        );
        assert_eq!(
            paginate(&rs, SortField::Title, false, -4, 1).unwrap_err(),
            QueryError::InvalidPageSize(-4)
        );
    }

    #[test]
    fn sort_by_each_field() {
        let c = three();
        let rs = c.resolve("", None);
        let by = |f, rev| page_ids(&paginate(&rs, f, rev, 10, 1).unwrap());
        assert_eq!(by(SortField::Year, false), vec![2, 0, 1]);
        assert_eq!(by(SortField::Year, true), vec![1, 0, 2]);
        assert_eq!(by(SortField::Title, true), vec![2, 1, 0]);
        // "Cary Elwes" < "Neve Campbell" < "Tobin Bell"
        assert_eq!(by(SortField::Actors, false), vec![0, 2, 1]);
        // genres 全空：全部相等，保持 ID 顺序
        assert_eq!(by(SortField::Genres, false), vec![0, 1, 2]);
        assert_eq!(by(SortField::Genres, true), vec![0, 1, 2]);
    }

    #[test]
    fn reverse_keeps_tie_order() {
        let c = catalog(vec![
            entry("B", 2000, &[]),
            entry("A", 2001, &[]),
            entry("C", 2000, &[]),
            entry("D", 2001, &[]),
        ]);
        let rs = c.resolve("", None);
        let asc = paginate(&rs, SortField::Year, false, 10, 1).unwrap();
        assert_eq!(page_ids(&asc), vec![0, 2, 1, 3]);
        let desc = paginate(&rs, SortField::Year, true, 10, 1).unwrap();
        assert_eq!(page_ids(&desc), vec![1, 3, 0, 2]);
    }

    #[test]
    fn last_page_is_short() {
        let entries = (0..7).map(|i| entry(&format!("t{i}"), 2000 + i, &[])).collect();
        let c = catalog(entries);
        let rs = c.resolve("t", Some(SearchField::Title));
        let p = paginate(&rs, SortField::Year, false, 3, 3).unwrap();
        assert_eq!(p.max_page, 3);
        assert_eq!(page_ids(&p), vec![6]);
    }

    proptest! {
        #[test]
        fn beyond_last_page_equals_last_page(
            years in prop::collection::vec(1990i32..1995, 0..40),
            size in 1i64..7,
            extra in 1i64..10,
        ) {
            let entries = years.iter().map(|&y| entry("x", y, &[])).collect();
            let c = catalog(entries);
            let rs = c.resolve("", None);
            let last = paginate(&rs, SortField::Year, false, size, i64::MAX).unwrap();
            let over = paginate(&rs, SortField::Year, false, size, last.max_page as i64 + extra).unwrap();
            prop_assert_eq!(last.page_num, over.page_num);
            prop_assert_eq!(page_ids(&last), page_ids(&over));
        }

        #[test]
        fn pages_partition_sorted_results(
            years in prop::collection::vec(1990i32..1994, 0..30),
            size in 1i64..6,
            reverse in any::<bool>(),
        ) {
            let entries = years.iter().map(|&y| entry("x", y, &[])).collect();
            let c = catalog(entries);
            let rs = c.resolve("", None);
            let first = paginate(&rs, SortField::Year, reverse, size, 1).unwrap();

            let mut all = Vec::new();
            for p in 1..=first.max_page as i64 {
                let page = paginate(&rs, SortField::Year, reverse, size, p).unwrap();
                prop_assert!(page.items.len() as i64 <= size);
                all.extend(page.items.iter().map(|r| (r.year, r.id)));
            }
            prop_assert_eq!(all.len(), years.len());

            // 稳定：同年份内 ID 升序；年份按方向有序
            for w in all.windows(2) {
                let (y0, id0) = w[0];
                let (y1, id1) = w[1];
                if y0 == y1 {
                    prop_assert!(id0 < id1);
                } else if reverse {
                    prop_assert!(y0 > y1);
                } else {
                    prop_assert!(y0 < y1);
                }
            }
        }
    }
}
