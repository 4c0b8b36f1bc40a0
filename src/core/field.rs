use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::core::error::QueryError;
use crate::core::record::Record;

/// 字段值归一化：trim + NFC + 小写。
///
/// 建索引的 key 与查询串都走这一个函数，保证两边可比。
pub fn normalize_key(raw: &str) -> String {
    raw.trim().nfc().collect::<String>().to_lowercase()
}

/// 可搜索字段（每个字段一棵 trie + 一张 posting 表）
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Year,
    Actor,
    Genre,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        SearchField::Title,
        SearchField::Year,
        SearchField::Actor,
        SearchField::Genre,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Year => "year",
            SearchField::Actor => "actor",
            SearchField::Genre => "genre",
        }
    }

    /// 在 `ALL` 中的下标（Catalog 按此定位字段索引）
    pub(crate) fn slot(self) -> usize {
        match self {
            SearchField::Title => 0,
            SearchField::Year => 1,
            SearchField::Actor => 2,
            SearchField::Genre => 3,
        }
    }

    /// 字段选择器：从一条记录提取该字段的全部归一化 key。
    /// title/year 恰好一个；actor/genre 每个非空名字一个。
    pub fn keys(self, record: &Record) -> Vec<String> {
        match self {
            SearchField::Title => vec![normalize_key(&record.title)],
            SearchField::Year => vec![record.year.to_string()],
            SearchField::Actor => list_keys(&record.actor_names),
            SearchField::Genre => list_keys(&record.genre_names),
        }
    }
}

fn list_keys(names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|n| !n.trim().is_empty())
        .map(|n| normalize_key(n))
        .collect()
}

impl FromStr for SearchField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| QueryError::InvalidFieldRestriction(s.to_string()))
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 可排序字段
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Title,
    Year,
    Actors,
    Genres,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Title,
        SortField::Year,
        SortField::Actors,
        SortField::Genres,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Year => "year",
            SortField::Actors => "actors",
            SortField::Genres => "genres",
        }
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| QueryError::InvalidSortField(s.to_string()))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
