use serde::Serialize;

use crate::core::error::LoadError;

/// 记录 ID：加载顺序中的位置，永不复用
pub type RecordId = u32;

/// 待入库的电影条目（尚未分配 ID）
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovieEntry {
    pub title: String,
    pub year: i32,
    pub actor_names: Vec<String>,
    pub genre_names: Vec<String>,
}

/// 不可变电影记录
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    pub year: i32,
    pub actor_names: Vec<String>,
    pub genre_names: Vec<String>,
}

impl Record {
    /// 演员列表的展示/排序形式（与 JSON 投影一致）
    pub fn actors_joined(&self) -> String {
        self.actor_names.join(",\n")
    }

    pub fn genres_joined(&self) -> String {
        self.genre_names.join(",\n")
    }
}

/// Record Store：按加载顺序排列的扁平记录表（arena）。
///
/// `records[i].id == i` 恒成立，按 ID 取记录是 O(1) 下标访问。
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn from_entries<I>(entries: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = MovieEntry>,
    {
        let mut records = Vec::new();
        for (pos, e) in entries.into_iter().enumerate() {
            let id = RecordId::try_from(pos).map_err(|_| LoadError::TooManyRecords(pos + 1))?;
            records.push(Record {
                id,
                title: e.title,
                year: e.year,
                actor_names: e.actor_names,
                genre_names: e.genre_names,
            });
        }
        Ok(Self { records })
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }
}
