use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::{LoadError, MovieEntry, RecordStore};

/// 早于此年份的记录视为脏数据
const MIN_YEAR: i32 = 1900;

const REQUIRED_COLUMNS: [&str; 4] = ["Title", "Year", "Actors", "Genre"];

#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Actors")]
    actors: String,
    #[serde(rename = "Genre")]
    genre: String,
}

/// 被拒绝的数据行（记录行号与原因，不中断加载）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug)]
pub struct LoadedDataset {
    pub store: RecordStore,
    pub rejected: Vec<RejectedRow>,
}

/// 电影数据集 CSV 读取器。
///
/// 只取 `Title` / `Year` / `Actors` / `Genre` 四列，其余列忽略。
/// `Actors`、`Genre` 为逗号分隔列表。标题为空、年份不是整数或早于 1900 的行被跳过。
pub struct MovieCsvReader {
    path: PathBuf,
}

impl MovieCsvReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<LoadedDataset, LoadError> {
        let file = std::fs::File::open(&self.path)?;
        let loaded = read_from(file)?;
        tracing::info!(
            "Loaded {} records from {:?} ({} rejected)",
            loaded.store.len(),
            self.path,
            loaded.rejected.len()
        );
        Ok(loaded)
    }
}

/// 从任意 reader 读取（测试 / stdin）
pub fn read_from<R: Read>(reader: R) -> Result<LoadedDataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // 兼容带 BOM 的文件（utf-8-sig）
    let headers: csv::StringRecord = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col));
        }
    }
    rdr.set_headers(headers.clone());

    let mut entries = Vec::new();
    let mut rejected = Vec::new();
    for row in rdr.records() {
        let raw = row?;
        let line = raw.position().map(|p| p.line()).unwrap_or(0);
        let parsed: MovieRow = raw.deserialize(Some(&headers))?;
        match to_entry(parsed) {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                tracing::warn!("Skipping dataset line {}: {}", line, reason);
                rejected.push(RejectedRow { line, reason });
            }
        }
    }

    let store = RecordStore::from_entries(entries)?;
    Ok(LoadedDataset { store, rejected })
}

fn to_entry(row: MovieRow) -> Result<MovieEntry, String> {
    let title = row.title.trim();
    if title.is_empty() {
        return Err("blank title".to_string());
    }
    let year: i32 = row
        .year
        .trim()
        .parse()
        .map_err(|_| format!("year {:?} is not an integer", row.year))?;
    if year < MIN_YEAR {
        return Err(format!("year {} is before {}", year, MIN_YEAR));
    }

    Ok(MovieEntry {
        title: title.to_string(),
        year,
        actor_names: split_names(&row.actors),
        genre_names: split_names(&row.genre),
    })
}

fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
