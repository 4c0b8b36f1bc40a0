use thiserror::Error;

/// 查询前置条件错误：调用方传入了非法参数，查询在做任何工作之前被拒绝。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid search field: {0:?} (expected title, year, actor or genre)")]
    InvalidFieldRestriction(String),

    #[error("invalid sort field: {0:?} (expected title, year, actors or genres)")]
    InvalidSortField(String),

    #[error("invalid page size: {0} (must be >= 1)")]
    InvalidPageSize(i64),
}

/// 数据集加载错误（CSV -> RecordStore）
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column {0:?}")]
    MissingColumn(&'static str),

    #[error("too many records: {0} exceeds the u32 id space")]
    TooManyRecords(usize),
}
