use serde::Deserialize;

use crate::core::{QueryError, SearchField, SortField};

/// 每页条数的上下限与默认值
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageLimits {
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            min: 5,
            max: 100,
            default: 10,
        }
    }
}

/// 已校验的查询请求（核心入口的输入）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    /// 原始查询串；resolve 时再归一化。空串匹配全部。
    pub query: String,
    /// None = 搜索全部四个字段
    pub search_field: Option<SearchField>,
    pub sort_field: SortField,
    pub reverse: bool,
    pub page_size: i64,
    /// 任意整数，分页时钳位
    pub page: i64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            search_field: None,
            sort_field: SortField::default(),
            reverse: false,
            page_size: PageLimits::default().default,
            page: 1,
        }
    }
}

impl SearchRequest {
    /// 严格解析：字段名非法直接报错（CLI 用）
    pub fn parse(
        query: &str,
        search_field: Option<&str>,
        sort_field: &str,
        reverse: bool,
        page_size: i64,
        page: i64,
    ) -> Result<Self, QueryError> {
        let search_field = search_field.map(str::parse::<SearchField>).transpose()?;
        let sort_field = sort_field.parse::<SortField>()?;
        if page_size <= 0 {
            return Err(QueryError::InvalidPageSize(page_size));
        }
        Ok(Self {
            query: query.to_string(),
            search_field,
            sort_field,
            reverse,
            page_size,
            page,
        })
    }
}

/// HTTP 原始参数（全部可缺省，按字符串接收后再宽松清洗）
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawSearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "num-results")]
    pub num_results: Option<String>,
    pub sortby: Option<String>,
    pub searchby: Option<String>,
    pub reverse: Option<String>,
}

impl RawSearchParams {
    /// 宽松清洗：任何无法识别的参数都回退到默认值，不报错。
    pub fn sanitize(&self, limits: &PageLimits) -> SearchRequest {
        let page = self
            .page
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|p| p.max(1))
            .unwrap_or(1);

        let page_size = self
            .num_results
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|n| n.clamp(limits.min, limits.max))
            .unwrap_or(limits.default);

        let sort_field = self
            .sortby
            .as_deref()
            .and_then(|s| s.trim().parse::<SortField>().ok())
            .unwrap_or_default();

        let search_field = self
            .searchby
            .as_deref()
            .and_then(|s| s.trim().parse::<SearchField>().ok());

        let reverse = match self.reverse.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("true") => true,
            _ => false,
        };

        SearchRequest {
            query: self.q.clone().unwrap_or_default(),
            search_field,
            sort_field,
            reverse,
            page_size,
            page,
        }
    }
}
