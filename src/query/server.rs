use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::core::{QueryError, Record, RecordId};
use crate::index::Catalog;
use crate::query::paginator::Page;
use crate::query::params::{PageLimits, RawSearchParams};
use crate::stats::IndexReport;

/// 对外 JSON 投影：演员/类型列表拍平成 `",\n"` 连接的字符串
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RecordView {
    pub idx: RecordId,
    pub title: String,
    pub year: i32,
    pub actors: String,
    pub genres: String,
}

impl From<&Record> for RecordView {
    fn from(r: &Record) -> Self {
        Self {
            idx: r.id,
            title: r.title.clone(),
            year: r.year,
            actors: r.actors_joined(),
            genres: r.genres_joined(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct QueryResponse {
    pub results_list: Vec<RecordView>,
    pub max_page: u64,
    pub has_prev: bool,
    pub page_num: u64,
    pub total: usize,
}

impl From<&Page<'_>> for QueryResponse {
    fn from(p: &Page<'_>) -> Self {
        Self {
            results_list: p.items.iter().map(|r| RecordView::from(*r)).collect(),
            max_page: p.max_page,
            has_prev: p.has_prev(),
            page_num: p.page_num,
            total: p.total,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
    limits: PageLimits,
}

pub struct QueryServer {
    pub catalog: Arc<Catalog>,
    pub limits: PageLimits,
}

impl QueryServer {
    pub fn new(catalog: Arc<Catalog>, limits: PageLimits) -> Self {
        Self { catalog, limits }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/query", get(query_handler))
            .route("/status", get(status_handler))
            .with_state(AppState {
                catalog: self.catalog.clone(),
                limits: self.limits,
            })
    }

    pub async fn run(self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// 使用已绑定的 listener（测试里绑定 :0 后取实际端口）
    pub async fn serve(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        let app = self.router();
        tracing::info!("HTTP Query Server listening on {}", listener.local_addr()?);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

async fn query_handler(
    Query(params): Query<RawSearchParams>,
    State(state): State<AppState>,
) -> Result<Json<QueryResponse>, QueryError> {
    let req = params.sanitize(&state.limits);
    let page = state.catalog.search(&req)?;
    Ok(Json(QueryResponse::from(&page)))
}

async fn status_handler(State(state): State<AppState>) -> Json<IndexReport> {
    Json(state.catalog.report())
}
