pub mod paginator;
pub mod params;
pub mod resolver;
pub mod server;

pub use paginator::{paginate, Page};
pub use params::{PageLimits, RawSearchParams, SearchRequest};
pub use resolver::{resolve, ResultSet};
pub use server::{QueryResponse, QueryServer, RecordView};
