use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use movie_index::config::{Config, ConfigOverrides};
use movie_index::index::Catalog;
use movie_index::query::{QueryResponse, QueryServer, SearchRequest};
use movie_index::storage::MovieCsvReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "movie-index", version, about = "Prefix search over a movie catalog")]
struct Cli {
    /// 配置文件（TOML）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 数据集 CSV 路径
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// HTTP 监听端口
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 启动 HTTP 查询服务（默认）
    Serve,
    /// 执行一次查询，JSON 输出到 stdout
    Search {
        /// 查询前缀；省略表示匹配全部
        #[arg(default_value = "")]
        q: String,
        #[arg(long)]
        searchby: Option<String>,
        #[arg(long, default_value = "title")]
        sortby: String,
        #[arg(long)]
        reverse: bool,
        #[arg(long = "num-results")]
        num_results: Option<i64>,
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    /// 打印索引统计
    Stats,
}

fn load_catalog(cfg: &Config) -> anyhow::Result<Catalog> {
    let loaded = MovieCsvReader::new(&cfg.data_path)
        .read()
        .with_context(|| format!("loading dataset {:?}", cfg.data_path))?;
    Ok(Catalog::build(loaded.store))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&ConfigOverrides {
        config_path: cli.config,
        data_path: cli.data,
        port: cli.port,
    })?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting movie-index on {}", cfg.listen_addr);
            let catalog = Arc::new(load_catalog(&cfg)?);
            let server = QueryServer::new(catalog, cfg.page_limits);

            tokio::select! {
                r = server.run(cfg.listen_addr) => r?,
                r = tokio::signal::ctrl_c() => {
                    r?;
                    info!("Shutting down...");
                }
            }
        }
        Command::Search {
            q,
            searchby,
            sortby,
            reverse,
            num_results,
            page,
        } => {
            let catalog = load_catalog(&cfg)?;
            let page_size = num_results.unwrap_or(cfg.page_limits.default);
            let req = SearchRequest::parse(&q, searchby.as_deref(), &sortby, reverse, page_size, page)?;
            let result = catalog.search(&req)?;
            println!("{}", serde_json::to_string_pretty(&QueryResponse::from(&result))?);
        }
        Command::Stats => {
            let catalog = load_catalog(&cfg)?;
            print!("{}", catalog.report());
        }
    }

    Ok(())
}
