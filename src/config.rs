use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::query::PageLimits;

pub const DATA_PATH_ENV: &str = "MOVIE_MODEL_VIEWER_DATA_PATH";
pub const LISTEN_ENV: &str = "MOVIE_INDEX_LISTEN";

const DEFAULT_DATA_PATH: &str = "./datafiles/Data1000Movies.csv";
const DEFAULT_LISTEN: ([u8; 4], u16) = ([127, 0, 0, 1], 5000);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub listen_addr: SocketAddr,
    pub page_limits: PageLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            listen_addr: SocketAddr::from(DEFAULT_LISTEN),
            page_limits: PageLimits::default(),
        }
    }
}

/// 配置文件（TOML），所有字段可缺省
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    data_path: Option<PathBuf>,
    listen_addr: Option<SocketAddr>,
    min_results_per_page: Option<i64>,
    max_results_per_page: Option<i64>,
    default_results_per_page: Option<i64>,
}

/// CLI 覆盖项（由 main 从 clap 参数填入）
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
    pub port: Option<u16>,
}

/// `<config_dir>/movie-index/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("movie-index").join("config.toml"))
}

impl Config {
    /// 合并顺序：默认值 <- 配置文件 <- 环境变量 <- CLI
    pub fn load(opts: &ConfigOverrides) -> anyhow::Result<Self> {
        let mut cfg = Config::default();

        // 显式指定的配置文件必须存在；默认位置的文件可选
        match opts.config_path.as_ref() {
            Some(path) => cfg.apply_file(path)?,
            None => {
                if let Some(path) = default_config_path().filter(|p| p.exists()) {
                    cfg.apply_file(&path)?;
                }
            }
        }

        cfg.apply_env(|k| std::env::var(k).ok())?;

        if let Some(p) = opts.data_path.as_ref() {
            cfg.data_path = p.clone();
        }
        if let Some(port) = opts.port {
            cfg.listen_addr.set_port(port);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {:?}", path))?;
        self.apply_toml(&text)
            .with_context(|| format!("parsing config file {:?}", path))?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(())
    }

    fn apply_toml(&mut self, text: &str) -> anyhow::Result<()> {
        let fc: FileConfig = toml::from_str(text)?;
        if let Some(p) = fc.data_path {
            self.data_path = p;
        }
        if let Some(a) = fc.listen_addr {
            self.listen_addr = a;
        }
        if let Some(v) = fc.min_results_per_page {
            self.page_limits.min = v;
        }
        if let Some(v) = fc.max_results_per_page {
            self.page_limits.max = v;
        }
        if let Some(v) = fc.default_results_per_page {
            self.page_limits.default = v;
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, get: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = get(DATA_PATH_ENV) {
            self.data_path = PathBuf::from(p);
        }
        if let Some(a) = get(LISTEN_ENV) {
            self.listen_addr = a
                .parse()
                .with_context(|| format!("{} is not a socket address: {:?}", LISTEN_ENV, a))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let l = &self.page_limits;
        if l.min < 1 {
            bail!("min_results_per_page must be >= 1, got {}", l.min);
        }
        if !(l.min <= l.default && l.default <= l.max) {
            bail!(
                "results per page must satisfy min <= default <= max, got {} / {} / {}",
                l.min,
                l.default,
                l.max
            );
        }
        Ok(())
    }
}
