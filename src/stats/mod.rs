use std::fmt;

use serde::Serialize;

use crate::core::SearchField;

/// 索引规模统计（/status 与 `stats` 子命令共用）
#[derive(Clone, Debug, Default, Serialize)]
pub struct IndexReport {
    /// Record Store 条目数
    pub record_count: usize,
    /// 每个字段一行，顺序同 `SearchField::ALL`
    pub fields: Vec<FieldStats>,
    /// 进程级 RSS（从 /proc/self/statm 读取）
    pub process_rss_bytes: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct FieldStats {
    pub field: SearchField,
    /// posting 表中不同 key 的数量（= trie terminal 数）
    pub key_count: usize,
    /// trie 节点数（含 root）
    pub trie_nodes: usize,
    /// 所有 posting list 的 RecordId 总数
    pub postings_total: u64,
}

impl IndexReport {
    /// 从 /proc/self/statm 读取进程 RSS；非 Linux 返回 0
    pub fn read_process_rss() -> u64 {
        std::fs::read_to_string("/proc/self/statm")
            .ok()
            .and_then(|s| {
                // statm 格式: size resident shared text lib data dt (单位: 页)
                let parts: Vec<&str> = s.split_whitespace().collect();
                parts.get(1)?.parse::<u64>().ok()
            })
            .map(|pages| pages * 4096) // x86_64 page size
            .unwrap_or(0)
    }
}

fn human_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

impl fmt::Display for IndexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "╔══════════════════════════════════════════════════╗")?;
        writeln!(f, "║           movie-index Report                     ║")?;
        writeln!(f, "╠══════════════════════════════════════════════════╣")?;
        writeln!(
            f,
            "║ Process RSS: {:>35} ║",
            human_bytes(self.process_rss_bytes)
        )?;
        writeln!(
            f,
            "║ Records:     {:>35} ║",
            self.record_count
        )?;
        for fs in &self.fields {
            writeln!(f, "╠──────────────────────────────────────────────────╣")?;
            writeln!(f, "║ Field {:<42} ║", fs.field.as_str())?;
            writeln!(
                f,
                "║   keys:         {:>10}                       ║",
                fs.key_count
            )?;
            writeln!(
                f,
                "║   trie nodes:   {:>10}                       ║",
                fs.trie_nodes
            )?;
            writeln!(
                f,
                "║   postings:     {:>10}                       ║",
                fs.postings_total
            )?;
        }
        writeln!(f, "╚══════════════════════════════════════════════════╝")?;
        Ok(())
    }
}
