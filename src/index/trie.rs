use std::collections::BTreeMap;

type NodeId = u32;

const ROOT: NodeId = 0;

#[derive(Clone, Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, NodeId>,
    terminal: bool,
}

/// 前缀树（字符级）。
///
/// 节点统一放在 arena 里，子节点用下标引用；root 固定为 0，代表空前缀。
/// `children` 用 BTreeMap，遍历顺序即字符升序，结果可复现。
#[derive(Clone, Debug)]
pub struct PrefixTrie {
    nodes: Vec<TrieNode>,
    key_count: usize,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            key_count: 0,
        }
    }

    /// 插入 key；重复插入是 no-op。返回 true 表示新 key。
    pub fn insert(&mut self, key: &str) -> bool {
        let mut cur = ROOT;
        for ch in key.chars() {
            let existing = self.nodes[cur as usize].children.get(&ch).copied();
            cur = match existing {
                Some(next) => next,
                None => {
                    let next = self.nodes.len() as NodeId;
                    self.nodes.push(TrieNode::default());
                    self.nodes[cur as usize].children.insert(ch, next);
                    next
                }
            };
        }

        let node = &mut self.nodes[cur as usize];
        if node.terminal {
            return false;
        }
        node.terminal = true;
        self.key_count += 1;
        true
    }

    /// 精确包含
    pub fn contains(&self, key: &str) -> bool {
        self.descend(key)
            .map(|n| self.nodes[n as usize].terminal)
            .unwrap_or(false)
    }

    /// 返回所有以 `prefix` 开头的 key（DFS 先序，子节点按字符升序）。
    /// 前缀走不通时返回空；空前缀返回全部 key。
    pub fn query(&self, prefix: &str) -> Vec<String> {
        let Some(start) = self.descend(prefix) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        // 显式栈：深度受最长 key 限制，不走递归。
        let mut stack: Vec<(NodeId, String)> = vec![(start, prefix.to_string())];
        while let Some((id, path)) = stack.pop() {
            let node = &self.nodes[id as usize];
            if node.terminal {
                out.push(path.clone());
            }
            // 逆序压栈 => 升序出栈
            for (&ch, &child) in node.children.iter().rev() {
                let mut p = String::with_capacity(path.len() + ch.len_utf8());
                p.push_str(&path);
                p.push(ch);
                stack.push((child, p));
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.key_count
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// 节点数（含 root）
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn descend(&self, prefix: &str) -> Option<NodeId> {
        let mut cur = ROOT;
        for ch in prefix.chars() {
            cur = *self.nodes[cur as usize].children.get(&ch)?;
        }
        Some(cur)
    }
}
