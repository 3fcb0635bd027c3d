//
// Tree step: flat NodeRecord list -> MindmapTree (index-based arena)
//
// What this does:
// - Keys records by id (a repeated id resolves to its last record)
// - Attaches every record to its parent's child list in one pass
// - The last record without a parent becomes the root
// - Records whose parent id does not resolve are dropped, together with
//   everything hanging below them
// - Sorts every child list ascending by order_index (stable)
// - Re-indexes the reachable nodes in pre-order
//
// Nothing here fails: malformed hierarchies degrade and are logged.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::NodeRecord;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TreeIndex(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub index: TreeIndex,
    pub record: NodeRecord,
    /// Children in ascending order_index order.
    pub children: Vec<TreeIndex>,
}

/// A single-rooted tree. Each node appears in exactly one child list,
/// except the root which appears in none.
#[derive(Debug, Clone, PartialEq)]
pub struct MindmapTree {
    pub root: TreeIndex,
    pub nodes: Vec<TreeNode>,
}

impl MindmapTree {
    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root.0]
    }

    pub fn node(&self, index: TreeIndex) -> &TreeNode {
        &self.nodes[index.0]
    }

    pub fn children(&self, index: TreeIndex) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes[index.0].children.iter().map(|&c| &self.nodes[c.0])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.record.id == id)
    }

    /// Ids in pre-order: parent first, then each child subtree in order.
    pub fn pre_order_ids(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            let node = self.node(index);
            out.push(node.record.id.as_str());
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// Build the tree. Returns None for an empty list or when no record has a
/// null parent.
pub fn build_tree(records: &[NodeRecord]) -> Option<MindmapTree> {
    // One slot per distinct id, in first-seen order.
    let mut slots: Vec<&NodeRecord> = Vec::with_capacity(records.len());
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    let mut duplicates = 0usize;

    for record in records {
        match by_id.get(record.id.as_str()) {
            Some(&slot) => {
                slots[slot] = record;
                duplicates += 1;
            }
            None => {
                by_id.insert(record.id.as_str(), slots.len());
                slots.push(record);
            }
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); slots.len()];
    let mut root: Option<usize> = None;
    let mut roots_seen = 0usize;
    let mut orphans = 0usize;

    for (slot, record) in slots.iter().enumerate() {
        match record.parent_id.as_deref() {
            None => {
                root = Some(slot);
                roots_seen += 1;
            }
            Some(parent_id) => match by_id.get(parent_id) {
                Some(&parent) => children[parent].push(slot),
                None => orphans += 1,
            },
        }
    }

    if duplicates > 0 {
        warn!(duplicates, "duplicate node ids; the last record of each id wins");
    }
    if roots_seen > 1 {
        warn!(roots = roots_seen, "multiple root nodes; using the last one");
    }
    if orphans > 0 {
        warn!(orphans, "nodes reference a missing parent and were dropped");
    }

    let root = root?;

    for list in &mut children {
        list.sort_by_key(|&c| slots[c].order_index);
    }

    // Pre-order walk from the root; unreachable slots never get an index.
    let mut remap: Vec<Option<TreeIndex>> = vec![None; slots.len()];
    let mut nodes: Vec<TreeNode> = Vec::with_capacity(slots.len());
    let mut stack = vec![root];
    while let Some(slot) = stack.pop() {
        if remap[slot].is_some() {
            continue;
        }
        let index = TreeIndex(nodes.len());
        remap[slot] = Some(index);
        nodes.push(TreeNode {
            index,
            record: slots[slot].clone(),
            children: Vec::new(),
        });
        stack.extend(children[slot].iter().rev());
    }

    for (slot, list) in children.iter().enumerate() {
        if let Some(parent) = remap[slot] {
            nodes[parent.0].children = list.iter().filter_map(|&c| remap[c]).collect();
        }
    }

    let unreachable = slots.len() - nodes.len();
    debug!(nodes = nodes.len(), unreachable, "built mindmap tree");

    Some(MindmapTree {
        root: TreeIndex(0),
        nodes,
    })
}
