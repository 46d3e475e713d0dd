use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};

use crate::vm::Vm;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Separator between folder names in a resolved folder path.
pub const FOLDER_PATH_SEPARATOR: &str = "/";

/// Kind tag for a topology tree node.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Datacenter,
    Cluster,
    Host,
    Folder,
    Vm,
}

/// A node in one of the two inventory topology trees.
///
/// The host tree nests datacenter → cluster → host → VM; the folder tree nests
/// datacenter → folder → VM. Both trees cover the same VM universe, and a VM
/// node's `id` matches [`Vm::id`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub id: String,
    pub name: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Creates a leaf node.
    pub fn new(kind: NodeKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Attaches children, builder-style.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }
}

/// Resolved ancestor chain for one VM across both topology trees.
///
/// Every field is independently optional: a VM missing from a tree simply
/// contributes blanks for that tree, never an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreePathInfo {
    pub datacenter: Option<String>,
    pub cluster: Option<String>,
    pub host: Option<String>,
    pub folder_path: Option<String>,
}

impl TreePathInfo {
    /// Path info with every field absent, for VMs whose trees are unavailable.
    pub const EMPTY: Self = Self {
        datacenter: None,
        cluster: None,
        host: None,
        folder_path: None,
    };
}

/// Resolves the path info for each VM against both topology trees.
///
/// Pure function of its inputs; callers are expected to cache the result and
/// recompute only when the VM set or either tree changes. A tree that is still
/// loading (`None`) contributes absent fields for every VM, so views render
/// blanks instead of blocking.
pub fn resolve_paths(
    vms: &[Vm],
    host_tree: Option<&TreeNode>,
    vm_tree: Option<&TreeNode>,
) -> FxHashMap<String, TreePathInfo> {
    let host_ancestors = host_tree.map(index_vm_ancestors).unwrap_or_default();
    let folder_ancestors = vm_tree.map(index_vm_ancestors).unwrap_or_default();

    let mut paths = FxHashMap::with_capacity_and_hasher(vms.len(), FxBuildHasher);
    for vm in vms {
        let mut info = TreePathInfo::EMPTY;

        if let Some(chain) = host_ancestors.get(vm.id.as_str()) {
            // Walk upward from the VM; the first ancestor of each kind wins.
            for node in chain.iter().rev() {
                match node.kind {
                    NodeKind::Datacenter if info.datacenter.is_none() => {
                        info.datacenter = Some(node.name.clone());
                    }
                    NodeKind::Cluster if info.cluster.is_none() => {
                        info.cluster = Some(node.name.clone());
                    }
                    NodeKind::Host if info.host.is_none() => {
                        info.host = Some(node.name.clone());
                    }
                    _ => {}
                }
            }
        }

        if let Some(chain) = folder_ancestors.get(vm.id.as_str()) {
            let folders: Vec<&str> = chain
                .iter()
                .filter(|node| node.kind == NodeKind::Folder)
                .map(|node| node.name.as_str())
                .collect();
            if !folders.is_empty() {
                info.folder_path = Some(folders.join(FOLDER_PATH_SEPARATOR));
            }
        }

        paths.insert(vm.id.clone(), info);
    }
    paths
}

/// Returns the VMs from `vms` that live under any of the selected subtrees,
/// preserving the order of `vms`.
pub fn vms_in_scope<'a>(scope: &[&TreeNode], vms: &'a [Vm]) -> Vec<&'a Vm> {
    let mut ids: FxHashSet<&str> = FxHashSet::default();
    for node in scope {
        collect_vm_ids(node, &mut ids);
    }
    vms.iter().filter(|vm| ids.contains(vm.id.as_str())).collect()
}

fn collect_vm_ids<'a>(node: &'a TreeNode, ids: &mut FxHashSet<&'a str>) {
    if node.kind == NodeKind::Vm {
        ids.insert(node.id.as_str());
    }
    for child in &node.children {
        collect_vm_ids(child, ids);
    }
}

// Maps each VM node id to its ancestor chain, root first (the VM itself excluded).
fn index_vm_ancestors(root: &TreeNode) -> FxHashMap<&str, Vec<&TreeNode>> {
    let mut index = FxHashMap::default();
    let mut stack: Vec<&TreeNode> = Vec::new();
    descend(root, &mut stack, &mut index);
    index
}

fn descend<'a>(
    node: &'a TreeNode,
    stack: &mut Vec<&'a TreeNode>,
    index: &mut FxHashMap<&'a str, Vec<&'a TreeNode>>,
) {
    if node.kind == NodeKind::Vm {
        index.insert(node.id.as_str(), stack.clone());
    }
    stack.push(node);
    for child in &node.children {
        descend(child, stack, index);
    }
    stack.pop();
}
