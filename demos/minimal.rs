// Minimal example: build a small inventory and render one frame into an
// in-memory buffer (no terminal required).
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::StatefulWidget;

use tui_vmtable::{
    Concern, ConcernCategory, LocalSelection, NodeKind, TreeNode, Vm, VmSelectState, VmTable,
};

fn main() {
    // Host tree: datacenter -> cluster -> host -> VMs.
    let host_tree = TreeNode::new(NodeKind::Datacenter, "dc-1", "east").with_children(vec![
        TreeNode::new(NodeKind::Cluster, "cl-1", "gold").with_children(vec![
            TreeNode::new(NodeKind::Host, "h-1", "esx-01").with_children(vec![
                TreeNode::new(NodeKind::Vm, "vm-1", "billing-db"),
                TreeNode::new(NodeKind::Vm, "vm-2", "billing-web"),
            ]),
        ]),
    ]);

    let vms = vec![
        Vm::new("vm-1", "billing-db").with_concerns(vec![Concern {
            category: ConcernCategory::Critical,
            label: "Shareable disk".to_string(),
            assessment: "Shared disks block warm migration".to_string(),
        }]),
        Vm::new("vm-2", "billing-web"),
    ];

    // State holds filters/sort/page/expansion and must live across frames.
    let mut state = VmSelectState::new(&[]);
    let scope = [&host_tree];
    state.ensure_inventory(&scope, Some(&host_tree), None, &vms);

    // Selection lives in a store; here a local one owned by the example.
    let store: LocalSelection<Vm> = LocalSelection::new();
    let widget = VmTable::new(&store);

    let area = Rect::new(0, 0, 100, 12);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer, &mut state);
}
