// Interactive VM selection demo.
//
// Run with: cargo run --example select_vms --features keymap
//
// Keys: arrows/jk move, space selects, a selects all filtered, enter expands
// concern details, h/l page, s cycles the sort column, S flips direction,
// f cycles a canned analysis filter, c clears filters, q quits.
use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Frame;
use ratatui::text::Line;

use tui_vmtable::{
    Concern, ConcernCategory, FilterValues, LocalSelection, NodeKind, SelectionStore, TableEvent,
    TreeNode, Vm, VmSelectState, VmTable, VmTableStyle, filter_key,
};

const ANALYSIS_CYCLE: [Option<&str>; 3] = [None, Some("Critical"), Some("Warning")];

fn concern(category: ConcernCategory, label: &str, assessment: &str) -> Concern {
    Concern {
        category,
        label: label.to_string(),
        assessment: assessment.to_string(),
    }
}

// A datacenter with two clusters and a folder tree over the same VMs.
fn inventory() -> (TreeNode, TreeNode, Vec<Vm>) {
    let mut vms = Vec::new();
    let mut host_children = Vec::new();
    for cluster in 0..2 {
        let mut cluster_vms = Vec::new();
        for index in 0..12 {
            let id = format!("vm-{cluster}-{index}");
            let name = format!("app-{cluster}{index:02}");
            cluster_vms.push(TreeNode::new(NodeKind::Vm, &id, &name));

            let mut vm = Vm::new(&id, &name);
            if index % 4 == 0 {
                vm = vm.with_concerns(vec![concern(
                    ConcernCategory::Critical,
                    "Shareable disk",
                    "Shared disks block warm migration",
                )]);
            } else if index % 3 == 0 {
                vm = vm.with_concerns(vec![concern(
                    ConcernCategory::Warning,
                    "Changed Block Tracking",
                    "CBT is disabled on this VM",
                )]);
            }
            vms.push(vm);
        }
        host_children.push(
            TreeNode::new(NodeKind::Cluster, format!("cl-{cluster}"), format!("C{cluster}"))
                .with_children(vec![
                    TreeNode::new(
                        NodeKind::Host,
                        format!("h-{cluster}"),
                        format!("esx-{cluster:02}"),
                    )
                    .with_children(cluster_vms),
                ]),
        );
    }
    let host_tree =
        TreeNode::new(NodeKind::Datacenter, "dc-1", "east").with_children(host_children);

    let folder_vms = vms
        .iter()
        .map(|vm| TreeNode::new(NodeKind::Vm, &vm.id, &vm.name))
        .collect();
    let vm_tree = TreeNode::new(NodeKind::Datacenter, "dc-1", "east").with_children(vec![
        TreeNode::new(NodeKind::Folder, "f-1", "prod").with_children(folder_vms),
    ]);

    (host_tree, vm_tree, vms)
}

fn analysis_filter(term: Option<&str>) -> FilterValues {
    let mut values = FilterValues::default();
    if let Some(term) = term {
        values.insert(filter_key::ANALYSIS.to_string(), vec![term.to_string()]);
    }
    values
}

fn draw(frame: &mut Frame, state: &mut VmSelectState, store: &LocalSelection<Vm>, filter: usize) {
    let title = match ANALYSIS_CYCLE[filter] {
        Some(term) => format!("Select VMs [{term} only] (q quits, f cycles filter)"),
        None => "Select VMs (q quits, f cycles filter)".to_string(),
    };
    let style = VmTableStyle {
        title: Some(Line::from(title)),
        ..VmTableStyle::default()
    };
    let widget = VmTable::new(store).style(style);
    frame.render_stateful_widget(widget, frame.area(), state);
}

fn main() -> io::Result<()> {
    let (host_tree, vm_tree, vms) = inventory();

    let mut state = VmSelectState::new(&[]);
    let scope = [&host_tree];
    state.ensure_inventory(&scope, Some(&host_tree), Some(&vm_tree), &vms);

    let mut store: LocalSelection<Vm> = LocalSelection::new();
    let mut filter = 0usize;

    let mut terminal = ratatui::init();
    let result = loop {
        if let Err(error) =
            terminal.draw(|frame| draw(frame, &mut state, &store, filter))
        {
            break Err(error);
        }
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break Ok(()),
                KeyCode::Char('f') => {
                    filter = (filter + 1) % ANALYSIS_CYCLE.len();
                    state.set_filter_values(analysis_filter(ANALYSIS_CYCLE[filter]));
                }
                _ => {
                    let _: TableEvent<()> = state.handle_key(&mut store, key);
                }
            },
            Ok(_) => {}
            Err(error) => break Err(error),
        }
    };
    ratatui::restore();
    result?;

    println!("selected {} VM(s):", store.len());
    for vm in store.items() {
        println!("  {}", vm.name);
    }
    Ok(())
}
