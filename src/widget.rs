use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Buffer;
use ratatui::text::{Line, Text};
use ratatui::widgets::{
    Block, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget,
};

use crate::glyphs::TableGlyphs;
use crate::select::SelectionStore;
use crate::sort::SortDirection;
use crate::style::VmTableStyle;
use crate::view::{COLUMN_TITLES, VmSelectState, filter_key};
use crate::vm::{Vm, analysis_label};

// Checkbox column plus the six data columns.
const CONSTRAINTS: [Constraint; 7] = [
    Constraint::Length(3),
    Constraint::Length(20),
    Constraint::Min(18),
    Constraint::Length(12),
    Constraint::Length(12),
    Constraint::Length(14),
    Constraint::Min(12),
];

/// Table widget over a [`VmSelectState`] and a selection store.
///
/// Renders the current page only; paging, sorting and filtering happen in the
/// state, not here. Expanded VMs get an extra detail row listing their
/// concerns, with the line matching the active condition filter highlighted.
pub struct VmTable<'a, S> {
    store: &'a S,
    style: VmTableStyle<'a>,
    glyphs: TableGlyphs<'a>,
    footer: bool,
}

// One fully owned row, so nothing borrows the state while rendering.
struct RenderRow {
    cells: [String; 7],
    selected: bool,
    detail: Option<Text<'static>>,
}

impl<'a, S: SelectionStore<Vm>> VmTable<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            style: VmTableStyle::default(),
            glyphs: TableGlyphs::unicode(),
            footer: true,
        }
    }

    #[must_use]
    pub fn style(mut self, style: VmTableStyle<'a>) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub const fn glyphs(mut self, glyphs: TableGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Enables or disables the selection/pagination footer line.
    #[must_use]
    pub const fn footer(mut self, footer: bool) -> Self {
        self.footer = footer;
        self
    }

    fn build_rows(&self, state: &VmSelectState) -> Vec<RenderRow> {
        let condition = state
            .filter_values()
            .get(filter_key::CONDITION)
            .and_then(|terms| terms.first())
            .map(|term| term.to_lowercase())
            .filter(|term| !term.is_empty());

        state
            .page_rows(self.store)
            .iter()
            .map(|row| {
                let checkbox = if row.selected {
                    self.glyphs.checked
                } else {
                    self.glyphs.unchecked
                };
                let expander = if row.vm.concerns.is_empty() {
                    self.glyphs.leaf
                } else if row.expanded {
                    self.glyphs.expanded
                } else {
                    self.glyphs.collapsed
                };
                let opt = |value: &Option<String>| value.clone().unwrap_or_default();
                RenderRow {
                    cells: [
                        checkbox.to_string(),
                        analysis_label(row.vm).to_string(),
                        format!("{expander} {}", row.vm.name),
                        opt(&row.path.datacenter),
                        opt(&row.path.cluster),
                        opt(&row.path.host),
                        opt(&row.path.folder_path),
                    ],
                    selected: row.selected,
                    detail: row
                        .expanded
                        .then(|| self.detail_text(row.vm, condition.as_deref())),
                }
            })
            .collect()
    }

    fn detail_text(&self, vm: &Vm, condition: Option<&str>) -> Text<'static> {
        let lines: Vec<Line<'static>> = vm
            .concerns
            .iter()
            .map(|concern| {
                let line = concern.as_line();
                let matched =
                    condition.is_some_and(|needle| line.to_lowercase().contains(needle));
                let style = if matched {
                    self.style.detail_match_style
                } else {
                    self.style.detail_style
                };
                Line::styled(line, style)
            })
            .collect();
        Text::from(lines)
    }

    fn header(&self, state: &VmSelectState) -> Row<'a> {
        let sort = state.sort_by();
        let arrow = match sort.direction {
            SortDirection::Ascending => self.glyphs.sort_ascending,
            SortDirection::Descending => self.glyphs.sort_descending,
        };
        let select_all = if state.all_filtered_selected(self.store) {
            self.glyphs.checked
        } else {
            self.glyphs.unchecked
        };

        let mut cells = Vec::with_capacity(CONSTRAINTS.len());
        cells.push(Cell::from(select_all.to_string()));
        for (column, title) in COLUMN_TITLES.iter().enumerate() {
            let text = if column == sort.column {
                format!("{title} {arrow}")
            } else {
                (*title).to_string()
            };
            cells.push(Cell::from(text));
        }
        Row::new(cells).style(self.style.header_style)
    }

    fn footer_line(&self, state: &VmSelectState) -> Line<'a> {
        let info = state.page_info();
        let selected = self.store.items().len();
        let text = if info.item_count == 0 {
            format!("{selected} selected | 0 VMs")
        } else {
            format!(
                "{selected} selected | {}-{} of {} | page {}/{}",
                info.start, info.end, info.item_count, info.page, info.page_count
            )
        };
        Line::from(text)
    }
}

impl<S: SelectionStore<Vm>> StatefulWidget for VmTable<'_, S> {
    type State = VmSelectState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        if self.footer {
            block = block.title_bottom(self.footer_line(state));
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);

        let rows = self.build_rows(state);
        if rows.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(self.style.empty_text)
                .style(self.style.detail_style)
                .render(inner, buf);
            return;
        }

        // A detail row renders directly below its VM row, so the cursor's
        // visual index shifts by one for every expanded row above it.
        let cursor_visual = state.cursor().map(|cursor| {
            cursor
                + rows
                    .iter()
                    .take(cursor)
                    .filter(|row| row.detail.is_some())
                    .count()
        });

        let header = self.header(state);
        let mut table_rows: Vec<Row<'_>> = Vec::with_capacity(rows.len() * 2);
        for row in rows {
            let [checkbox, analysis, name, datacenter, cluster, host, folder] = row.cells;
            let mut table_row = Row::new([
                Cell::from(checkbox),
                Cell::from(analysis),
                Cell::from(name),
                Cell::from(datacenter),
                Cell::from(cluster),
                Cell::from(host),
                Cell::from(folder),
            ]);
            if row.selected {
                table_row = table_row.style(self.style.selected_style);
            }
            table_rows.push(table_row);

            if let Some(detail) = row.detail {
                let height = u16::try_from(detail.height()).unwrap_or(u16::MAX);
                table_rows.push(
                    Row::new([Cell::from(""), Cell::from(""), Cell::from(detail)])
                        .height(height),
                );
            }
        }

        let table = Table::new(table_rows, CONSTRAINTS)
            .style(self.style.block_style)
            .block(block)
            .header(header)
            .row_highlight_style(self.style.highlight_style)
            .highlight_symbol(self.style.highlight_symbol);

        let mut table_state = TableState::default();
        table_state.select(cursor_visual);
        StatefulWidget::render(table, area, buf, &mut table_state);
    }
}
