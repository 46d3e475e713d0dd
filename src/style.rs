use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

/// Visual settings for the VM table widget.
#[derive(Clone)]
pub struct VmTableStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    pub header_style: Style,
    pub highlight_style: Style,
    /// Applied to rows whose VM is selected for migration.
    pub selected_style: Style,
    /// Applied to expanded concern detail rows.
    pub detail_style: Style,
    /// Applied to the detail line matching the active condition filter.
    pub detail_match_style: Style,
    pub highlight_symbol: &'a str,
    pub borders: Borders,
    /// Message shown when no VMs survive scope and filters.
    pub empty_text: &'a str,
}

impl Default for VmTableStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            header_style: Style::default().add_modifier(Modifier::BOLD),
            highlight_style: Style::default().add_modifier(Modifier::REVERSED),
            selected_style: Style::default().add_modifier(Modifier::BOLD),
            detail_style: Style::default().add_modifier(Modifier::DIM),
            detail_match_style: Style::default().add_modifier(Modifier::UNDERLINED),
            highlight_symbol: ">> ",
            borders: Borders::ALL,
            empty_text: "No VMs match the current scope and filters",
        }
    }
}
