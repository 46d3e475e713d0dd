/// Symbols used by the table renderer.
#[derive(Clone, Copy)]
pub struct TableGlyphs<'a> {
    pub checked: &'a str,
    pub unchecked: &'a str,
    pub expanded: &'a str,
    pub collapsed: &'a str,
    /// Shown next to VMs with no concern detail to expand.
    pub leaf: &'a str,
    pub sort_ascending: &'a str,
    pub sort_descending: &'a str,
}

impl TableGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            checked: "[✔]",
            unchecked: "[ ]",
            expanded: "▼",
            collapsed: "▶",
            leaf: " ",
            sort_ascending: "↑",
            sort_descending: "↓",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            checked: "[x]",
            unchecked: "[ ]",
            expanded: "v",
            collapsed: ">",
            leaf: " ",
            sort_ascending: "^",
            sort_descending: "v",
        }
    }
}
