use std::borrow::Cow;

use crate::filter::FieldValue;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Severity category attached to a migration concern.
///
/// Ordered by severity: `Critical` is the most severe, `Information` the least.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConcernCategory {
    Information,
    Advisory,
    Warning,
    Critical,
}

impl ConcernCategory {
    /// Returns the category name as reported by the inventory service.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Information => "Information",
            Self::Advisory => "Advisory",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

/// A migration-analysis finding attached to a VM.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Concern {
    pub category: ConcernCategory,
    pub label: String,
    pub assessment: String,
}

impl Concern {
    /// Formats the concern as a single searchable line.
    pub fn as_line(&self) -> String {
        format!(
            "{} - {}: {}",
            self.category.as_str(),
            self.label,
            self.assessment
        )
    }
}

/// A virtual machine as reported by the inventory service.
///
/// `id` is the stable self-link identifier; it survives query refreshes even
/// when the surrounding object is recreated, so identity comparisons go
/// through [`vm_identity`] rather than references.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vm {
    pub id: String,
    pub name: String,
    pub concerns: Vec<Concern>,
}

impl Vm {
    /// Creates a VM with no concerns.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            concerns: Vec::new(),
        }
    }

    /// Attaches concerns, builder-style.
    #[must_use]
    pub fn with_concerns(mut self, concerns: Vec<Concern>) -> Self {
        self.concerns = concerns;
        self
    }
}

/// Identity predicate for VMs: equal when the stable ids match.
pub fn vm_identity(a: &Vm, b: &Vm) -> bool {
    a.id == b.id
}

/// Returns the first concern with the highest severity, if any.
pub fn most_severe_concern(vm: &Vm) -> Option<&Concern> {
    vm.concerns.iter().fold(None, |worst, concern| match worst {
        Some(current) if current.category >= concern.category => Some(current),
        _ => Some(concern),
    })
}

/// Labels shown in the migration-analysis column and filter, least to most severe.
pub const ANALYSIS_LABELS: [&str; 4] = ["Ok", "Advisory", "Warning", "Critical"];

/// Returns the migration-analysis status label for a VM.
///
/// Advisory and Information concerns both surface as `"Advisory"`; a VM with
/// no concerns is `"Ok"`.
pub fn analysis_label(vm: &Vm) -> &'static str {
    match most_severe_concern(vm).map(|concern| concern.category) {
        Some(ConcernCategory::Critical) => "Critical",
        Some(ConcernCategory::Warning) => "Warning",
        Some(ConcernCategory::Advisory | ConcernCategory::Information) => "Advisory",
        None => "Ok",
    }
}

/// Mashes all concerns together into one continuous string to match against.
pub fn concern_summary(vm: &Vm) -> String {
    let lines: Vec<String> = vm.concerns.iter().map(Concern::as_line).collect();
    lines.join(" ; ")
}

/// Returns `true` if any single concern line contains `text`, case-insensitively.
pub fn matches_concern_text(vm: &Vm, text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let needle = text.to_lowercase();
    vm.concerns
        .iter()
        .any(|concern| concern.as_line().to_lowercase().contains(&needle))
}

impl FieldValue for Vm {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "name" => Some(Cow::Borrowed(&self.name)),
            "id" => Some(Cow::Borrowed(&self.id)),
            _ => None,
        }
    }
}
