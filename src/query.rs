use thiserror::Error;

/// Error reported by the external inventory collaborator for one source.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("inventory request failed: {0}")]
    Request(String),
    #[error("inventory response was malformed: {0}")]
    Malformed(String),
    #[error("inventory source is unreachable")]
    Unreachable,
}

/// Tri-state result of one asynchronous inventory query.
///
/// The data layer owns fetching, caching and retries; this core only observes
/// the latest state per source. Superseded responses are expected to be
/// dropped at the fetch boundary (last-write-wins).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryState<T> {
    Pending,
    Failed(InventoryError),
    Ready(T),
}

impl<T> QueryState<T> {
    /// Returns the data if the query succeeded.
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the error if the query failed.
    pub const fn error(&self) -> Option<&InventoryError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Object-safe view over query states with different payload types.
pub trait QueryProbe {
    fn status(&self) -> AggregateStatus;
    fn probe_error(&self) -> Option<&InventoryError>;
}

impl<T> QueryProbe for QueryState<T> {
    fn status(&self) -> AggregateStatus {
        match self {
            Self::Pending => AggregateStatus::Pending,
            Self::Failed(_) => AggregateStatus::Failed,
            Self::Ready(_) => AggregateStatus::Ready,
        }
    }

    fn probe_error(&self) -> Option<&InventoryError> {
        self.error()
    }
}

/// Combined status over several queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateStatus {
    Pending,
    Failed,
    Ready,
}

/// Combines query statuses: any failure wins, then any pending, else ready.
pub fn aggregate_status(queries: &[&dyn QueryProbe]) -> AggregateStatus {
    if queries
        .iter()
        .any(|query| query.status() == AggregateStatus::Failed)
    {
        return AggregateStatus::Failed;
    }
    if queries
        .iter()
        .any(|query| query.status() == AggregateStatus::Pending)
    {
        return AggregateStatus::Pending;
    }
    AggregateStatus::Ready
}

/// Returns the first error among the queries, in argument order.
pub fn first_error<'a>(queries: &[&'a dyn QueryProbe]) -> Option<&'a InventoryError> {
    queries.iter().find_map(|query| query.probe_error())
}

/// An error labeled with the source it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceError {
    pub label: &'static str,
    pub error: InventoryError,
}

/// Composite load state layered over the table view.
///
/// The table renders only in `Ready`; partial success is never acted upon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    /// Every failed source, labeled, in source order. Never empty.
    Failed(Vec<SourceError>),
    Ready,
}

impl LoadPhase {
    /// Derives the composite phase from the three required inventory queries.
    pub fn of<H, V, L>(
        host_tree: &QueryState<H>,
        vm_tree: &QueryState<V>,
        vms: &QueryState<L>,
    ) -> Self {
        let labeled: [(&'static str, &dyn QueryProbe); 3] = [
            ("host tree", host_tree),
            ("VM tree", vm_tree),
            ("VM list", vms),
        ];

        let failures: Vec<SourceError> = labeled
            .iter()
            .copied()
            .filter_map(|(label, query)| {
                query.probe_error().map(|error| SourceError {
                    label,
                    error: error.clone(),
                })
            })
            .collect();
        if !failures.is_empty() {
            return Self::Failed(failures);
        }

        let queries: [&dyn QueryProbe; 3] = [host_tree, vm_tree, vms];
        match aggregate_status(&queries) {
            AggregateStatus::Ready => Self::Ready,
            _ => Self::Loading,
        }
    }
}
