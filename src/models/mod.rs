// Domain models

mod container;
mod daemon;
mod sort;

pub use container::{
    ContainerIdentity, ContainerSnapshot, ContainerState, ResourceMetrics, SHORT_ID_LEN,
    display_name, short_id,
};
pub use daemon::DaemonSummary;
pub use sort::{SortDirection, SortField, SortSpec};
