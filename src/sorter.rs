// Ordering of a snapshot set by one column.

use crate::models::{ContainerSnapshot, SortField, SortSpec};
use std::cmp::Ordering;

/// Reorder `snapshots` in place. Descending uses the reversed comparator, so
/// a set without ties comes out exactly reversed. Ties on the primary key keep
/// their incoming order (no secondary key). Never touches metric values.
pub fn sort_snapshots(snapshots: &mut [ContainerSnapshot], field: SortField, ascending: bool) {
    snapshots.sort_by(|a, b| {
        let cmp = compare(a, b, field);
        if ascending { cmp } else { cmp.reverse() }
    });
}

pub fn apply_spec(snapshots: &mut [ContainerSnapshot], spec: SortSpec) {
    sort_snapshots(snapshots, spec.field, spec.direction.is_ascending());
}

fn compare(a: &ContainerSnapshot, b: &ContainerSnapshot, field: SortField) -> Ordering {
    let (am, bm) = (&a.metrics, &b.metrics);
    match field {
        SortField::Name => a.identity.name.cmp(&b.identity.name),
        SortField::Cpu => am.cpu_percent.total_cmp(&bm.cpu_percent),
        SortField::Memory => am.memory_percent.total_cmp(&bm.memory_percent),
        SortField::NetworkIo => am.network_total().cmp(&bm.network_total()),
        SortField::BlockIo => am.block_total().cmp(&bm.block_total()),
        SortField::ImageSize => am.image_size_bytes.cmp(&bm.image_size_bytes),
    }
}
