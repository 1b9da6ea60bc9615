use geo::{unary_union, Intersects, MultiPolygon};

use crate::model::{PoolEntry, ZoneRecord};

/// Reduce the revision layer to the units intersecting the union of the
/// base layer, densely renumbered from zero (position = pool id). Each
/// entry remembers its originating revision index for provenance. An empty
/// result is a valid outcome, not an error.
pub fn filter_revision(base: &[ZoneRecord], revision: &[ZoneRecord]) -> Vec<PoolEntry> {
    let coverage: MultiPolygon<f64> = unary_union(base.iter().map(|z| &z.geometry));

    revision
        .iter()
        .enumerate()
        .filter(|(_, z)| z.geometry.intersects(&coverage))
        .map(|(i, z)| PoolEntry::unit(z.geometry.clone(), i))
        .collect()
}
