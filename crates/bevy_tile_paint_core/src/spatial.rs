//! Cell occupancy lookup

use crate::{GridConfig, ObjectId, Scene};

/// Direct children of `container` whose position lies on `cell`.
///
/// Positions are compared per axis within [`crate::CELL_EPSILON`]. A missing or
/// childless container yields an empty list, same as a cell with no match.
/// Grandchildren are not searched.
pub fn find_at_cell(scene: &Scene, container: ObjectId, cell: [f32; 3]) -> Vec<ObjectId> {
    scene
        .children(container)
        .iter()
        .copied()
        .filter(|id| {
            scene
                .get(*id)
                .is_some_and(|object| GridConfig::same_cell(object.position, cell))
        })
        .collect()
}
