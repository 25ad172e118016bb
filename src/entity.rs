use std::collections::HashMap;

use nalgebra::Point2;

use crate::id::EntityId;

/// Board position, in millimeters.
pub type Position = Point2<f64>;

/// A design entity that check results can point at.
///
/// Only the parts needed to describe a violation are required, the board data model itself lives in the host.
pub trait BoardEntity {
    fn id(&self) -> EntityId;

    fn position(&self) -> Position;

    /// Short, single-line description, e.g. "Track on F.Cu, length 2.5400 mm".
    fn describe(&self) -> String;
}

/// Resolves entity identifiers at display time.
///
/// Supplied by the host on each call, never stored by the tree model.
pub trait EntityLookup {
    fn entity(&self, id: &EntityId) -> Option<&dyn BoardEntity>;

    fn contains(&self, id: &EntityId) -> bool {
        self.entity(id).is_some()
    }
}

impl<T: BoardEntity + ?Sized> BoardEntity for Box<T> {
    fn id(&self) -> EntityId {
        self.as_ref().id()
    }

    fn position(&self) -> Position {
        self.as_ref().position()
    }

    fn describe(&self) -> String {
        self.as_ref().describe()
    }
}

impl<T: BoardEntity + ?Sized> BoardEntity for &T {
    fn id(&self) -> EntityId {
        (**self).id()
    }

    fn position(&self) -> Position {
        (**self).position()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<E: BoardEntity> EntityLookup for HashMap<EntityId, E> {
    fn entity(&self, id: &EntityId) -> Option<&dyn BoardEntity> {
        self.get(id).map(|entity| entity as &dyn BoardEntity)
    }
}

/// Lookup that resolves nothing, every reference shows up as stale.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyLookup;

impl EntityLookup for EmptyLookup {
    fn entity(&self, _id: &EntityId) -> Option<&dyn BoardEntity> {
        None
    }
}
