use std::cell::RefCell;
use std::rc::Rc;

use crate::entity::{BoardEntity, Position};
use crate::id::EntityId;
use crate::item::RcItem;
use crate::severity::Severity;
use crate::tree::{TreeItem, TreeModelObserver};

/// A board entity with a fixed description and position.
#[derive(Debug, Clone, PartialEq)]
pub struct TestEntity {
    pub id: EntityId,
    pub description: String,
    pub position: Position,
}

impl TestEntity {
    pub fn new(id: EntityId, description: &str, x: f64, y: f64) -> Self {
        Self {
            id,
            description: description.to_string(),
            position: Position::new(x, y),
        }
    }
}

impl BoardEntity for TestEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Error code to severity mapping used by tests and demos.
///
/// 2 = warning, 3 = info, 4 = exclusion, everything else is an error.
pub fn severity_by_code(item: &RcItem) -> Severity {
    match item.error_code() {
        2 => Severity::Warning,
        3 => Severity::Info,
        4 => Severity::Exclusion,
        _ => Severity::Error,
    }
}

/// One item per code, with the message `item <index>` and a distinct main entity.
pub fn test_items(codes: &[i32]) -> Vec<RcItem> {
    codes
        .iter()
        .enumerate()
        .map(|(index, &code)| {
            RcItem::new(code, format!("item {}", index)).with_items(EntityId::from_u128(0x100 + index as u128), None)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    Cleared,
    ItemDeleted(TreeItem, TreeItem),
    ItemsDeleted(TreeItem, Vec<TreeItem>),
    ItemChanged(TreeItem),
    Expand(TreeItem),
}

/// Records notifications into a shared list, so they can be inspected after the model took ownership.
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<TreeEvent>>>,
}

impl RecordingObserver {
    pub fn new(events: Rc<RefCell<Vec<TreeEvent>>>) -> Self {
        Self {
            events,
        }
    }
}

impl TreeModelObserver for RecordingObserver {
    fn cleared(&mut self) {
        self.events.borrow_mut().push(TreeEvent::Cleared);
    }

    fn item_deleted(&mut self, parent: TreeItem, item: TreeItem) {
        self.events
            .borrow_mut()
            .push(TreeEvent::ItemDeleted(parent, item));
    }

    fn items_deleted(&mut self, parent: TreeItem, items: &[TreeItem]) {
        self.events
            .borrow_mut()
            .push(TreeEvent::ItemsDeleted(parent, items.to_vec()));
    }

    fn item_changed(&mut self, item: TreeItem) {
        self.events
            .borrow_mut()
            .push(TreeEvent::ItemChanged(item));
    }

    fn expand(&mut self, item: TreeItem) {
        self.events.borrow_mut().push(TreeEvent::Expand(item));
    }
}
