use log::{debug, trace};
use slotmap::{new_key_type, SlotMap};

use crate::entity::EntityLookup;
use crate::id::EntityId;
use crate::item::RcItem;
use crate::provider::RcItemsProvider;
use crate::reporter::Reporter;
use crate::severity::{Severity, SeverityMask};

new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// One per check result, the parent of the entity nodes.
    Marker,
    MainItem,
    AuxItem,
}

#[derive(Debug, Clone)]
pub struct RcTreeNode {
    pub node_type: NodeType,
    /// Snapshot of the provider's item, taken when the tree was built.
    pub rc_item: RcItem,
    pub severity: Severity,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Opaque handle to a node of an [`RcTreeModel`], as handed to views.
///
/// The default handle is the invisible root. Handles are only meaningful for the tree they came from, and become
/// stale when the tree is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TreeItem(Option<NodeId>);

impl TreeItem {
    pub fn root() -> Self {
        Self(None)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_none()
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.0
    }
}

impl From<NodeId> for TreeItem {
    fn from(value: NodeId) -> Self {
        Self(Some(value))
    }
}

/// Non-default display attributes of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemAttr {
    /// Check result headings.
    pub bold: bool,
    /// The node refers to an entity which no longer exists.
    pub attention: bool,
}

/// The protocol a tree view uses to walk and display a model.
pub trait TreeViewModel {
    /// True for nodes that can have children, including the root.
    fn is_container(&self, item: TreeItem) -> bool;

    /// The root is its own parent.
    fn parent(&self, item: TreeItem) -> TreeItem;

    /// Appends the children of `item` to `children`, returns the number appended.
    fn children(&self, item: TreeItem, children: &mut Vec<TreeItem>) -> usize;

    fn column_count(&self) -> usize {
        1
    }

    fn has_container_columns(&self, _item: TreeItem) -> bool {
        true
    }

    fn value(&self, item: TreeItem, column: usize, lookup: &dyn EntityLookup) -> String;

    /// Editing is not supported by default.
    fn set_value(&mut self, _item: TreeItem, _column: usize, _value: &str) -> bool {
        false
    }

    fn attr(&self, item: TreeItem, column: usize, lookup: &dyn EntityLookup) -> Option<ItemAttr>;
}

/// Receives the model's change notifications, usually implemented by the view layer.
#[allow(unused_variables)]
pub trait TreeModelObserver {
    /// The whole tree was replaced or emptied.
    fn cleared(&mut self) {}

    fn item_deleted(&mut self, parent: TreeItem, item: TreeItem) {}

    fn items_deleted(&mut self, parent: TreeItem, items: &[TreeItem]) {}

    fn item_changed(&mut self, item: TreeItem) {}

    fn expand(&mut self, item: TreeItem) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TreeModelObserver for NullObserver {}

pub type SelectionQuery = Box<dyn Fn() -> TreeItem>;

/// Projects the check results of an [`RcItemsProvider`] into a tree.
///
/// The root has one `Marker` node per check result, in provider order. A marker has a `MainItem` child, and an
/// `AuxItem` child when the check result refers to a second entity, always in that order.
///
/// The tree is a cached projection, it is rebuilt when the provider or the severities change. If the provider is
/// mutated behind the model's back, call [`RcTreeModel::rebuild`].
pub struct RcTreeModel {
    severities: SeverityMask,
    provider: Option<Box<dyn RcItemsProvider>>,

    nodes: SlotMap<NodeId, RcTreeNode>,
    tree: Vec<NodeId>,

    observer: Box<dyn TreeModelObserver>,
    selection: Option<SelectionQuery>,
}

impl Default for RcTreeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RcTreeModel {
    pub fn new() -> Self {
        Self {
            severities: SeverityMask::ALL,
            provider: None,
            nodes: SlotMap::with_key(),
            tree: Vec::new(),
            observer: Box::new(NullObserver),
            selection: None,
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn TreeModelObserver>) {
        self.observer = observer;
    }

    /// Installs the callback used by [`RcTreeModel::delete_current_item`] to find the view's current item.
    pub fn set_selection_query<F>(&mut self, query: F)
    where
        F: Fn() -> TreeItem + 'static,
    {
        self.selection = Some(Box::new(query));
    }

    /// Replaces the provider, dropping the previous one, and rebuilds the tree with the current severities.
    pub fn set_provider(&mut self, provider: Box<dyn RcItemsProvider>) {
        self.provider = Some(provider);
        self.rebuild();
    }

    pub fn provider(&self) -> Option<&dyn RcItemsProvider> {
        self.provider.as_deref()
    }

    /// Mutable access for out-of-band changes, call [`RcTreeModel::rebuild`] afterwards.
    pub fn provider_mut(&mut self) -> Option<&mut (dyn RcItemsProvider + 'static)> {
        self.provider.as_deref_mut()
    }

    pub fn severities(&self) -> SeverityMask {
        self.severities
    }

    pub fn set_severities(&mut self, severities: SeverityMask) {
        self.severities = severities;
        self.rebuild();
    }

    /// Number of check results in the tree.
    pub fn drc_item_count(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The marker nodes, in provider order.
    pub fn groups(&self) -> impl Iterator<Item = TreeItem> + '_ {
        self.tree.iter().map(|&id| TreeItem::from(id))
    }

    pub fn node(&self, item: TreeItem) -> Option<&RcTreeNode> {
        item.node_id().and_then(|id| self.nodes.get(id))
    }

    pub fn node_type(&self, item: TreeItem) -> Option<NodeType> {
        self.node(item).map(|node| node.node_type)
    }

    pub fn rc_item(&self, item: TreeItem) -> Option<&RcItem> {
        self.node(item).map(|node| &node.rc_item)
    }

    pub fn severity(&self, item: TreeItem) -> Option<Severity> {
        self.node(item).map(|node| node.severity)
    }

    /// The entity a node refers to, the main entity for markers.
    pub fn to_uuid(&self, item: TreeItem) -> Option<EntityId> {
        let node = self.node(item)?;
        match node.node_type {
            NodeType::Marker | NodeType::MainItem => Some(node.rc_item.main_item_id()),
            NodeType::AuxItem => node.rc_item.aux_item_id(),
        }
    }

    pub fn rebuild(&mut self) {
        profiling::scope!("rc_tree_rebuild");

        self.nodes.clear();
        self.tree.clear();

        if let Some(provider) = self.provider.as_mut() {
            provider.set_severities(self.severities);

            let count = provider.count(None);
            for index in 0..count {
                let Some(rc_item) = provider.item(index) else {
                    debug!("provider returned no item. index: {}, count: {}", index, count);
                    break;
                };
                let severity = provider.severity(index);

                let group = Self::add_group(&mut self.nodes, rc_item, severity);
                self.tree.push(group);
            }
        }

        debug!(
            "rebuilt tree. severities: {}, groups: {}, nodes: {}",
            self.severities,
            self.tree.len(),
            self.nodes.len()
        );

        self.observer.cleared();
    }

    fn add_group(nodes: &mut SlotMap<NodeId, RcTreeNode>, rc_item: &RcItem, severity: Severity) -> NodeId {
        let group = nodes.insert(RcTreeNode {
            node_type: NodeType::Marker,
            rc_item: rc_item.clone(),
            severity,
            parent: None,
            children: Vec::with_capacity(2),
        });

        let mut leaf_types = Vec::with_capacity(2);
        if rc_item.has_main_item() {
            leaf_types.push(NodeType::MainItem);
        }
        if rc_item.aux_item_id().is_some() {
            leaf_types.push(NodeType::AuxItem);
        }

        for node_type in leaf_types {
            let leaf = nodes.insert(RcTreeNode {
                node_type,
                rc_item: rc_item.clone(),
                severity,
                parent: Some(group),
                children: Vec::new(),
            });
            nodes[group].children.push(leaf);
        }

        group
    }

    /// The marker node `item` belongs to, `None` for the root and stale handles.
    fn group_of(&self, item: TreeItem) -> Option<NodeId> {
        let id = item.node_id()?;
        let node = self.nodes.get(id)?;
        match node.parent {
            Some(parent) => Some(parent),
            None => Some(id),
        }
    }

    pub fn expand_all(&mut self) {
        for &group in &self.tree {
            self.observer.expand(TreeItem::from(group));
        }
    }

    /// Forwards a content change of a node to the view, the tree is not rebuilt.
    pub fn value_changed(&mut self, item: TreeItem) {
        self.observer.item_changed(item);
    }

    /// Deletes the check result `item` belongs to, from the provider and from the tree.
    ///
    /// Returns false, and does nothing, when the item can't be mapped back to a provider entry.
    pub fn delete_item(&mut self, item: TreeItem, deep: bool) -> bool {
        let Some(group) = self.group_of(item) else {
            debug!("delete ignored, no check result for item. item: {:?}", item);
            return false;
        };
        let Some(row) = self.tree.iter().position(|&id| id == group) else {
            debug!("delete ignored, group not in tree. group: {:?}", group);
            return false;
        };
        let Some(provider) = self.provider.as_mut() else {
            debug!("delete ignored, no provider");
            return false;
        };

        let rc_item = &self.nodes[group].rc_item;
        let index = match provider.item(row) == Some(rc_item) {
            true => Some(row),
            false => (0..provider.count(None)).find(|&index| provider.item(index) == Some(rc_item)),
        };
        let Some(index) = index else {
            debug!("delete ignored, stale item. row: {}, code: {}", row, rc_item.error_code());
            return false;
        };

        let children: Vec<TreeItem> = self.nodes[group]
            .children
            .iter()
            .map(|&child| TreeItem::from(child))
            .collect();
        for child in &children {
            if let Some(id) = child.node_id() {
                self.nodes.remove(id);
            }
        }
        self.observer.items_deleted(TreeItem::from(group), &children);

        provider.delete_item(index, deep);

        self.tree.remove(row);
        self.nodes.remove(group);
        self.observer.item_deleted(TreeItem::root(), TreeItem::from(group));

        debug!("deleted check result. row: {}, index: {}, deep: {}", row, index, deep);
        true
    }

    /// Deletes the check result of the view's current item, see [`RcTreeModel::set_selection_query`].
    pub fn delete_current_item(&mut self, deep: bool) -> bool {
        let Some(current) = self.selection.as_ref().map(|query| query()) else {
            debug!("delete ignored, no selection query");
            return false;
        };
        self.delete_item(current, deep)
    }

    pub fn delete_all_items(&mut self) {
        if let Some(provider) = self.provider.as_mut() {
            provider.delete_all_items();
        }

        self.nodes.clear();
        self.tree.clear();
        self.observer.cleared();
    }

    /// Writes the report text of every check result in the tree, then a summary line.
    pub fn report_all(&self, reporter: &mut dyn Reporter, lookup: &dyn EntityLookup) {
        for &group in &self.tree {
            let node = &self.nodes[group];
            let report = node.rc_item.show_report(lookup);
            reporter.report(report.trim_end(), node.severity);
        }

        reporter.report_tail(
            &format!("** Found {} violations **", self.tree.len()),
            Severity::Info,
        );
    }

    fn missing_entity(&self, node: &RcTreeNode, lookup: &dyn EntityLookup) -> bool {
        let mut ids = Vec::with_capacity(2);
        match node.node_type {
            NodeType::Marker => {
                if node.rc_item.has_main_item() {
                    ids.push(node.rc_item.main_item_id());
                }
                ids.extend(node.rc_item.aux_item_id());
            }
            NodeType::MainItem => ids.push(node.rc_item.main_item_id()),
            NodeType::AuxItem => ids.extend(node.rc_item.aux_item_id()),
        }

        ids.iter().any(|id| !lookup.contains(id))
    }
}

impl TreeViewModel for RcTreeModel {
    fn is_container(&self, item: TreeItem) -> bool {
        if item.is_root() {
            return true;
        }
        matches!(self.node_type(item), Some(NodeType::Marker))
    }

    fn parent(&self, item: TreeItem) -> TreeItem {
        self.node(item)
            .and_then(|node| node.parent)
            .map(TreeItem::from)
            .unwrap_or_default()
    }

    fn children(&self, item: TreeItem, children: &mut Vec<TreeItem>) -> usize {
        let ids: &[NodeId] = match item.node_id() {
            None => &self.tree,
            Some(id) => match self.nodes.get(id) {
                Some(node) => &node.children,
                None => &[],
            },
        };

        children.extend(ids.iter().map(|&id| TreeItem::from(id)));
        ids.len()
    }

    fn value(&self, item: TreeItem, _column: usize, lookup: &dyn EntityLookup) -> String {
        let Some(node) = self.node(item) else {
            return String::new();
        };

        match node.node_type {
            NodeType::Marker => node.rc_item.show_report(lookup),
            NodeType::MainItem | NodeType::AuxItem => {
                let Some(id) = self.to_uuid(item) else {
                    return String::new();
                };
                match lookup.entity(&id) {
                    Some(entity) => entity.describe(),
                    None => format!("Missing item {}", id),
                }
            }
        }
    }

    fn attr(&self, item: TreeItem, _column: usize, lookup: &dyn EntityLookup) -> Option<ItemAttr> {
        let node = self.node(item)?;

        let attr = ItemAttr {
            bold: node.node_type == NodeType::Marker,
            attention: self.missing_entity(node, lookup),
        };
        if attr.attention {
            trace!("unresolved entity. item: {:?}, type: {:?}", item, node.node_type);
        }

        match attr == ItemAttr::default() {
            true => None,
            false => Some(attr),
        }
    }
}

#[cfg(test)]
mod rc_tree_model_tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use rstest::rstest;

    use super::*;
    use crate::provider::VecItemsProvider;
    use crate::reporter::StringReporter;
    use crate::testing::{severity_by_code, test_items, RecordingObserver, TestEntity, TreeEvent};

    const ID_A: EntityId = EntityId::from_u128(0xa);
    const ID_B: EntityId = EntityId::from_u128(0xb);

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn model_with(items: Vec<RcItem>) -> RcTreeModel {
        let mut model = RcTreeModel::new();
        model.set_provider(Box::new(VecItemsProvider::new(items, severity_by_code)));
        model
    }

    fn root_children(model: &RcTreeModel) -> Vec<TreeItem> {
        let mut children = Vec::new();
        model.children(TreeItem::root(), &mut children);
        children
    }

    fn children_of(model: &RcTreeModel, item: TreeItem) -> Vec<TreeItem> {
        let mut children = Vec::new();
        model.children(item, &mut children);
        children
    }

    fn lookup() -> HashMap<EntityId, TestEntity> {
        [
            TestEntity::new(ID_A, "Track on F.Cu", 1.0, 2.0),
            TestEntity::new(ID_B, "Via", 3.0, 4.0),
        ]
        .into_iter()
        .map(|entity| (entity.id, entity))
        .collect()
    }

    #[test]
    fn test_short_circuit_scenario() {
        // given
        init_logging();
        let item = RcItem::new(42, "short circuit").with_items(ID_A, Some(ID_B));
        let mut model = model_with(vec![item]);

        // when
        model.set_severities(SeverityMask::ERRORS);

        // then
        assert_eq!(model.drc_item_count(), 1);

        let groups = root_children(&model);
        assert_eq!(groups.len(), 1);
        let group = groups[0];
        assert!(model.is_container(group));

        let leaves = children_of(&model, group);
        assert_eq!(leaves.len(), 2);
        assert_eq!(model.node_type(leaves[0]), Some(NodeType::MainItem));
        assert_eq!(model.to_uuid(leaves[0]), Some(ID_A));
        assert_eq!(model.node_type(leaves[1]), Some(NodeType::AuxItem));
        assert_eq!(model.to_uuid(leaves[1]), Some(ID_B));
        assert!(!model.is_container(leaves[0]));
        assert!(!model.is_container(leaves[1]));
    }

    #[rstest]
    #[case(SeverityMask::ALL)]
    #[case(SeverityMask::ERRORS)]
    #[case(SeverityMask::WARNINGS)]
    #[case(SeverityMask::ERRORS_AND_WARNINGS)]
    #[case(Severity::Info | Severity::Exclusion)]
    #[case(SeverityMask::NONE)]
    fn test_group_count_matches_provider_count(#[case] severities: SeverityMask) {
        // given
        let mut model = model_with(test_items(&[1, 2, 3, 4, 1, 2, 1]));

        // when
        model.set_severities(severities);

        // then
        let provider_count = model
            .provider()
            .map(|provider| provider.count(Some(severities)));
        assert_eq!(Some(model.drc_item_count()), provider_count);
        assert_eq!(root_children(&model).len(), model.drc_item_count());
    }

    #[test]
    fn test_empty_filter_hides_undefined_severities() {
        // given
        let mut model = RcTreeModel::new();
        model.set_severities(SeverityMask::NONE);

        // when
        model.set_provider(Box::new(VecItemsProvider::new(test_items(&[99, 1]), |_: &RcItem| {
            Severity::Undefined
        })));

        // then
        assert_eq!(model.drc_item_count(), 0);
        assert!(root_children(&model).is_empty());
    }

    #[test]
    fn test_main_item_only_has_one_child() {
        // given
        let model = model_with(vec![RcItem::new(1, "unconnected").with_items(ID_A, None)]);

        // when
        let group = root_children(&model)[0];
        let leaves = children_of(&model, group);

        // then
        assert_eq!(leaves.len(), 1);
        assert_eq!(model.node_type(leaves[0]), Some(NodeType::MainItem));
    }

    #[test]
    fn test_item_without_entities_has_no_children() {
        // given
        let model = model_with(vec![RcItem::new(1, "board outline missing")]);

        // when
        let group = root_children(&model)[0];

        // then
        assert_eq!(model.children(group, &mut Vec::new()), 0);
        assert!(model.is_container(group));
    }

    #[test]
    fn test_rebuild_order_is_stable() {
        // given
        // error, warning, error
        let items = test_items(&[1, 2, 1]);
        let mut model = model_with(items.clone());

        // when
        model.set_severities(SeverityMask::ERRORS);

        // then
        let order: Vec<Option<&RcItem>> = root_children(&model)
            .into_iter()
            .map(|group| model.rc_item(group))
            .collect();
        assert_eq!(order, vec![Some(&items[0]), Some(&items[2])]);
    }

    #[test]
    fn test_navigation() {
        // given
        let model = model_with(vec![RcItem::new(1, "clearance").with_items(ID_A, Some(ID_B))]);
        let group = root_children(&model)[0];
        let leaves = children_of(&model, group);

        // expect
        assert!(model.is_container(TreeItem::root()));
        assert_eq!(model.parent(TreeItem::root()), TreeItem::root());
        assert_eq!(model.parent(group), TreeItem::root());
        assert_eq!(model.parent(leaves[0]), group);
        assert_eq!(model.parent(leaves[1]), group);
        assert_eq!(model.children(leaves[0], &mut Vec::new()), 0);
    }

    #[test]
    fn test_children_appends() {
        // given
        let model = model_with(test_items(&[1, 1]));
        let mut children = vec![TreeItem::root()];

        // when
        let count = model.children(TreeItem::root(), &mut children);

        // then
        assert_eq!(count, 2);
        assert_eq!(children.len(), 3);
    }

    #[test]
    fn test_delete_item_shallow() {
        // given
        init_logging();
        let deep_deleted = Rc::new(Cell::new(0));
        let hook_count = deep_deleted.clone();
        let items = test_items(&[1, 2, 1]);
        let provider = VecItemsProvider::new(items.clone(), severity_by_code)
            .with_deep_delete_hook(move |_| hook_count.set(hook_count.get() + 1));

        let mut model = RcTreeModel::new();
        model.set_severities(SeverityMask::ERRORS);
        model.set_provider(Box::new(provider));

        let groups = root_children(&model);
        let leaf = children_of(&model, groups[1])[0];

        // when
        let deleted = model.delete_item(leaf, false);

        // then
        assert!(deleted);
        assert_eq!(deep_deleted.get(), 0);
        assert_eq!(model.drc_item_count(), 1);
        assert_eq!(model.rc_item(root_children(&model)[0]), Some(&items[0]));
        assert!(model.node(groups[1]).is_none());
        assert!(model.node(leaf).is_none());

        // and
        let provider = model.provider().unwrap();
        assert_eq!(provider.count(None), 1);
        assert_eq!(provider.count(Some(SeverityMask::ALL)), 2);
        assert_eq!(provider.item(0), Some(&items[0]));
    }

    #[test]
    fn test_delete_item_deep() {
        // given
        let deep_deleted = Rc::new(RefCell::new(Vec::new()));
        let hook_deleted = deep_deleted.clone();
        let items = test_items(&[1, 1]);
        let provider = VecItemsProvider::new(items.clone(), severity_by_code)
            .with_deep_delete_hook(move |item| hook_deleted.borrow_mut().push(item.clone()));
        let mut model = RcTreeModel::new();
        model.set_provider(Box::new(provider));

        // when
        let group = root_children(&model)[0];
        let deleted = model.delete_item(group, true);

        // then
        assert!(deleted);
        assert_eq!(*deep_deleted.borrow(), vec![items[0].clone()]);
        assert_eq!(model.drc_item_count(), 1);
    }

    #[test]
    fn test_delete_stale_item_is_a_noop() {
        // given
        let mut model = model_with(test_items(&[1, 1]));
        let group = root_children(&model)[0];

        // and
        // out-of-band change, the tree is not rebuilt
        model
            .provider_mut()
            .unwrap()
            .delete_all_items();

        // when
        let deleted = model.delete_item(group, false);

        // then
        assert!(!deleted);
        assert_eq!(model.drc_item_count(), 2);
    }

    #[test]
    fn test_delete_root_and_deleted_items_are_noops() {
        // given
        let mut model = model_with(test_items(&[1]));
        let group = root_children(&model)[0];

        // expect
        assert!(!model.delete_item(TreeItem::root(), false));
        assert!(model.delete_item(group, false));
        assert!(!model.delete_item(group, false));
        assert!(model.is_empty());
    }

    #[test]
    fn test_delete_finds_moved_item() {
        // given
        let items = test_items(&[1, 1, 1]);
        let mut model = model_with(items.clone());
        let last = root_children(&model)[2];

        // and
        // out-of-band change which shifts the provider indexes
        model
            .provider_mut()
            .unwrap()
            .delete_item(0, false);

        // when
        let deleted = model.delete_item(last, false);

        // then
        assert!(deleted);
        let provider = model.provider().unwrap();
        assert_eq!(provider.count(None), 1);
        assert_eq!(provider.item(0), Some(&items[1]));
    }

    #[test]
    fn test_delete_current_item_uses_selection_query() {
        // given
        let mut model = model_with(test_items(&[1, 2]));
        assert!(!model.delete_current_item(false));

        let selected = Rc::new(Cell::new(TreeItem::root()));
        let query_selected = selected.clone();
        model.set_selection_query(move || query_selected.get());

        // when
        selected.set(root_children(&model)[1]);
        let deleted = model.delete_current_item(false);

        // then
        assert!(deleted);
        assert_eq!(model.drc_item_count(), 1);
    }

    #[test]
    fn test_delete_all_items() {
        // given
        let mut model = model_with(test_items(&[1, 2, 3]));

        // when
        model.delete_all_items();

        // then
        assert_eq!(model.drc_item_count(), 0);
        assert_eq!(root_children(&model).len(), 0);
        assert_eq!(
            model
                .provider()
                .map(|provider| provider.count(Some(SeverityMask::ALL))),
            Some(0)
        );
    }

    #[test]
    fn test_empty_model() {
        // given
        let mut model = RcTreeModel::new();

        // when
        model.set_severities(SeverityMask::ERRORS);
        model.delete_all_items();

        // then
        assert!(model.is_empty());
        assert!(model.provider().is_none());
        assert_eq!(model.value(TreeItem::root(), 0, &lookup()), "");
    }

    #[test]
    fn test_values() {
        // given
        let model = model_with(vec![RcItem::new(42, "short circuit").with_items(ID_A, Some(EntityId::from_u128(0xc)))]);
        let group = root_children(&model)[0];
        let leaves = children_of(&model, group);

        // when
        let lookup = lookup();

        // then
        assert_eq!(
            model.value(group, 0, &lookup),
            "ErrType(42): short circuit\n    @(1.0000 mm, 2.0000 mm): Track on F.Cu\n"
        );
        assert_eq!(model.value(leaves[0], 0, &lookup), "Track on F.Cu");
        assert_eq!(
            model.value(leaves[1], 0, &lookup),
            "Missing item 00000000-0000-0000-0000-00000000000c"
        );
    }

    #[test]
    fn test_attributes_flag_unresolved_entities() {
        // given
        let model = model_with(vec![
            RcItem::new(1, "clearance").with_items(ID_A, Some(ID_B)),
            RcItem::new(1, "clearance").with_items(ID_A, Some(EntityId::from_u128(0xc))),
        ]);
        let groups = root_children(&model);
        let resolved_leaves = children_of(&model, groups[0]);
        let stale_leaves = children_of(&model, groups[1]);
        let lookup = lookup();

        // expect
        let heading = Some(ItemAttr {
            bold: true,
            attention: false,
        });
        let stale_heading = Some(ItemAttr {
            bold: true,
            attention: true,
        });
        let stale_leaf = Some(ItemAttr {
            bold: false,
            attention: true,
        });
        assert_eq!(model.attr(groups[0], 0, &lookup), heading);
        assert_eq!(model.attr(resolved_leaves[0], 0, &lookup), None);
        assert_eq!(model.attr(resolved_leaves[1], 0, &lookup), None);
        assert_eq!(model.attr(groups[1], 0, &lookup), stale_heading);
        assert_eq!(model.attr(stale_leaves[0], 0, &lookup), None);
        assert_eq!(model.attr(stale_leaves[1], 0, &lookup), stale_leaf);
        assert_eq!(model.attr(TreeItem::root(), 0, &lookup), None);
    }

    #[test]
    fn test_editing_is_rejected() {
        // given
        let mut model = model_with(test_items(&[1]));
        let group = root_children(&model)[0];

        // expect
        assert!(!model.set_value(group, 0, "edited"));
        assert_eq!(model.column_count(), 1);
    }

    #[test]
    fn test_observer_notifications() {
        // given
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut model = RcTreeModel::new();
        model.set_observer(Box::new(RecordingObserver::new(events.clone())));

        // when
        model.set_provider(Box::new(VecItemsProvider::new(
            vec![RcItem::new(1, "clearance").with_items(ID_A, Some(ID_B))],
            severity_by_code,
        )));
        let group = root_children(&model)[0];
        let leaves = children_of(&model, group);
        model.expand_all();
        model.value_changed(leaves[0]);
        model.delete_item(group, false);

        // then
        assert_eq!(
            *events.borrow(),
            vec![
                TreeEvent::Cleared,
                TreeEvent::Expand(group),
                TreeEvent::ItemChanged(leaves[0]),
                TreeEvent::ItemsDeleted(group, leaves.clone()),
                TreeEvent::ItemDeleted(TreeItem::root(), group),
            ]
        );
    }

    #[test]
    fn test_report_all() {
        // given
        let model = model_with(vec![
            RcItem::new(42, "short circuit").with_items(ID_A, Some(ID_B)),
            RcItem::new(2, "silk over pad"),
        ]);
        let mut report = String::new();

        // when
        model.report_all(&mut StringReporter::new(&mut report), &lookup());

        // then
        assert_eq!(
            report,
            "ErrType(42): short circuit\n    @(1.0000 mm, 2.0000 mm): Track on F.Cu\n    @(3.0000 mm, 4.0000 mm): Via\n\
             ErrType(2): silk over pad\n\
             ** Found 2 violations **\n"
        );
    }

    #[test]
    fn test_node_severity_comes_from_provider() {
        // given
        let model = model_with(test_items(&[2, 1]));
        let groups = root_children(&model);

        // expect
        assert_eq!(model.severity(groups[0]), Some(Severity::Warning));
        assert_eq!(model.severity(groups[1]), Some(Severity::Error));
    }
}
