use log::{debug, trace, warn};

use crate::item::RcItem;
use crate::severity::{Severity, SeverityMask};

/// Abstract access to a list of check results.
///
/// The details of the list storage are hidden, so a tree model can project any list (board markers, schematic
/// markers, a saved report...) without knowing how it's stored.
pub trait RcItemsProvider {
    /// Sets the severities of the items exposed by [`count(None)`](Self::count) and [`item`](Self::item).
    fn set_severities(&mut self, severities: SeverityMask);

    /// With `None`, the number of items matching the current severities.
    /// With `Some(mask)`, the number of all items whose severity is in `mask`.
    fn count(&self, severities: Option<SeverityMask>) -> usize;

    /// Retrieves an item by index, in the filtered list.
    fn item(&self, index: usize) -> Option<&RcItem>;

    /// Severity of an item in the filtered list.
    fn severity(&self, _index: usize) -> Severity {
        Severity::Undefined
    }

    /// Removes the indexed item from the filtered list.
    ///
    /// If `deep` is true the source of the item (e.g. the marker or the offending entity) is deleted too.
    fn delete_item(&mut self, index: usize, deep: bool);

    /// Removes and deletes all the items.
    fn delete_all_items(&mut self);
}

pub type SeverityResolver = Box<dyn Fn(&RcItem) -> Severity>;

pub type DeepDeleteHook = Box<dyn FnMut(&RcItem)>;

/// An [`RcItemsProvider`] backed by a `Vec`.
///
/// The host supplies the error code to severity mapping, and optionally a hook which destroys the source of an item
/// when it's deleted with `deep = true`.
pub struct VecItemsProvider {
    items: Vec<RcItem>,
    resolver: SeverityResolver,
    deep_delete_hook: Option<DeepDeleteHook>,
    severities: SeverityMask,
    /// Indexes into `items` of the items matching `severities`, in list order.
    filtered: Vec<usize>,
}

impl VecItemsProvider {
    pub fn new<F>(items: Vec<RcItem>, resolver: F) -> Self
    where
        F: Fn(&RcItem) -> Severity + 'static,
    {
        let mut provider = Self {
            items,
            resolver: Box::new(resolver),
            deep_delete_hook: None,
            severities: SeverityMask::ALL,
            filtered: Vec::new(),
        };
        provider.refilter();
        provider
    }

    pub fn with_deep_delete_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&RcItem) + 'static,
    {
        self.deep_delete_hook = Some(Box::new(hook));
        self
    }

    pub fn push(&mut self, item: RcItem) {
        self.items.push(item);
        self.refilter();
    }

    /// All items, regardless of the current severities.
    pub fn items(&self) -> &[RcItem] {
        &self.items
    }

    pub fn severities(&self) -> SeverityMask {
        self.severities
    }

    fn refilter(&mut self) {
        let severities = self.severities;
        let resolver = &self.resolver;
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| severities.contains(resolver(*item)))
            .map(|(index, _)| index)
            .collect();

        trace!(
            "refiltered. severities: {}, items: {}, filtered: {}",
            severities,
            self.items.len(),
            self.filtered.len()
        );
    }
}

impl RcItemsProvider for VecItemsProvider {
    fn set_severities(&mut self, severities: SeverityMask) {
        self.severities = severities;
        self.refilter();
    }

    fn count(&self, severities: Option<SeverityMask>) -> usize {
        match severities {
            None => self.filtered.len(),
            Some(mask) => self
                .items
                .iter()
                .filter(|item| mask.contains((self.resolver)(*item)))
                .count(),
        }
    }

    fn item(&self, index: usize) -> Option<&RcItem> {
        self.filtered
            .get(index)
            .map(|&item_index| &self.items[item_index])
    }

    fn severity(&self, index: usize) -> Severity {
        self.item(index)
            .map(|item| (self.resolver)(item))
            .unwrap_or_default()
    }

    fn delete_item(&mut self, index: usize, deep: bool) {
        debug_assert!(index < self.filtered.len(), "index out of range. index: {}", index);

        let Some(&item_index) = self.filtered.get(index) else {
            warn!(
                "Ignoring delete of an item outside the filtered list. index: {}, count: {}",
                index,
                self.filtered.len()
            );
            return;
        };

        let item = self.items.remove(item_index);
        debug!("deleted item. index: {}, code: {}, deep: {}", index, item.error_code(), deep);

        if deep {
            if let Some(hook) = self.deep_delete_hook.as_mut() {
                hook(&item);
            }
        }

        self.refilter();
    }

    fn delete_all_items(&mut self) {
        debug!("deleting all items. count: {}", self.items.len());
        self.items.clear();
        self.filtered.clear();
    }
}
