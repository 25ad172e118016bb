use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use egui::collapsing_header::CollapsingState;
use egui::{Color32, RichText, Ui, Visuals};
use log::{debug, trace};

use crate::entity::EntityLookup;
use crate::reporter::ReportPanel;
use crate::severity::{Severity, SeverityMask};
use crate::tree::{RcTreeModel, TreeItem, TreeModelObserver, TreeViewModel};

pub fn severity_color(visuals: &Visuals, severity: Severity) -> Color32 {
    match severity {
        Severity::Error => visuals.error_fg_color,
        Severity::Warning => visuals.warn_fg_color,
        Severity::Action => Color32::from_rgb(46, 204, 113),
        Severity::Exclusion | Severity::Ignore => visuals.weak_text_color(),
        Severity::Info | Severity::Undefined => visuals.text_color(),
    }
}

/// Checkboxes for the severities shown in a check results list, returns true if `severities` changed.
pub fn severity_filter_ui(ui: &mut Ui, severities: &mut SeverityMask) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        for (severity, label) in [
            (Severity::Error, "Errors"),
            (Severity::Warning, "Warnings"),
            (Severity::Info, "Infos"),
            (Severity::Exclusion, "Exclusions"),
        ] {
            let mut enabled = severities.contains(severity);
            if ui.checkbox(&mut enabled, label).changed() {
                severities.set(severity, enabled);
                changed = true;
            }
        }
    });

    if changed {
        debug!("severity filter changed. severities: {}", severities);
    }
    changed
}

#[derive(Debug, Default)]
struct ViewState {
    selected: TreeItem,
    expand_requests: HashSet<TreeItem>,
    changed: bool,
}

/// Keeps an [`RcTreeView`] in sync with its model.
struct ViewObserver {
    state: Rc<RefCell<ViewState>>,
}

impl TreeModelObserver for ViewObserver {
    fn cleared(&mut self) {
        let mut state = self.state.borrow_mut();
        state.selected = TreeItem::root();
        state.expand_requests.clear();
        state.changed = true;
    }

    fn item_deleted(&mut self, _parent: TreeItem, item: TreeItem) {
        let mut state = self.state.borrow_mut();
        if state.selected == item {
            state.selected = TreeItem::root();
        }
        state.expand_requests.remove(&item);
        state.changed = true;
    }

    fn items_deleted(&mut self, _parent: TreeItem, items: &[TreeItem]) {
        let mut state = self.state.borrow_mut();
        if items.contains(&state.selected) {
            state.selected = TreeItem::root();
        }
        state.changed = true;
    }

    fn item_changed(&mut self, _item: TreeItem) {
        self.state.borrow_mut().changed = true;
    }

    fn expand(&mut self, item: TreeItem) {
        self.state
            .borrow_mut()
            .expand_requests
            .insert(item);
    }
}

/// egui view of an [`RcTreeModel`].
///
/// Install [`RcTreeView::observer`] and [`RcTreeView::selection_query`] on the model so the view follows the model's
/// changes and `delete_current_item` deletes the item selected in the view.
pub struct RcTreeView {
    state: Rc<RefCell<ViewState>>,
}

impl Default for RcTreeView {
    fn default() -> Self {
        Self::new()
    }
}

impl RcTreeView {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ViewState::default())),
        }
    }

    pub fn observer(&self) -> Box<dyn TreeModelObserver> {
        Box::new(ViewObserver {
            state: self.state.clone(),
        })
    }

    pub fn selection_query(&self) -> impl Fn() -> TreeItem + 'static {
        let state = self.state.clone();
        move || state.borrow().selected
    }

    pub fn selected(&self) -> TreeItem {
        self.state.borrow().selected
    }

    /// Returns the item clicked this frame, if any.
    pub fn show(&mut self, ui: &mut Ui, model: &RcTreeModel, lookup: &dyn EntityLookup) -> Option<TreeItem> {
        profiling::scope!("rc_tree_view");

        if std::mem::take(&mut self.state.borrow_mut().changed) {
            ui.ctx().request_repaint();
        }

        let mut clicked = None;
        let mut groups = Vec::new();
        model.children(TreeItem::root(), &mut groups);

        if groups.is_empty() {
            ui.label(RichText::new("No violations").weak());
            return None;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for group in groups {
                    let id = ui.make_persistent_id(group);
                    let mut collapsing = CollapsingState::load_with_default_open(ui.ctx(), id, false);
                    if self
                        .state
                        .borrow_mut()
                        .expand_requests
                        .remove(&group)
                    {
                        collapsing.set_open(true);
                    }

                    let report = model.value(group, 0, lookup);
                    let title = report
                        .lines()
                        .next()
                        .unwrap_or_default()
                        .to_string();
                    let title = self.item_text(ui, model, group, title, lookup);

                    collapsing
                        .show_header(ui, |ui| {
                            let response = ui
                                .selectable_label(self.selected() == group, title)
                                .on_hover_text(report.trim_end());
                            if response.clicked() {
                                clicked = Some(group);
                            }
                        })
                        .body(|ui| {
                            let mut leaves = Vec::new();
                            model.children(group, &mut leaves);
                            for leaf in leaves {
                                let text = model.value(leaf, 0, lookup);
                                let text = self.item_text(ui, model, leaf, text, lookup);
                                if ui
                                    .selectable_label(self.selected() == leaf, text)
                                    .clicked()
                                {
                                    clicked = Some(leaf);
                                }
                            }
                        });
                }
            });

        if let Some(item) = clicked {
            trace!("selected. item: {:?}", item);
            self.state.borrow_mut().selected = item;
        }

        clicked
    }

    fn item_text(
        &self,
        ui: &Ui,
        model: &RcTreeModel,
        item: TreeItem,
        text: String,
        lookup: &dyn EntityLookup,
    ) -> RichText {
        let visuals = ui.visuals();
        let attr = model
            .attr(item, 0, lookup)
            .unwrap_or_default();

        match (attr.attention, attr.bold) {
            (true, true) => RichText::new(text)
                .strong()
                .italics()
                .color(visuals.error_fg_color),
            (true, false) => RichText::new(text)
                .italics()
                .color(visuals.error_fg_color),
            (false, true) => {
                let severity = model.severity(item).unwrap_or_default();
                RichText::new(text)
                    .strong()
                    .color(severity_color(visuals, severity))
            }
            (false, false) => RichText::new(text),
        }
    }
}

/// Shows the lines of a report panel, with a severity filter above them.
pub fn report_panel_ui(ui: &mut Ui, panel: &ReportPanel, filter: &mut SeverityMask) {
    profiling::scope!("report_panel");

    severity_filter_ui(ui, filter);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for line in panel.lines(*filter) {
                let text = match line.severity {
                    Severity::Undefined => RichText::new(&line.text),
                    severity => RichText::new(format!("{}: {}", severity, line.text))
                        .color(severity_color(ui.visuals(), severity)),
                };
                ui.label(text);
            }
        });
}
