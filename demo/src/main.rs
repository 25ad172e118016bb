use std::collections::HashMap;

use egui::ViewportBuilder;
use log::info;
use nalgebra::Point2;
use rc_tree::{
    report_panel_ui, severity_filter_ui, BoardEntity, EntityId, PanelReporter, Position, RcItem, RcTreeModel,
    RcTreeView, ReportPanel, Reporter, Severity, SeverityMask, VecItemsProvider,
};

// error codes of the demo checker
const ERR_CLEARANCE: i32 = 1;
const ERR_SILK_OVER_PAD: i32 = 2;
const ERR_UNCONNECTED: i32 = 3;
const ERR_SHORT: i32 = 42;

struct DemoEntity {
    id: EntityId,
    description: &'static str,
    position: Position,
}

impl BoardEntity for DemoEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn describe(&self) -> String {
        self.description.to_string()
    }
}

fn severity(item: &RcItem) -> Severity {
    match item.error_code() {
        ERR_SILK_OVER_PAD => Severity::Warning,
        ERR_UNCONNECTED => Severity::Info,
        _ => Severity::Error,
    }
}

struct DemoApp {
    model: RcTreeModel,
    view: RcTreeView,
    entities: HashMap<EntityId, DemoEntity>,
    severities: SeverityMask,
    report_panel: ReportPanel,
    report_filter: SeverityMask,
}

impl DemoApp {
    pub fn new() -> Self {
        let board = [
            ("Track on F.Cu, length 12.7000 mm", 10.0, 5.0),
            ("Track on F.Cu, length 3.8100 mm", 10.2, 5.1),
            ("Pad 1 of U3", 22.86, 7.62),
            ("Text 'REF**' on F.Silkscreen", 22.5, 7.5),
            ("Via [GND]", 30.0, 12.0),
        ];

        let board: Vec<DemoEntity> = board
            .into_iter()
            .map(|(description, x, y)| DemoEntity {
                id: EntityId::new(),
                description,
                position: Point2::new(x, y),
            })
            .collect();
        let id = |index: usize| board[index].id;

        let items = vec![
            RcItem::new(ERR_CLEARANCE, "Clearance violation (netclass 'Default' clearance 0.2000 mm; actual 0.1000 mm)")
                .with_items(id(0), Some(id(1))),
            RcItem::new(ERR_SILK_OVER_PAD, "").with_title("Silkscreen overlaps pad").with_items(id(3), Some(id(2))),
            RcItem::new(ERR_SHORT, "Items shorting two nets").with_items(id(2), Some(id(4))),
            RcItem::new(ERR_UNCONNECTED, "Missing connection").with_items(id(1), None),
            RcItem::new(ERR_CLEARANCE, "Clearance violation, deleted via").with_items(EntityId::new(), None),
        ];

        let entities: HashMap<EntityId, DemoEntity> = board
            .into_iter()
            .map(|entity| (entity.id, entity))
            .collect();

        let provider = VecItemsProvider::new(items, severity).with_deep_delete_hook(|item| {
            info!("deep delete requested. source: {}", item.main_item_id());
        });

        let view = RcTreeView::new();
        let mut model = RcTreeModel::new();
        model.set_observer(view.observer());
        model.set_selection_query(view.selection_query());

        let severities = SeverityMask::ERRORS_AND_WARNINGS;
        model.set_severities(severities);
        model.set_provider(Box::new(provider));
        model.expand_all();

        Self {
            model,
            view,
            entities,
            severities,
            report_panel: ReportPanel::new(),
            report_filter: SeverityMask::ALL,
        }
    }

    fn run_report(&mut self) {
        self.report_panel.clear();
        let mut reporter = PanelReporter::new(&mut self.report_panel);
        reporter.report_head("Design rule check report", Severity::Undefined);
        self.model.report_all(&mut reporter, &self.entities);
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if severity_filter_ui(ui, &mut self.severities) {
                    self.model.set_severities(self.severities);
                }

                ui.separator();

                if ui.button("Delete marker").clicked() {
                    self.model.delete_current_item(false);
                }
                if ui.button("Delete marker and source").clicked() {
                    self.model.delete_current_item(true);
                }
                if ui.button("Delete all").clicked() {
                    self.model.delete_all_items();
                }
                if ui.button("Report").clicked() {
                    self.run_report();
                }
            });
        });

        egui::TopBottomPanel::bottom("report")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                report_panel_ui(ui, &self.report_panel, &mut self.report_filter);
            });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(format!("{} items shown", self.model.drc_item_count()));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.view.show(ui, &self.model, &self.entities);
        });
    }
}

fn main() -> eframe::Result<()> {
    init();
    eframe::run_native(
        "Check Results Demo (egui)",
        eframe::NativeOptions {
            viewport: ViewportBuilder::default().with_inner_size([1024.0, 768.0]),
            ..Default::default()
        },
        Box::new(|_cc| Ok(Box::new(DemoApp::new()))),
    )
}

pub fn init() {
    env_logger::init(); // Log to stderr (optional).

    #[cfg(feature = "profile-with-puffin")]
    {
        start_puffin_server();
    }
}

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() {
    use log::error;

    profiling::puffin::set_scopes_on(true); // tell puffin to collect data

    match puffin_http::Server::new("127.0.0.1:8585") {
        Ok(puffin_server) => {
            info!("Run:  cargo install puffin_viewer && puffin_viewer --url 127.0.0.1:8585");

            std::process::Command::new("puffin_viewer")
                .arg("--url")
                .arg("127.0.0.1:8585")
                .spawn()
                .ok();

            // Dropping the server closes it, keep it running.
            #[allow(clippy::mem_forget)]
            std::mem::forget(puffin_server);
        }
        Err(err) => {
            error!("Failed to start puffin server: {err}");
        }
    };
}
