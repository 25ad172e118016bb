use crate::entity::{BoardEntity, EntityLookup, Position};
use crate::id::{EntityId, MarkerId};

/// A design-rule (board) or electrical-rule (schematic) check result.
///
/// An `RcItem` refers to zero, one, or two design entities by id. The first one is the offending entity, the second
/// one, if any, is the entity it conflicts with.
///
/// Severity is not stored here, providers resolve it from the error code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RcItem {
    error_code: i32,
    error_message: String,
    error_title: String,
    marker: Option<MarkerId>,
    main_item: EntityId,
    aux_item: Option<EntityId>,
}

impl RcItem {
    pub fn new(error_code: i32, error_message: impl Into<String>) -> Self {
        Self {
            error_code,
            error_message: error_message.into(),
            ..Self::default()
        }
    }

    /// The title is the generic text for the error code, e.g. "Clearance violation".
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.error_title = title.into();
        self
    }

    pub fn with_items(mut self, main: EntityId, aux: Option<EntityId>) -> Self {
        self.set_items(main, aux);
        self
    }

    pub fn with_marker(mut self, marker: MarkerId) -> Self {
        self.marker = Some(marker);
        self
    }

    /// A nil `aux` is treated as no auxiliary entity.
    pub fn set_items(&mut self, main: EntityId, aux: Option<EntityId>) {
        self.main_item = main;
        self.aux_item = aux.filter(|id| !id.is_nil());
    }

    pub fn set_entities(&mut self, main: &dyn BoardEntity, aux: Option<&dyn BoardEntity>) {
        self.set_items(main.id(), aux.map(|entity| entity.id()));
    }

    pub fn main_item_id(&self) -> EntityId {
        self.main_item
    }

    pub fn aux_item_id(&self) -> Option<EntityId> {
        self.aux_item
    }

    pub fn has_main_item(&self) -> bool {
        !self.main_item.is_nil()
    }

    pub fn error_code(&self) -> i32 {
        self.error_code
    }

    pub fn set_error_code(&mut self, code: i32) {
        self.error_code = code;
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.error_message = message.into();
    }

    pub fn error_title(&self) -> &str {
        &self.error_title
    }

    /// The specific message, falling back to the title when no message was given.
    pub fn error_message(&self) -> &str {
        match self.error_message.is_empty() {
            true => &self.error_title,
            false => &self.error_message,
        }
    }

    pub fn marker(&self) -> Option<MarkerId> {
        self.marker
    }

    pub fn set_marker(&mut self, marker: Option<MarkerId>) {
        self.marker = marker;
    }

    /// Formats a position for reports, always in millimeters.
    pub fn show_coord(position: Position) -> String {
        format!("@({:.4} mm, {:.4} mm)", position.x, position.y)
    }

    /// Multi-line report text, suitable for saving to disk.
    ///
    /// Reports are machine-processed by some users, so the layout and the numeric error code are kept stable.
    pub fn show_report(&self, lookup: &dyn EntityLookup) -> String {
        let main = match self.has_main_item() {
            true => lookup.entity(&self.main_item),
            false => None,
        };
        let aux = self
            .aux_item
            .and_then(|id| lookup.entity(&id));

        let mut report = format!("ErrType({}): {}\n", self.error_code, self.error_message());

        if let Some(main) = main {
            report.push_str(&Self::entity_line(main));

            if let Some(aux) = aux {
                report.push_str(&Self::entity_line(aux));
            }
        }

        report
    }

    fn entity_line(entity: &dyn BoardEntity) -> String {
        format!("    {}: {}\n", Self::show_coord(entity.position()), entity.describe())
    }
}
