//! Severity-filtered tree projection of design-rule (DRC) and electrical-rule (ERC) check results.
//!
//! An [`RcItemsProvider`] owns a list of [`RcItem`]s, an [`RcTreeModel`] projects the list into a tree with one node
//! per check result and up to two child nodes for the entities involved, for display by a tree view.

mod entity;
mod id;
mod item;
mod provider;
mod reporter;
mod severity;
mod tree;

#[cfg(feature = "egui")]
mod ui;

pub use entity::*;
pub use id::*;
pub use item::*;
pub use provider::*;
pub use reporter::*;
pub use severity::*;
pub use tree::*;
#[cfg(feature = "egui")]
pub use ui::*;

/// re-export 'egui' crate
#[cfg(feature = "egui")]
pub use egui;

#[cfg(feature = "testing")]
pub mod testing;
