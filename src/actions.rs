//! Icon action buttons
//!
//! Stateless descriptions of the two row actions a listing view offers. Each
//! button pairs a fixed icon and accessible label with a zero-argument
//! handler, and does nothing on activation except call that handler.

use serde::Serialize;
use std::fmt;

/// The actions a row can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconAction {
    /// Remove the item
    Delete,
    /// Open the item
    View,
}

impl IconAction {
    /// Label exposed to assistive technology only
    pub fn label(self) -> &'static str {
        match self {
            IconAction::Delete => "Delete",
            IconAction::View => "View",
        }
    }

    /// Icon identifier rendered inside the button
    pub fn icon(self) -> &'static str {
        match self {
            IconAction::Delete => "trash",
            IconAction::View => "eye",
        }
    }
}

impl fmt::Display for IconAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A button bound to one action and its handler
pub struct IconButton<F: FnMut()> {
    action: IconAction,
    on_click: F,
}

impl<F: FnMut()> IconButton<F> {
    /// Bind `on_click` to `action`
    pub fn new(action: IconAction, on_click: F) -> Self {
        Self { action, on_click }
    }

    /// Delete button
    pub fn delete(on_click: F) -> Self {
        Self::new(IconAction::Delete, on_click)
    }

    /// View button
    pub fn view(on_click: F) -> Self {
        Self::new(IconAction::View, on_click)
    }

    /// The bound action
    pub fn action(&self) -> IconAction {
        self.action
    }

    /// Accessible label
    pub fn label(&self) -> &'static str {
        self.action.label()
    }

    /// Activate the button, calling the handler once
    pub fn activate(&mut self) {
        (self.on_click)();
    }
}

impl<F: FnMut()> fmt::Debug for IconButton<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconButton")
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}
