//! Row-level action affordances (view / edit / delete).
//!
//! Callbacks map the clicked row to a caller-defined message `A`, in the
//! same way the rest of the UI turns input into actions. A click on an
//! action icon is consumed by that icon and never reaches the row-click
//! callback.

use std::fmt;

use crate::i18n::{Language, Text};

/// Id of the synthetic, non-sortable actions column.
pub const ACTIONS_COLUMN_ID: &str = "actions";

/// An action offered for every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

impl RowAction {
    /// Icon drawn in the actions column.
    pub fn icon(self) -> &'static str {
        match self {
            RowAction::View => "👁",
            RowAction::Edit => "✎",
            RowAction::Delete => "🗑",
        }
    }

    /// Keyboard shortcut for the selected row.
    pub fn key(self) -> char {
        match self {
            RowAction::View => 'v',
            RowAction::Edit => 'e',
            RowAction::Delete => 'd',
        }
    }

    pub fn label(self, lang: Language) -> &'static str {
        match self {
            RowAction::View => lang.text(Text::View),
            RowAction::Edit => lang.text(Text::Edit),
            RowAction::Delete => lang.text(Text::Delete),
        }
    }
}

/// Where a click on a row landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Anywhere on the row outside the action icons.
    Row,
    /// One of the icons in the actions column.
    Action(RowAction),
}

type RowCallback<T, A> = Box<dyn Fn(&T) -> A>;

/// Optional per-row callbacks.
pub struct RowActions<T, A> {
    on_row_click: Option<RowCallback<T, A>>,
    on_view: Option<RowCallback<T, A>>,
    on_edit: Option<RowCallback<T, A>>,
    on_delete: Option<RowCallback<T, A>>,
}

impl<T, A> Default for RowActions<T, A> {
    fn default() -> Self {
        Self {
            on_row_click: None,
            on_view: None,
            on_edit: None,
            on_delete: None,
        }
    }
}

impl<T, A> RowActions<T, A> {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_row_click(mut self, f: impl Fn(&T) -> A + 'static) -> Self {
        self.on_row_click = Some(Box::new(f));
        self
    }

    pub fn on_view(mut self, f: impl Fn(&T) -> A + 'static) -> Self {
        self.on_view = Some(Box::new(f));
        self
    }

    pub fn on_edit(mut self, f: impl Fn(&T) -> A + 'static) -> Self {
        self.on_edit = Some(Box::new(f));
        self
    }

    pub fn on_delete(mut self, f: impl Fn(&T) -> A + 'static) -> Self {
        self.on_delete = Some(Box::new(f));
        self
    }

    fn callback(&self, action: RowAction) -> Option<&RowCallback<T, A>> {
        match action {
            RowAction::View => self.on_view.as_ref(),
            RowAction::Edit => self.on_edit.as_ref(),
            RowAction::Delete => self.on_delete.as_ref(),
        }
    }

    /// Whether the synthetic actions column is shown.
    pub fn has_actions_column(&self) -> bool {
        !self.available().is_empty()
    }

    /// The actions with a callback, in display order.
    pub fn available(&self) -> Vec<RowAction> {
        [RowAction::View, RowAction::Edit, RowAction::Delete]
            .into_iter()
            .filter(|&a| self.callback(a).is_some())
            .collect()
    }

    /// Invoke one action for a row.
    pub fn invoke(&self, action: RowAction, row: &T) -> Option<A> {
        self.callback(action).map(|f| f(row))
    }

    /// Resolve a click on a row.
    pub fn click(&self, target: ClickTarget, row: &T) -> Option<A> {
        match target {
            ClickTarget::Action(action) => self.invoke(action, row),
            ClickTarget::Row => self.on_row_click.as_ref().map(|f| f(row)),
        }
    }
}

impl<T, A> fmt::Debug for RowActions<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowActions")
            .field("row_click", &self.on_row_click.is_some())
            .field("available", &self.available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: &'static str,
        name: &'static str,
    }

    #[derive(Debug, PartialEq)]
    enum Msg {
        Open(&'static str),
        Delete(Row),
        Edit(Row),
    }

    #[test]
    fn test_delete_icon_does_not_trigger_row_click() {
        let row_clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&row_clicks);
        let actions = RowActions::new()
            .on_row_click(move |r: &Row| {
                counter.set(counter.get() + 1);
                Msg::Open(r.id)
            })
            .on_delete(|r: &Row| Msg::Delete(r.clone()));

        let row = Row { id: "u1", name: "Ali" };
        let msg = actions.click(ClickTarget::Action(RowAction::Delete), &row);

        assert_eq!(msg, Some(Msg::Delete(row.clone())));
        assert_eq!(row_clicks.get(), 0);
    }

    #[test]
    fn test_row_click_outside_icons() {
        let actions = RowActions::new().on_row_click(|r: &Row| Msg::Open(r.id));
        let row = Row { id: "u2", name: "Sara" };
        assert_eq!(actions.click(ClickTarget::Row, &row), Some(Msg::Open("u2")));
    }

    #[test]
    fn test_actions_column_only_with_action_callbacks() {
        let none: RowActions<Row, Msg> = RowActions::new().on_row_click(|r: &Row| Msg::Open(r.id));
        assert!(!none.has_actions_column());

        let some: RowActions<Row, Msg> = RowActions::new()
            .on_edit(|r: &Row| Msg::Edit(r.clone()))
            .on_delete(|r: &Row| Msg::Delete(r.clone()));
        assert!(some.has_actions_column());
        assert_eq!(some.available(), vec![RowAction::Edit, RowAction::Delete]);
    }

    #[test]
    fn test_missing_callback_yields_nothing() {
        let actions: RowActions<Row, Msg> = RowActions::new();
        let row = Row { id: "u3", name: "Omar" };
        assert_eq!(actions.click(ClickTarget::Action(RowAction::View), &row), None);
        assert_eq!(actions.click(ClickTarget::Row, &row), None);
    }
}
