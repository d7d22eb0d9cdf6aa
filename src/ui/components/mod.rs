//! Reusable UI components.

mod form;
mod help_bar;
mod input;
mod loading;
mod modal;
mod notification;
mod table;

pub use form::{FieldKind, FormAction, FormDialog, FormField, Label};
pub use help_bar::{context_hints, render_context_help};
pub use input::{InputMode, TextInput};
pub use loading::{LoadingIndicator, SpinnerStyle};
pub use modal::{centered_rect, ConfirmAction, ConfirmDialog, DetailDialog, ErrorDialog};
pub use notification::{toast_area, Notification, NotificationManager, NotificationType};
pub use table::{DataTable, TableOutcome};
