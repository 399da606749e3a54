//! Reusable UI components.

mod help_bar;
mod input;
mod loading;
mod modal;
mod notification;
mod resume_picker;
mod text_editor;

pub use help_bar::render_help_bar;
pub use input::TextInput;
pub use loading::LoadingIndicator;
pub use modal::{ConfirmAction, ConfirmDialog, ErrorDialog};
pub use notification::NotificationManager;
pub use resume_picker::{ResumePicker, ResumePickerAction};
pub use text_editor::TextEditor;
