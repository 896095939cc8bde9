pub mod dialogs;
pub mod form_field;
pub mod keybindings;
mod panels;
pub mod report_view;
pub mod terminal_guard;
pub mod workflow_view;

pub use dialogs::{HelpDialog, NotificationDialog, NotificationKind};
pub use panels::{truncate_status, HeaderBar, LogPanel, StatusBar};
pub use report_view::{ReportState, ReportView};
pub use workflow_view::{StepStatus, WorkflowScreen};
