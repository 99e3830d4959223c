pub mod icons;
pub mod output;
pub mod progress;
pub mod progress_message;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{banner, diagnostic, header, info, section, skipped, status, success, summary_row};
pub use progress::ProgressManager;
pub use progress_message::{ProgressMessage, ProgressPhase};
pub use table::{error_table, node_table, skipped_table, stats_table, TableBuilder};
pub use theme::{err_theme, theme, Theme};
