//! UI Components
//!
//! Reusable Leptos components.

mod confirm_dialog;
mod contribution_chart;
mod contribution_form;
mod contribution_table;
mod notice_banner;
mod settings_panel;
mod summary_cards;

pub use confirm_dialog::ConfirmDialog;
pub use contribution_chart::ContributionChart;
pub use contribution_form::ContributionForm;
pub use contribution_table::ContributionTable;
pub use notice_banner::NoticeBanner;
pub use settings_panel::SettingsPanel;
pub use summary_cards::SummaryCards;
