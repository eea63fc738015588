//! UI drawing module
//!
//! This module is organized into focused submodules:
//! - `components`: Reusable UI components (header, tab bar, footer, inputs, cards)
//! - `modals`: Modal dialogs (endpoints, admin confirmation, record detail)
//! - `panels`: Main panels (form, results)
//! - `tabs`: Per-tab content of the form panel
//! - `styling`: Color schemes and style constants

mod components;
mod modals;
mod panels;
mod styling;
mod tabs;

pub use components::{HeaderInfo, render_footer, render_header, render_tab_bar};
pub use modals::{render_confirm_admin_modal, render_detail_modal, render_endpoints_modal};
pub use panels::{render_form_panel, render_results_panel};
