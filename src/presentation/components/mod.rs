mod detail;
mod footer;
mod form;
mod header;
mod layout;
mod sidebar;
mod table;

pub use detail::{render_detail, render_file_prompt};
pub use footer::render_footer;
pub use form::render_form;
pub use header::render_header;
pub use sidebar::render_sidebar;
pub use table::{render_search_bar, render_table};
