pub mod header;
pub mod media_preview;
pub mod mode_tabs;
pub mod result_panel;
pub mod upload_area;
