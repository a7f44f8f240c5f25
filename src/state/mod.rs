pub mod post_editor;
pub mod profile_editor;
pub mod session;
