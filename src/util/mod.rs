pub mod date;
pub mod image;
