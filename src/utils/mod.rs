pub mod pdf;
pub mod text;
