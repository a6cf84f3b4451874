pub mod shell;
pub mod text;
