pub mod help;
pub mod multiline;
pub mod scene;
