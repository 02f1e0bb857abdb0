pub mod create;
pub mod render;
