pub mod convert;
pub mod destroy;
pub mod render;
