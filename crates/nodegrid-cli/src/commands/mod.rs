pub mod allocate;
pub mod hosts;
pub mod render;
