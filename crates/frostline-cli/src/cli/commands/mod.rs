pub mod config;
pub mod dispatch;
pub mod input;
pub mod plan;
pub mod render;
pub mod upgrade_state;

pub use dispatch::dispatch;
