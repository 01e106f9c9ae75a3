pub mod compare;
pub mod import;
pub mod periods;
pub mod setup;
pub mod ui;
