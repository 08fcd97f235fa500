pub mod args;
pub mod character;
pub mod core;
pub mod economy;
pub mod frame;
pub mod global_asset;
pub mod shop;
pub mod system_set;
pub mod ui;
pub mod waves;
