//! Command implementations for panel-cli

pub mod asset;
pub mod list;
pub mod paths;
pub mod rank;
pub mod show;

pub use asset::run_asset;
pub use list::run_list;
pub use paths::run_paths;
pub use rank::run_rank;
pub use show::run_show;
