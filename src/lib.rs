pub mod bump;
pub mod changelog;
pub mod commit;
pub mod config;
pub mod error;
pub mod git_ops;
pub mod ui;
pub mod updater;
pub mod version;

pub use error::{Result, SembumpError};
