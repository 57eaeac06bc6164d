pub mod add;
pub mod common;
pub mod completions;
pub mod delete;
pub mod export;
pub mod list;
pub mod locate;
pub mod reset;
pub mod show;
pub mod tabs;
