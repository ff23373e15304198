//! Tint CLI - command implementations
//!
//! `main.rs` only parses arguments and installs logging; everything a
//! subcommand does lives here so it can be driven from tests.

#![allow(missing_docs)]

pub mod commands;
pub mod headless;

pub use commands::{
    add_alias, apply_once, list_aliases, remove_alias, resolve_cookies, suggest_alias,
    ApplyReport, ResolveReport,
};
pub use headless::{HeadlessNav, HeadlessPage};
