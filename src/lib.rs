//! emotecss - Library for extracting emote catalogs from forum skin stylesheets
//!
//! This library provides functionality to:
//! - Read stylesheet rules, including ignore-region marker rules
//! - Recognise emote selectors (`a[href|="/name"]`) and their :hover/:active variants
//! - Merge repeated definitions and sort emotes into spritesheets or custom CSS
//! - Report problems as collected diagnostics instead of failing
//! - Export the resulting catalog as JSON

pub mod cli;
pub mod config;
pub mod css_value;
pub mod diagnostics;
pub mod emote;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod selector;
pub mod spritesheet;
pub mod stylesheet;
