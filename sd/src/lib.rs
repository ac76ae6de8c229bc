//! StyleDB - named prompt styles
//!
//! A style maps a name to a positive prompt fragment, a negative prompt
//! fragment and a free-text description. Styles are read from two CSV files,
//! a base set and a user-editable set, and merged into one in-memory mapping
//! where the user file wins on name collisions.
//!
//! # File format
//!
//! ```text
//! name,prompt,negative_prompt,long_description
//! watercolor,"{prompt}, painted in watercolor",photo,Soft washes of colour
//! ```
//!
//! Files written before `prompt` existed used `name,text`; those still load,
//! with `text` read as the prompt.
//!
//! # Example
//!
//! ```ignore
//! use styledb::StyleDatabase;
//!
//! let db = StyleDatabase::new("styles.csv", "user_styles.csv")?;
//! let prompt = db.apply_styles_to_prompt("a cat", &["watercolor"]);
//! assert_eq!(prompt, "a cat, painted in watercolor");
//! ```

pub mod cli;
pub mod config;
mod database;
mod error;
pub mod format;
mod merge;
mod style;

pub use database::StyleDatabase;
pub use error::{Result, StyleError};
pub use merge::{PLACEHOLDER, apply_styles_to_prompt, merge_prompts};
pub use style::PromptStyle;

/// Suffix appended to a save target when backing up its previous content
pub const BACKUP_SUFFIX: &str = ".bak";
