//! Stocktake
//!
//! A Unix-style toolkit for managing stock inventory as plain text files
//! under git version control, with a hierarchical category explorer.

pub mod cli;
pub mod core;
pub mod entities;
