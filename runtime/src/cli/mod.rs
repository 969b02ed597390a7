//! CLI subcommand implementations for the sitetext binary.

pub mod extract_cmd;
pub mod output;
