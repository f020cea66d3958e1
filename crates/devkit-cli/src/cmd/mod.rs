pub mod config;
pub mod detect;
pub mod lint;
pub mod mcp;
pub mod package;
pub mod script;
pub mod tools;
