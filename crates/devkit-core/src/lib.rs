pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fs;
pub mod io;
pub mod lint;
pub mod manager;
pub mod paths;
pub mod process;
pub mod runtime;
pub mod script;

pub use dispatcher::{ActionRequest, ActionResult, Dispatcher};
pub use error::{DevkitError, Result};
