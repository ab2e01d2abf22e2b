//! CLI argument parsing and command handling.

mod args;
pub mod validators;

pub use args::{
    CheckUploadArgs, Cli, Command, CompileArgs, ConfigAction, ReplayArgs, ReportArgs, ServerArgs,
    SetupArgs,
};
