//! CLI command implementations.

pub(crate) mod archive;
mod run;
pub(crate) mod search;

pub(crate) use run::RunArgs;
