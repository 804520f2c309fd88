//! CLI command implementations.

pub(crate) mod list;
pub(crate) mod show;
pub(crate) mod tags;

pub(crate) use list::ListArgs;
pub(crate) use show::ShowArgs;
