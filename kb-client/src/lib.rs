pub mod backend;
pub mod browse;
pub mod config;
pub mod drafts;
pub mod editor;
pub mod errors;
pub mod forms;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod testutil;
