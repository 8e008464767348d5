pub mod completion;
pub mod config;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod server;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;
