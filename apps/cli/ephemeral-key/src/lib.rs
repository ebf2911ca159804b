// Library exports for testing
// The binary (main.rs) imports these as well

pub mod commands;
pub mod console;
pub mod error;
pub mod logger;

#[cfg(test)]
mod tests;
