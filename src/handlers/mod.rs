//! HTTP handlers

pub mod health;
pub mod location;
pub mod panic;
#[cfg(test)]
mod tests;
