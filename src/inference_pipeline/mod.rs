pub mod core;
pub mod label;
pub mod main;
pub mod preprocess;
pub mod render;
pub mod run_effect;

#[cfg(test)]
mod tests;
