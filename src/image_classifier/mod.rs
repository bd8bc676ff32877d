pub mod impl_fake;
#[cfg(test)]
pub mod impl_scripted;
pub mod impl_tract_onnx;
pub mod interface;
pub mod models;
pub mod tract;
