//! Per-provider capsules: how each source is shown, edited and probed.

pub mod b3;
pub mod brapi;
pub mod cvm;
pub mod fintz;
pub mod hgbrasil;
