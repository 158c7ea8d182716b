pub mod dispatch;
pub mod ge;
pub mod philips;
pub mod prostatex;
pub mod siemens;
pub mod tags;

pub use dispatch::{compute_b_value, select_vendor};
pub use tags::*;
