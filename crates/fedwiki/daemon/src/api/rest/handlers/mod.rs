//! API request handlers

mod actions;
mod pages;
mod remote;
mod submit;
mod system;

pub use actions::*;
pub use pages::*;
pub use remote::*;
pub use submit::*;
pub use system::*;
