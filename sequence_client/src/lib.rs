mod bot;
mod client;
pub use bot::*;
pub use client::*;
