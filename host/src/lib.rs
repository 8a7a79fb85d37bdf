mod config;
mod dispatch;
mod display;
mod error;
mod game_host;
mod local;
mod server;
mod session;
mod turn_gate;
pub use config::*;
pub use dispatch::*;
pub use display::*;
pub use error::*;
pub use game_host::*;
pub use local::*;
pub use server::*;
pub use session::*;
pub use turn_gate::*;
