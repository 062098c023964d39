pub mod board;
pub mod config;
pub mod event;
pub mod link;
pub mod note;
pub mod viewport;

pub use board::*;
pub use config::*;
pub use event::*;
pub use link::*;
pub use note::*;
pub use viewport::*;
