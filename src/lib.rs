pub mod cli;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod projection;
pub mod tui;
pub mod util;
