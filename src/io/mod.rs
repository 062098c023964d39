pub mod config_io;
pub mod events_io;
pub mod snapshot_io;
pub mod state;
pub mod workspace;
