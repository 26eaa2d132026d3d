pub mod audio;
pub mod capture;
pub mod config;
pub mod server;
pub mod state;
pub mod store;

pub use state::{RecordingState, ShutdownFlag};
