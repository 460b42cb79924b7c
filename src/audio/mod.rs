pub mod routing;

pub use routing::{supported_mode, AudioCapabilities, AudioMode, AudioRouting};
