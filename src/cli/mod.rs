pub mod info;
pub mod insights;
pub mod runtime;
pub mod serve;
pub mod track;

pub use info::cmd_info;
pub use insights::{cmd_insights, InsightsArgs};
pub use runtime::{init_logging, load_config, load_local_env_overrides, LoadedConfig};
pub use serve::{cmd_serve, ServeArgs};
pub use track::{cmd_track, TrackArgs};
