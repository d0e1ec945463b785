//! HTTP API handlers for dawker-server

pub mod daws;
pub mod forum;
pub mod health;
pub mod notes;
pub mod presets;
pub mod ratings;
pub mod users;

pub use daws::daw_routes;
pub use forum::forum_routes;
pub use health::health_routes;
pub use notes::note_routes;
pub use presets::preset_routes;
pub use ratings::rating_routes;
pub use users::user_routes;
