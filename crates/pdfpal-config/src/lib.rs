//! Settings for the PDF Pal client.
//!
//! One explicit settings struct loaded from a TOML file, owned by a
//! process-wide store that notifies subscribers on change — no ambient
//! global state.

pub mod loader;
pub mod schema;
pub mod store;

pub use loader::{default_config_path, load_default, load_from_path, save_to_path};
pub use schema::{Avatar, BackendConfig, DisplayConfig, Settings};
pub use store::SettingsStore;
