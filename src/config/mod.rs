//! Configuration: the z.toml file format and the layered settings built from it

pub mod settings;
pub mod z_toml;

pub use settings::Settings;
pub use z_toml::ZToml;
