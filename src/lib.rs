#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod assets;
pub mod builder;
pub mod bundle;
pub mod config;
pub mod logging;
pub mod models;
pub mod project;

pub use builder::{PackOutput, UnityPacker};
pub use config::ProjectConfig;
pub use models::{AssetRecord, EmbeddedAssets, Manifest, PackReport, PackWarning};
pub use project::PackLayout;
