//! Helpers for packing the Unity loader manifest, stylesheets, scripts and runtime shim
//! into the HTML shell.

pub mod js_patch;
pub mod manifest;
pub mod scripts;
pub mod shim;
pub mod site;
pub mod styles;
pub mod tags;
