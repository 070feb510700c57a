//! The analysis modules that can be run from the command line.
//! See their module descriptions for detailed information about each module.
//!
//! Each module reads its configuration from the entry of the configuration file
//! named after the module and reports its results as [`Finding`](crate::utils::log::Finding)s.

pub mod cha;
pub mod constprop;
pub mod deadcode;
pub mod inter_constprop;
pub mod livevar;

use crate::prelude::*;

/// Deserialize the configuration of a module.
/// A missing configuration (`null`) yields the default configuration.
pub fn parse_config<T>(params: &serde_json::Value) -> Result<T, Error>
where
    T: for<'de> Deserialize<'de> + Default,
{
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params.clone()).context("Invalid module configuration")
}
