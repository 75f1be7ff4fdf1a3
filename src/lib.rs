//! ctapgen turns a pipeline description (basic settings plus a linear list of
//! stepSets or a tree of pipe segments) into a CTAP script for MATLAB.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod dev_utils;
pub mod models;
pub mod state;
