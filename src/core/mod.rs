// src/core/mod.rs

pub mod branch_template;
pub mod catalog;
pub mod config_loader;
pub mod hierarchy;
pub mod linear_template;
pub mod paths;
pub mod renderer;
pub mod sanitizer;
pub mod script_writer;
pub mod settings_store;
pub mod tree_editor;
pub mod validator;
