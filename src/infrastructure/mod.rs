//! Infrastructure layer for filesystem and environment interactions.
//!
//! Zellij mounts the host filesystem under `/host` inside the plugin sandbox.
//! Everything that turns a user-supplied path into a readable one, or back into
//! something worth showing in the header, lives here.

pub mod paths;

pub use paths::{
    display_path, expand_tilde, get_data_dir, is_same_file, sandbox_path, strip_host_prefix,
};
