//! HTTP middleware module.
//!
//! Currently this is CORS configuration, driven by `CORS_ALLOWED_ORIGIN`.

pub mod cors;

pub use cors::{
    cors_layer_from_env, create_cors_layer, create_permissive_cors_layer, parse_allowed_origins,
};
