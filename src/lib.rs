//! Workspace root package.
//!
//! Holds no code of its own; it exists so `rusty-hook` installs the
//! pre-commit hooks declared in the root `Cargo.toml`. The recipe catalog
//! lives in the `crates/` members.
