//! TexFlow compile server
//!
//! Accepts LaTeX source (plus optional embedded images) over JSON and
//! returns a compiled PDF. The core is the compilation pipeline in
//! [`compile`]: per-request workspace isolation, input materialization,
//! conditional multi-pass toolchain scheduling under time budgets, and
//! unconditional cleanup.

pub mod api;
pub mod compile;
pub mod config;
pub mod state;
