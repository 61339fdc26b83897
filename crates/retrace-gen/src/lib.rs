// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! retrace-gen: generates C++ retracers from graphics API descriptions.
//!
//! A retracer replays a recorded call trace against a live driver. The generic
//! part ([`retracer`]) emits one replay function per interface method and a
//! dispatch table. API-specific fixes ("quirks") are attached through a
//! [`rules::RuleTable`] consulted by [`specializer::QuirkRetracer`], which
//! wraps each canonical call with the code the table assigns to it.

pub mod bootstrap;
pub mod config;
pub mod driver;
pub mod emit;
pub mod quirks;
pub mod retracer;
pub mod rules;
pub mod specializer;

pub use config::{ConfigError, GeneratorConfig};
pub use driver::{generate, generate_with, load_api};
pub use emit::CodeWriter;
pub use quirks::{d3d9_rules, Quirk};
pub use retracer::{CallContext, PlainRetracer, RetraceHook, Retracer};
pub use rules::{NamePattern, Phase, QuirkRule, RuleKey, RuleTable};
pub use specializer::QuirkRetracer;
