// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! retrace-spec: declarative descriptions of graphics APIs.
//!
//! An [`Api`] is an ordered list of COM-style [`Interface`]s, each an ordered
//! list of [`Method`]s. The generators only read these descriptors; nothing in
//! this crate knows how a call is replayed.
//!
//! Descriptors are loaded from JSON (`retrace-spec/v1`). The Direct3D 9 subset
//! the retracer ships with is embedded and available through [`d3d9`].

mod error;
mod loader;
mod model;

pub use error::SpecError;
pub use loader::{d3d9, load_path, load_str, SPEC_VERSION};
pub use model::{Api, Direction, Interface, Method, Param, Type, TypeKind};
