// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON loading and validation of API descriptions.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::error::SpecError;
use crate::model::Api;

/// Description format version this loader accepts.
pub const SPEC_VERSION: &str = "retrace-spec/v1";

const D3D9_JSON: &str = include_str!("../apis/d3d9.json");

/// Parse and validate an API description from JSON text.
pub fn load_str(json: &str) -> Result<Api, SpecError> {
    let api: Api = serde_json::from_str(json)?;
    validate(&api)?;
    debug!(
        api = %api.name,
        interfaces = api.interfaces.len(),
        "loaded api description"
    );
    Ok(api)
}

/// Read, parse and validate an API description from a file.
pub fn load_path(path: &Path) -> Result<Api, SpecError> {
    let json = std::fs::read_to_string(path)?;
    load_str(&json)
}

/// The embedded Direct3D 9 description.
pub fn d3d9() -> Result<Api, SpecError> {
    load_str(D3D9_JSON)
}

fn validate(api: &Api) -> Result<(), SpecError> {
    if api.spec_version.as_deref() != Some(SPEC_VERSION) {
        return Err(SpecError::UnsupportedVersion {
            found: api.spec_version.clone(),
            expected: SPEC_VERSION,
        });
    }
    if api.name.is_empty() {
        return Err(empty("api", "<root>"));
    }

    let mut seen = BTreeSet::new();
    for iface in &api.interfaces {
        if iface.name.is_empty() {
            return Err(empty("interface", &api.name));
        }
        if let Some(base) = &iface.base {
            // Bases must be declared first so emitted code resolves in order.
            if !seen.contains(base.as_str()) {
                return Err(SpecError::UnknownBase {
                    interface: iface.name.clone(),
                    base: base.clone(),
                });
            }
        }
        if !seen.insert(iface.name.as_str()) {
            return Err(SpecError::DuplicateInterface(iface.name.clone()));
        }

        let mut methods = BTreeSet::new();
        for method in &iface.methods {
            if method.name.is_empty() {
                return Err(empty("method", &iface.name));
            }
            if !methods.insert(method.name.as_str()) {
                return Err(SpecError::DuplicateMethod {
                    interface: iface.name.clone(),
                    method: method.name.clone(),
                });
            }
            let context = format!("{}::{}", iface.name, method.name);
            if method.ret.as_ref().is_some_and(|t| t.name.is_empty()) {
                return Err(empty("return type", &context));
            }
            for param in &method.params {
                if param.name.is_empty() {
                    return Err(empty("parameter", &context));
                }
                if param.ty.name.is_empty() {
                    return Err(empty("type", &format!("{context}({})", param.name)));
                }
            }
        }
    }
    Ok(())
}

fn empty(what: &'static str, context: &str) -> SpecError {
    SpecError::EmptyName {
        what,
        context: context.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeKind;

    #[test]
    fn embedded_d3d9_loads() {
        let api = d3d9().unwrap();
        assert_eq!(api.name, "d3d9");
        let d3d = api.interface("IDirect3D9").unwrap();
        let create = d3d.method("CreateDevice").unwrap();
        assert!(create.returns("HRESULT"));
        assert!(create.param("pPresentationParameters").is_some());
        let lock = api
            .interface("IDirect3DVertexBuffer9")
            .and_then(|i| i.method("Lock"))
            .unwrap();
        assert_eq!(lock.param("SizeToLock").unwrap().ty.kind, TypeKind::UInt);
    }

    #[test]
    fn rejects_unknown_version() {
        let err = load_str(r#"{ "spec_version": "retrace-spec/v2", "name": "x" }"#).unwrap_err();
        assert!(err.to_string().contains("Unsupported spec_version"));
    }

    #[test]
    fn rejects_missing_version() {
        let err = load_str(r#"{ "name": "x" }"#).unwrap_err();
        assert!(matches!(err, SpecError::UnsupportedVersion { found: None, .. }));
    }

    #[test]
    fn rejects_duplicate_interface() {
        let json = r#"{
            "spec_version": "retrace-spec/v1",
            "name": "x",
            "interfaces": [ { "name": "IA" }, { "name": "IA" } ]
        }"#;
        assert!(matches!(
            load_str(json),
            Err(SpecError::DuplicateInterface(name)) if name == "IA"
        ));
    }

    #[test]
    fn rejects_duplicate_method() {
        let json = r#"{
            "spec_version": "retrace-spec/v1",
            "name": "x",
            "interfaces": [ { "name": "IA", "methods": [ { "name": "F" }, { "name": "F" } ] } ]
        }"#;
        assert!(matches!(load_str(json), Err(SpecError::DuplicateMethod { .. })));
    }

    #[test]
    fn rejects_forward_base() {
        let json = r#"{
            "spec_version": "retrace-spec/v1",
            "name": "x",
            "interfaces": [ { "name": "IB", "base": "IA" }, { "name": "IA" } ]
        }"#;
        assert!(matches!(load_str(json), Err(SpecError::UnknownBase { .. })));
    }

    #[test]
    fn rejects_unnamed_parameter() {
        let json = r#"{
            "spec_version": "retrace-spec/v1",
            "name": "x",
            "interfaces": [ { "name": "IA", "methods": [
                { "name": "F", "params": [ { "name": "", "type": { "name": "UINT" } } ] }
            ] } ]
        }"#;
        assert!(matches!(
            load_str(json),
            Err(SpecError::EmptyName { what: "parameter", .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(load_str("{ not json"), Err(SpecError::Json(_))));
    }
}
