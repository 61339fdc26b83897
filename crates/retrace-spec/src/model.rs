// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Descriptor types for an API description.

use serde::{Deserialize, Serialize};

/// A complete API description: the unit a retracer is generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Api {
    /// Version tag of the description format (e.g. `"retrace-spec/v1"`).
    #[serde(default)]
    pub spec_version: Option<String>,
    /// API name (e.g. `"d3d9"`).
    pub name: String,
    /// Headers the generated translation unit must include, in order.
    #[serde(default)]
    pub headers: Vec<String>,
    /// Interfaces in declaration order.
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

impl Api {
    /// Look up an interface by name.
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Methods callable on `iface`, inherited ones first, in declaration order.
    ///
    /// Bases are resolved by name within this API; a base that cannot be
    /// found contributes nothing (the loader rejects such specs up front).
    pub fn methods_of<'a>(&'a self, iface: &'a Interface) -> Vec<&'a Method> {
        let mut chain = vec![iface];
        let mut cursor = iface;
        while let Some(base) = cursor.base.as_deref().and_then(|b| self.interface(b)) {
            // Guard against cyclic bases in hand-built descriptors.
            if chain.iter().any(|seen| seen.name == base.name) {
                break;
            }
            chain.push(base);
            cursor = base;
        }
        chain
            .into_iter()
            .rev()
            .flat_map(|i| i.methods.iter())
            .collect()
    }
}

/// A COM-style interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Interface name, unique within an [`Api`].
    pub name: String,
    /// Interface this one derives from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Interface {
    /// Create an interface with no base.
    pub fn new(name: impl Into<String>, methods: Vec<Method>) -> Self {
        Self {
            name: name.into(),
            base: None,
            methods,
        }
    }

    /// Set the base interface.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Look up a method declared directly on this interface.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A method of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Return type; `None` for `void`.
    #[serde(default, rename = "return", skip_serializing_if = "Option::is_none")]
    pub ret: Option<Type>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub params: Vec<Param>,
}

impl Method {
    /// Create a method.
    pub fn new(name: impl Into<String>, ret: Option<Type>, params: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            ret,
            params,
        }
    }

    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Name of the return type, if the method returns a value.
    pub fn ret_name(&self) -> Option<&str> {
        self.ret.as_ref().filter(|t| !t.is_void()).map(|t| t.name.as_str())
    }

    /// True when the method returns a value of the named type.
    pub fn returns(&self, type_name: &str) -> bool {
        self.ret_name() == Some(type_name)
    }
}

/// Direction of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Read by the callee.
    #[default]
    In,
    /// Written by the callee.
    Out,
    /// Read and written by the callee.
    InOut,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name; the generated replay code uses it as the local name.
    pub name: String,
    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Direction, `in` when omitted.
    #[serde(default)]
    pub direction: Direction,
}

impl Param {
    /// Create an input parameter.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            direction: Direction::In,
        }
    }

    /// Create an output parameter.
    pub fn out(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            direction: Direction::Out,
        }
    }
}

/// Broad category of a type, used only to pick an argument extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Anything the generator should not look inside.
    #[default]
    Opaque,
    /// `void`.
    Void,
    /// Signed integer.
    SInt,
    /// Unsigned integer.
    UInt,
    /// Floating point.
    Float,
    /// Enumeration.
    Enum,
    /// Bit flags.
    Flags,
    /// Native handle (`HWND`, `HANDLE`).
    Handle,
    /// Pointer to an interface object.
    Interface,
    /// Any other pointer; see [`Type::pointee`].
    Pointer,
}

/// A type tag. Compared by `name`; `kind` and `pointee` only steer extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    /// Spelling of the type in C++ (e.g. `"HRESULT"`, `"D3DPRESENT_PARAMETERS *"`).
    pub name: String,
    /// Category of the type.
    #[serde(default)]
    pub kind: TypeKind,
    /// Pointed-to type, for `Pointer` and `Interface` kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointee: Option<Box<Type>>,
}

impl Type {
    /// Create a type tag of the given kind.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            pointee: None,
        }
    }

    /// Create a pointer to `pointee`, spelled `"<pointee> *"`.
    pub fn pointer(pointee: Self) -> Self {
        Self {
            name: format!("{} *", pointee.name),
            kind: TypeKind::Pointer,
            pointee: Some(Box::new(pointee)),
        }
    }

    /// Create an interface pointer, spelled `"<iface> *"`.
    pub fn object(iface: &str) -> Self {
        Self {
            name: format!("{iface} *"),
            kind: TypeKind::Interface,
            pointee: Some(Box::new(Self::new(iface, TypeKind::Opaque))),
        }
    }

    /// True for `void`.
    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Void || self.name == "void"
    }
}
