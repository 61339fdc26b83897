// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Quirk rule table.
//!
//! A rule attaches an action to a point in a method's replay function, either
//! before ([`Phase::Pre`]) or after ([`Phase::Post`]) the real call. Rules are
//! keyed on the `(interface, method)` pair, or on the method's return type for
//! cross-cutting behaviour.
//!
//! Lookup order is fixed and is what the emitted program's behaviour depends
//! on:
//!
//! 1. method-keyed `Pre` rules
//! 2. return-type-keyed `Pre` rules
//! 3. method-keyed `Post` rules
//! 4. return-type-keyed `Post` rules
//!
//! Within each group rules keep their registration order. Both kinds of key
//! apply together; a return-type rule never shadows a method rule.

/// Where an action is emitted relative to the real call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before the call statement.
    Pre,
    /// After the call statement.
    Post,
}

/// Match on an interface or method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    /// Any name.
    Any,
    /// Exactly this name.
    Exact(String),
}

impl NamePattern {
    /// True when `name` satisfies the pattern.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == name,
        }
    }
}

impl From<&str> for NamePattern {
    fn from(name: &str) -> Self {
        if name == "*" {
            Self::Any
        } else {
            Self::Exact(name.to_owned())
        }
    }
}

/// What a rule is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKey {
    /// A method of an interface.
    Method {
        /// Interface name pattern.
        interface: NamePattern,
        /// Method name pattern.
        method: NamePattern,
    },
    /// Every method returning the named type.
    ReturnType(String),
}

/// One entry of a [`RuleTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuirkRule<A> {
    /// Attachment point.
    pub key: RuleKey,
    /// Emission phase.
    pub phase: Phase,
    /// Action to emit.
    pub action: A,
}

impl<A> QuirkRule<A> {
    fn applies_to(&self, interface: &str, method: &str, ret: Option<&str>) -> bool {
        match &self.key {
            RuleKey::Method {
                interface: i,
                method: m,
            } => i.matches(interface) && m.matches(method),
            RuleKey::ReturnType(name) => ret == Some(name.as_str()),
        }
    }

    fn is_method_keyed(&self) -> bool {
        matches!(self.key, RuleKey::Method { .. })
    }
}

/// Actions applicable to one method, split by phase and already ordered.
#[derive(Debug)]
pub struct Applicable<'a, A> {
    /// Actions to emit before the call.
    pub pre: Vec<&'a A>,
    /// Actions to emit after the call.
    pub post: Vec<&'a A>,
}

impl<A> Applicable<'_, A> {
    /// True when no rule applies.
    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }
}

/// Read-only collection of quirk rules, built once before traversal.
#[derive(Debug, Clone)]
pub struct RuleTable<A> {
    rules: Vec<QuirkRule<A>>,
}

impl<A> Default for RuleTable<A> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<A> RuleTable<A> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule.
    pub fn push(&mut self, rule: QuirkRule<A>) {
        self.rules.push(rule);
    }

    /// Register a rule emitted before the call to `interface::method`.
    pub fn before(
        mut self,
        interface: impl Into<NamePattern>,
        method: impl Into<NamePattern>,
        action: A,
    ) -> Self {
        self.push(QuirkRule {
            key: RuleKey::Method {
                interface: interface.into(),
                method: method.into(),
            },
            phase: Phase::Pre,
            action,
        });
        self
    }

    /// Register a rule emitted after the call to `interface::method`.
    pub fn after(
        mut self,
        interface: impl Into<NamePattern>,
        method: impl Into<NamePattern>,
        action: A,
    ) -> Self {
        self.push(QuirkRule {
            key: RuleKey::Method {
                interface: interface.into(),
                method: method.into(),
            },
            phase: Phase::Post,
            action,
        });
        self
    }

    /// Register a rule emitted before every call returning `type_name`.
    pub fn before_returning(mut self, type_name: impl Into<String>, action: A) -> Self {
        self.push(QuirkRule {
            key: RuleKey::ReturnType(type_name.into()),
            phase: Phase::Pre,
            action,
        });
        self
    }

    /// Register a rule emitted after every call returning `type_name`.
    pub fn after_returning(mut self, type_name: impl Into<String>, action: A) -> Self {
        self.push(QuirkRule {
            key: RuleKey::ReturnType(type_name.into()),
            phase: Phase::Post,
            action,
        });
        self
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &QuirkRule<A>> {
        self.rules.iter()
    }

    /// Rules applying to `interface::method` (returning `ret`), in emission order.
    pub fn lookup(&self, interface: &str, method: &str, ret: Option<&str>) -> Vec<&QuirkRule<A>> {
        let mut found = Vec::new();
        for phase in [Phase::Pre, Phase::Post] {
            for method_keyed in [true, false] {
                found.extend(self.iter().filter(|r| {
                    r.phase == phase
                        && r.is_method_keyed() == method_keyed
                        && r.applies_to(interface, method, ret)
                }));
            }
        }
        found
    }

    /// Same as [`lookup`](Self::lookup), split into the two phases.
    pub fn applicable(&self, interface: &str, method: &str, ret: Option<&str>) -> Applicable<'_, A> {
        let mut pre = Vec::new();
        let mut post = Vec::new();
        for rule in self.lookup(interface, method, ret) {
            match rule.phase {
                Phase::Pre => pre.push(&rule.action),
                Phase::Post => post.push(&rule.action),
            }
        }
        Applicable { pre, post }
    }
}
