//! # Schema Declarations
//!
//! What a route declares: constraint schemas for some subset of the three
//! request data sources, or one combined schema for all of them merged.
//! The mode is decided exactly once, at registration time, and represented
//! as a tagged variant — never re-inferred per request.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::config::ConfigOverride;
use crate::error::RegisterError;

/// One of the three request data locations, in checking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Route parameters.
    Params,
    /// Query string pairs.
    Query,
    /// Request body.
    Body,
}

impl Source {
    /// Wire name of the source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Params => "params",
            Source::Query => "query",
            Source::Body => "body",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-source schema declaration for one route.
///
/// Each present schema is validated independently against its source;
/// absent sources are skipped entirely — not validated, not required.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Constraint schema for route parameters.
    pub params: Option<Value>,
    /// Constraint schema for the query string.
    pub query: Option<Value>,
    /// Constraint schema for the request body.
    pub body: Option<Value>,
    /// Per-registration configuration override.
    pub options: Option<ConfigOverride>,
}

impl RuleSet {
    /// A declaration with no schemas. Registering it as-is is a setup
    /// error; add at least one source first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a schema for route parameters.
    pub fn params(mut self, schema: Value) -> Self {
        self.params = Some(schema);
        self
    }

    /// Declare a schema for the query string.
    pub fn query(mut self, schema: Value) -> Self {
        self.query = Some(schema);
        self
    }

    /// Declare a schema for the request body.
    pub fn body(mut self, schema: Value) -> Self {
        self.body = Some(schema);
        self
    }

    /// Attach a configuration override for this registration.
    pub fn options(mut self, options: ConfigOverride) -> Self {
        self.options = Some(options);
        self
    }

    /// True when no per-source schema is declared.
    pub fn is_empty(&self) -> bool {
        self.params.is_none() && self.query.is_none() && self.body.is_none()
    }
}

/// A classified schema declaration.
#[derive(Clone, Debug)]
pub enum Declaration {
    /// Independent per-source schemas, checked in params → query → body
    /// order.
    PerSource(RuleSet),
    /// One combined schema applied to the merged request data.
    Combined {
        /// The combined constraint schema.
        schema: Value,
        /// Per-registration configuration override.
        options: Option<ConfigOverride>,
    },
}

impl Declaration {
    /// Classify a raw JSON declaration.
    ///
    /// If any of the `params` / `query` / `body` keys is present, the value
    /// is a per-source declaration. Otherwise the whole value is a combined
    /// schema applied to the merge of all three sources. In both modes an
    /// `options` key is lifted into the configuration override — a combined
    /// schema never validates its own options as request data.
    pub fn from_value(decl: Value) -> Result<Self, RegisterError> {
        let Value::Object(mut fields) = decl else {
            return Err(RegisterError::EmptyDeclaration);
        };

        let named_mode = ["params", "query", "body"]
            .iter()
            .any(|key| fields.contains_key(*key));

        let options = match fields.remove("options") {
            Some(raw) => Some(
                serde_json::from_value::<ConfigOverride>(raw)
                    .map_err(|e| RegisterError::InvalidOptions(e.to_string()))?,
            ),
            None => None,
        };

        if named_mode {
            Ok(Self::PerSource(RuleSet {
                params: fields.remove("params"),
                query: fields.remove("query"),
                body: fields.remove("body"),
                options,
            }))
        } else if fields.is_empty() {
            Err(RegisterError::EmptyDeclaration)
        } else {
            Ok(Self::Combined {
                schema: Value::Object(fields),
                options,
            })
        }
    }

    /// The declaration's configuration override, if any.
    pub fn options(&self) -> Option<&ConfigOverride> {
        match self {
            Declaration::PerSource(rules) => rules.options.as_ref(),
            Declaration::Combined { options, .. } => options.as_ref(),
        }
    }
}
