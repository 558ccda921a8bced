//! # Gate & Checker
//!
//! Registration and per-request orchestration.
//!
//! A [`Gate`] is built once at application startup from the checking engine
//! and the base configuration — an explicit value, immutable after
//! construction, so the configuration is finalized before the server
//! accepts traffic. Registering a declaration classifies it, resolves the
//! effective configuration, compiles every schema through the engine, and
//! returns a reusable [`Checker`] bound to the route.
//!
//! Per invocation, the checker reads the three request data views, checks
//! registered sources in the fixed params → query → body order with
//! abort-early gating, and aggregates error items across sources. Checking
//! is sequential: each source's result is resolved before the next source
//! is read, which is what makes the ordering and the gating observable.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::{ConfigOverride, ValidationConfig};
use crate::engine::ConstraintChecker;
use crate::error::{RegisterError, Rejection};
use crate::rules::{Declaration, RuleSet, Source};

/// The three request data views read by a checker.
///
/// `params` and `query` are always objects (possibly empty). `body` is
/// `None` until a body-reading collaborator initializes it; checkers with
/// a registered body schema treat that absence as an integration fault.
#[derive(Clone, Debug)]
pub struct RequestData {
    /// Route parameters, as an object of string values.
    pub params: Value,
    /// Query string pairs, as an object of string values.
    pub query: Value,
    /// The body view, when a body reader ran.
    pub body: Option<Value>,
}

impl RequestData {
    /// Empty request data: no parameters, no query pairs, no body view.
    pub fn new() -> Self {
        Self {
            params: Value::Object(Map::new()),
            query: Value::Object(Map::new()),
            body: None,
        }
    }
}

impl Default for RequestData {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration root: the checking engine plus the base configuration.
pub struct Gate {
    engine: Arc<dyn ConstraintChecker>,
    defaults: ValidationConfig,
}

impl Gate {
    /// A gate with the built-in default configuration.
    pub fn new(engine: Arc<dyn ConstraintChecker>) -> Self {
        Self {
            engine,
            defaults: ValidationConfig::default(),
        }
    }

    /// A gate with a setup-time override layered over the built-in
    /// defaults.
    ///
    /// This is the one-time global configuration step. The gate is
    /// immutable afterwards; construct it (and register every route)
    /// before the server starts accepting traffic.
    pub fn with_overrides(engine: Arc<dyn ConstraintChecker>, overrides: &ConfigOverride) -> Self {
        let defaults = ValidationConfig::default().merged(overrides);
        Self { engine, defaults }
    }

    /// The gate's base configuration.
    pub fn defaults(&self) -> &ValidationConfig {
        &self.defaults
    }

    /// Register a per-source declaration.
    pub fn register(&self, rules: RuleSet) -> Result<Checker, RegisterError> {
        self.register_declaration(Declaration::PerSource(rules))
    }

    /// Register one combined schema applied to the merged request data.
    pub fn register_combined(&self, schema: Value) -> Result<Checker, RegisterError> {
        self.register_declaration(Declaration::Combined {
            schema,
            options: None,
        })
    }

    /// Classify a raw JSON declaration and register it.
    ///
    /// See [`Declaration::from_value`] for the classification rule.
    pub fn register_value(&self, decl: Value) -> Result<Checker, RegisterError> {
        self.register_declaration(Declaration::from_value(decl)?)
    }

    /// Register a classified declaration.
    ///
    /// Resolves the effective configuration once (declaration options over
    /// the gate's base), fixes the source checking order, and compiles
    /// every schema so that unusable declarations fail here rather than on
    /// the route's first request.
    pub fn register_declaration(&self, decl: Declaration) -> Result<Checker, RegisterError> {
        let config = match decl.options() {
            Some(overrides) => self.defaults.merged(overrides),
            None => self.defaults.clone(),
        };

        let rules = match decl {
            Declaration::PerSource(rules) => {
                // Fixed checking order: params, query, body.
                let mut sources = Vec::new();
                if let Some(schema) = rules.params {
                    sources.push((Source::Params, schema));
                }
                if let Some(schema) = rules.query {
                    sources.push((Source::Query, schema));
                }
                if let Some(schema) = rules.body {
                    sources.push((Source::Body, schema));
                }
                if sources.is_empty() {
                    return Err(RegisterError::EmptyDeclaration);
                }
                Rules::PerSource(sources)
            }
            Declaration::Combined { schema, .. } => {
                if !schema.as_object().is_some_and(|o| !o.is_empty()) {
                    return Err(RegisterError::EmptyDeclaration);
                }
                Rules::Combined(schema)
            }
        };

        match &rules {
            Rules::PerSource(sources) => {
                for (source, schema) in sources {
                    self.engine.compile(schema, &config).map_err(|e| {
                        RegisterError::InvalidSchema {
                            schema: source.as_str().to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                }
            }
            Rules::Combined(schema) => {
                self.engine
                    .compile(schema, &config)
                    .map_err(|e| RegisterError::InvalidSchema {
                        schema: "combined".to_string(),
                        reason: e.to_string(),
                    })?;
            }
        }

        Ok(Checker {
            inner: Arc::new(CheckerInner {
                rules,
                config,
                engine: Arc::clone(&self.engine),
            }),
        })
    }
}

/// Classification fixed at registration time.
enum Rules {
    /// Ordered (source, schema) pairs.
    PerSource(Vec<(Source, Value)>),
    /// One schema for the merged request data.
    Combined(Value),
}

/// A registered, reusable route checker.
///
/// Cloning is cheap; clones share the classification, the effective
/// configuration, and the engine. A checker holds no per-request state, so
/// concurrent invocations are independent.
#[derive(Clone)]
pub struct Checker {
    inner: Arc<CheckerInner>,
}

impl std::fmt::Debug for Checker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checker")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

struct CheckerInner {
    rules: Rules,
    config: ValidationConfig,
    engine: Arc<dyn ConstraintChecker>,
}

impl Checker {
    /// The effective configuration captured at registration.
    pub fn config(&self) -> &ValidationConfig {
        &self.inner.config
    }

    /// Check one request's data.
    ///
    /// Returns `Ok(())` when every registered schema accepts its data; the
    /// caller then passes control downstream. On validation failure,
    /// returns [`Rejection::Invalid`] carrying the formatted payload.
    /// [`Rejection::MissingBody`] and [`Rejection::Engine`] are integration
    /// faults, not validation results.
    pub fn check(&self, data: &RequestData) -> Result<(), Rejection> {
        let inner = &*self.inner;
        let mut aggregate = Vec::new();

        match &inner.rules {
            Rules::Combined(schema) => {
                let merged = merge_sources(data);
                aggregate.extend(inner.engine.check(&merged, schema, &inner.config)?);
            }
            Rules::PerSource(sources) => {
                for (source, schema) in sources {
                    if inner.config.abort_early && !aggregate.is_empty() {
                        tracing::debug!(source = %source, "aborting early, source not checked");
                        break;
                    }
                    let value = match source {
                        Source::Params => &data.params,
                        Source::Query => &data.query,
                        Source::Body => data.body.as_ref().ok_or(Rejection::MissingBody)?,
                    };
                    let errors = inner.engine.check(value, schema, &inner.config)?;
                    if !errors.is_empty() {
                        tracing::debug!(source = %source, count = errors.len(), "source rejected");
                        aggregate.extend(errors);
                    }
                }
            }
        }

        if aggregate.is_empty() {
            Ok(())
        } else {
            Err(Rejection::Invalid(inner.config.formatter.format(&aggregate)))
        }
    }
}

/// Merge the three views into one object, left to right: params, then
/// query, then the body when present. Later sources override earlier ones
/// on key collision; non-object views contribute nothing.
fn merge_sources(data: &RequestData) -> Value {
    let mut merged = Map::new();
    let views = [Some(&data.params), Some(&data.query), data.body.as_ref()];
    for view in views.into_iter().flatten() {
        if let Value::Object(fields) = view {
            for (key, value) in fields {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(merged)
}
