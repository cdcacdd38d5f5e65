//! Rule Domain
//!
//! This crate implements the declarative fee-rule engine: typed condition
//! trees, fee-event definitions, rule compilation, and the immutable
//! priority-ordered snapshot the engine evaluates against.
//!
//! # Architecture
//!
//! Rules are owned by an external rule repository and arrive as JSON
//! documents. At load time each rule is compiled into a typed
//! [`CompiledRule`] (malformed rules are skipped, never fatal); the surviving
//! rules form a [`RuleSnapshot`] that is swapped atomically behind the
//! [`RuleEngine`]. In-flight evaluations keep the snapshot they started
//! with, so a reload never exposes a half-updated rule set.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_rules::{RuleEngine, defaults};
//!
//! let engine = RuleEngine::new();
//! engine.load(defaults::default_rules()).await;
//!
//! let snapshot = engine.snapshot().await;
//! let events = snapshot.evaluate(&facts)?;
//! for event in events {
//!     println!("matched rule {:?}", event.params.rule_name);
//! }
//! ```

pub mod admin;
pub mod condition;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod event;
pub mod ports;
pub mod rule;

pub use admin::RuleAdminService;
pub use condition::{Condition, ConditionNode, FactRoot, FactViews, Operator};
pub use engine::{LoadReport, MatchedEvent, RuleEngine, RuleSnapshot, RulesInfo};
pub use error::RuleError;
pub use event::{AmountCondition, FeeEventSpec, FeeFormula, FeeParams};
pub use ports::{NewRule, RuleRepositoryPort, RuleUpdate};
pub use rule::{CompiledRule, RuleDefinition, RuleScope};
