//! The rule engine and its immutable snapshots
//!
//! The engine holds one [`RuleSnapshot`] behind a single swappable
//! reference. A reload compiles a whole new snapshot and swaps it in one
//! write; evaluations clone the `Arc` out and run against a consistent rule
//! set even while a reload is in flight.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::FactSet;

use crate::condition::FactViews;
use crate::defaults::default_rules;
use crate::error::RuleError;
use crate::event::FeeParams;
use crate::ports::RuleRepositoryPort;
use crate::rule::{CompiledRule, RuleDefinition};

/// One matched rule's fee instruction
#[derive(Debug, Clone)]
pub struct MatchedEvent {
    pub params: FeeParams,
}

/// Outcome of a snapshot load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Rules compiled into the snapshot
    pub loaded: usize,
    /// Rules dropped for structural problems
    pub skipped: usize,
    /// Whether the built-in defaults were used because the repository
    /// was unavailable
    pub used_defaults: bool,
}

/// Monitoring view of the current snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesInfo {
    pub count: usize,
    pub last_update: Option<DateTime<Utc>>,
}

/// An immutable, priority-ordered set of compiled rules
#[derive(Debug)]
pub struct RuleSnapshot {
    rules: Vec<CompiledRule>,
    loaded_at: Option<DateTime<Utc>>,
}

impl RuleSnapshot {
    fn empty() -> Self {
        Self {
            rules: Vec::new(),
            loaded_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Evaluates every in-scope rule against the facts, in priority order.
    ///
    /// Each rule whose condition tree matches contributes one
    /// [`MatchedEvent`]. Any failure here aborts the whole call; unlike
    /// load-time compilation there is no per-rule isolation. That coarser
    /// guarantee is preserved from the original system.
    pub fn evaluate(&self, facts: &FactSet) -> Result<Vec<MatchedEvent>, RuleError> {
        let views = FactViews::render(facts)
            .map_err(|e| RuleError::evaluation(format!("failed to render facts: {e}")))?;

        let mut events = Vec::new();
        for rule in &self.rules {
            if !rule.scope.matches(facts.transaction.transaction_type) {
                continue;
            }
            if rule.matches(&views) {
                tracing::debug!(rule = %rule.name, priority = rule.priority, "rule matched");
                events.push(MatchedEvent {
                    params: rule.params().clone(),
                });
            }
        }
        Ok(events)
    }
}

/// Holds the active rule snapshot and replaces it wholesale on reload
pub struct RuleEngine {
    snapshot: RwLock<Arc<RuleSnapshot>>,
}

impl RuleEngine {
    /// Creates an engine with an empty snapshot; call [`RuleEngine::load`]
    /// or [`RuleEngine::reload_from`] before evaluating.
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(RuleSnapshot::empty())),
        }
    }

    /// Compiles the definitions into a fresh snapshot and swaps it in.
    ///
    /// Inactive rules are ignored. A rule that fails to compile is skipped
    /// and logged; the rest of the load proceeds. Surviving rules are sorted
    /// by ascending priority, ties broken by id for a deterministic order.
    pub async fn load(&self, definitions: Vec<RuleDefinition>) -> LoadReport {
        let mut compiled = Vec::new();
        let mut skipped = 0usize;

        for definition in definitions.iter().filter(|d| d.is_active) {
            match CompiledRule::compile(definition) {
                Ok(rule) => compiled.push(rule),
                Err(error) => {
                    skipped += 1;
                    tracing::error!(rule = %definition.name, %error, "failed to compile rule, skipping");
                }
            }
        }

        compiled.sort_by_key(|rule| (rule.priority, rule.id));
        let loaded = compiled.len();

        let snapshot = Arc::new(RuleSnapshot {
            rules: compiled,
            loaded_at: Some(Utc::now()),
        });
        *self.snapshot.write().await = snapshot;

        tracing::info!(loaded, skipped, "loaded active rules into engine");
        LoadReport {
            loaded,
            skipped,
            used_defaults: false,
        }
    }

    /// Reloads the snapshot from the repository.
    ///
    /// If the repository is unavailable the built-in default rules are
    /// loaded instead, so the engine keeps serving in degraded mode.
    pub async fn reload_from(&self, repository: &dyn RuleRepositoryPort) -> LoadReport {
        match repository.list_active_by_priority().await {
            Ok(definitions) => self.load(definitions).await,
            Err(error) => {
                tracing::error!(%error, "failed to load rules from repository, using built-in defaults");
                let report = self.load(default_rules()).await;
                LoadReport {
                    used_defaults: true,
                    ..report
                }
            }
        }
    }

    /// Hands out the current snapshot.
    ///
    /// Callers keep evaluating against their `Arc` even if a reload swaps
    /// the engine's snapshot underneath them.
    pub async fn snapshot(&self) -> Arc<RuleSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Monitoring view: rule count and time of the last load.
    pub async fn rules_info(&self) -> RulesInfo {
        let snapshot = self.snapshot.read().await;
        RulesInfo {
            count: snapshot.len(),
            last_update: snapshot.loaded_at(),
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
