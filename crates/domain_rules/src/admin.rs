//! Rule administration service
//!
//! Write operations against the rule repository, each followed by an engine
//! reload so the active snapshot reflects the committed change. Creates and
//! updates are validated by compiling the candidate rule before anything is
//! written; an unloadable rule is rejected up front instead of being skipped
//! at the next reload.

use std::sync::Arc;

use core_kernel::RuleId;

use crate::engine::RuleEngine;
use crate::error::RuleError;
use crate::ports::{NewRule, RuleRepositoryPort, RuleUpdate};
use crate::rule::{CompiledRule, RuleDefinition};

pub struct RuleAdminService {
    repository: Arc<dyn RuleRepositoryPort>,
    engine: Arc<RuleEngine>,
}

impl RuleAdminService {
    pub fn new(repository: Arc<dyn RuleRepositoryPort>, engine: Arc<RuleEngine>) -> Self {
        Self { repository, engine }
    }

    /// Validates and creates a rule, then reloads the engine.
    pub async fn create_rule(&self, rule: NewRule) -> Result<RuleDefinition, RuleError> {
        // Probe-compile before writing; the id is not known yet
        let probe = RuleDefinition {
            id: RuleId::new(0),
            name: rule.name.clone(),
            description: rule.description.clone(),
            scope: rule.scope,
            conditions: rule.conditions.clone(),
            event: rule.event.clone(),
            priority: rule.priority,
            is_active: rule.is_active,
        };
        CompiledRule::compile(&probe)?;

        let saved = self.repository.create(rule).await?;
        self.engine.reload_from(self.repository.as_ref()).await;

        tracing::info!(rule = %saved.name, id = %saved.id, "created rule");
        Ok(saved)
    }

    /// Validates and applies a partial update, then reloads the engine.
    pub async fn update_rule(
        &self,
        id: RuleId,
        changes: RuleUpdate,
    ) -> Result<RuleDefinition, RuleError> {
        let current = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| RuleError::NotFound(id.to_string()))?;

        // Validate the merged rule when its structure changes
        if changes.conditions.is_some() || changes.event.is_some() {
            let candidate = RuleDefinition {
                conditions: changes
                    .conditions
                    .clone()
                    .unwrap_or_else(|| current.conditions.clone()),
                event: changes.event.clone().unwrap_or_else(|| current.event.clone()),
                priority: changes.priority.unwrap_or(current.priority),
                ..current.clone()
            };
            CompiledRule::compile(&candidate)?;
        }

        let updated = self
            .repository
            .update(id, changes)
            .await?
            .ok_or_else(|| RuleError::NotFound(id.to_string()))?;
        self.engine.reload_from(self.repository.as_ref()).await;

        tracing::info!(rule = %updated.name, id = %updated.id, "updated rule");
        Ok(updated)
    }

    /// Deletes a rule; reloads the engine only when something was removed.
    pub async fn delete_rule(&self, id: RuleId) -> Result<bool, RuleError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            self.engine.reload_from(self.repository.as_ref()).await;
            tracing::info!(%id, "deleted rule");
        }
        Ok(deleted)
    }

    /// Flips a rule's active flag, then reloads the engine.
    pub async fn toggle_rule(&self, id: RuleId) -> Result<RuleDefinition, RuleError> {
        let toggled = self
            .repository
            .toggle_active(id)
            .await?
            .ok_or_else(|| RuleError::NotFound(id.to_string()))?;
        self.engine.reload_from(self.repository.as_ref()).await;

        tracing::info!(
            rule = %toggled.name,
            active = toggled.is_active,
            "toggled rule"
        );
        Ok(toggled)
    }

    /// All rules, for the surrounding CRUD layer.
    pub async fn list_rules(&self) -> Result<Vec<RuleDefinition>, RuleError> {
        Ok(self.repository.list_all().await?)
    }

    pub async fn get_rule(&self, id: RuleId) -> Result<Option<RuleDefinition>, RuleError> {
        Ok(self.repository.get(id).await?)
    }
}
