//! The fee calculation service
//!
//! Orchestrates one calculation end to end: validation, rule evaluation
//! against the current snapshot, fee totalling, and asynchronous history
//! recording.

use std::sync::Arc;
use std::time::Instant;

use rust_decimal::Decimal;

use core_kernel::{round_money, ClientRecord, FactSet, TransactionRecord};
use domain_rules::{LoadReport, RuleEngine, RuleRepositoryPort, RulesInfo};

use crate::calculator::{fee_for_event, validate_inputs};
use crate::error::FeeError;
use crate::ports::CalculationHistoryPort;
use crate::result::{AppliedRule, CalculationRequest, CalculationResult};

pub struct FeeCalculationService {
    engine: Arc<RuleEngine>,
    history: Arc<dyn CalculationHistoryPort>,
}

impl FeeCalculationService {
    pub fn new(engine: Arc<RuleEngine>, history: Arc<dyn CalculationHistoryPort>) -> Self {
        Self { engine, history }
    }

    /// The engine this service evaluates against
    pub fn engine(&self) -> &Arc<RuleEngine> {
        &self.engine
    }

    /// Calculates the fee for one transaction/client pair.
    ///
    /// The per-rule contributions stay unrounded in `applied_rules`; the
    /// summed fee is rounded exactly once. The result is complete and
    /// returned independent of the history recording outcome.
    pub async fn calculate(
        &self,
        transaction: TransactionRecord,
        client: ClientRecord,
    ) -> Result<CalculationResult, FeeError> {
        let started = Instant::now();
        validate_inputs(&transaction, &client)?;

        let snapshot = self.engine.snapshot().await;
        let facts = FactSet::new(transaction, client);
        let events = snapshot.evaluate(&facts)?;

        let amount = facts.transaction.amount;
        let mut fee = Decimal::ZERO;
        let mut applied_rules = Vec::with_capacity(events.len());
        for event in &events {
            let contribution = fee_for_event(&event.params, amount);
            fee += contribution;
            applied_rules.push(AppliedRule {
                id: event
                    .params
                    .rule_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "0".to_string()),
                description: event
                    .params
                    .description
                    .clone()
                    .unwrap_or_else(|| "No description".to_string()),
                fee: contribution,
            });
            tracing::debug!(
                rule = event.params.rule_name.as_deref().unwrap_or("unknown"),
                %contribution,
                "applied rule"
            );
        }

        let fee = round_money(fee);
        let total_amount = amount + fee;
        let calculation_time_ms = started.elapsed().as_millis() as u64;

        let FactSet {
            transaction,
            client,
        } = facts;

        tracing::info!(
            transaction = %transaction.id,
            %fee,
            rules_applied = applied_rules.len(),
            elapsed_ms = calculation_time_ms,
            "fee calculated"
        );

        let result = CalculationResult {
            transaction,
            client,
            fee,
            total_amount,
            applied_rules,
            calculation_time_ms,
            errors: Vec::new(),
        };

        self.record_history(result.clone());
        Ok(result)
    }

    /// Calculates a fee without persisting anything.
    ///
    /// Ephemeral records stand in for stored entities, so repeated calls
    /// with the same request produce identical fees and applied rules.
    pub async fn calculate_pure(
        &self,
        request: CalculationRequest,
    ) -> Result<CalculationResult, FeeError> {
        let client = ClientRecord::ephemeral(&request.client);
        let transaction = TransactionRecord::ephemeral(&request.transaction, client.id);
        self.calculate(transaction, client).await
    }

    /// Reloads rules from the repository (admin operation).
    pub async fn reload_rules(&self, repository: &dyn RuleRepositoryPort) -> LoadReport {
        let report = self.engine.reload_from(repository).await;
        tracing::info!(loaded = report.loaded, "rules reloaded");
        report
    }

    /// Current rule count and last load time (monitoring).
    pub async fn rules_info(&self) -> RulesInfo {
        self.engine.rules_info().await
    }

    /// Hands the result to the recorder without waiting for it.
    fn record_history(&self, result: CalculationResult) {
        let history = Arc::clone(&self.history);
        tokio::spawn(async move {
            if let Err(error) = history.record_single(&result).await {
                tracing::error!(%error, "failed to record calculation history");
            }
        });
    }
}
