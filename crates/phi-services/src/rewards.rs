use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Reward issuance, invoked by callers only after a proof was accepted.
pub trait RewardCallback: Send + Sync {
    /// Credit `subject` for `work_units` of service and return the new balance.
    fn reward(&self, subject: &str, work_units: u64) -> Result<u64, ServiceError>;
}

/// A registered infrastructure provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub service_type: String,
    pub balance: u64,
}

/// Per-provider reward balances, credited at a flat rate per work unit.
pub struct RewardLedger {
    rate_per_unit: u64,
    providers: DashMap<String, Provider>,
}

impl RewardLedger {
    pub fn new(rate_per_unit: u64) -> Self {
        Self {
            rate_per_unit,
            providers: DashMap::new(),
        }
    }

    pub fn rate_per_unit(&self) -> u64 {
        self.rate_per_unit
    }

    /// Register a provider. A provider id can only be registered once.
    pub fn register_provider(&self, provider_id: &str, service_type: &str) -> Result<(), ServiceError> {
        match self.providers.entry(provider_id.to_string()) {
            Entry::Occupied(_) => Err(ServiceError::ProviderExists(provider_id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Provider {
                    service_type: service_type.to_string(),
                    balance: 0,
                });
                tracing::info!(provider = provider_id, service_type, "provider registered");
                Ok(())
            }
        }
    }

    pub fn provider(&self, provider_id: &str) -> Option<Provider> {
        self.providers.get(provider_id).map(|p| p.clone())
    }

    /// Current balance, zero for unknown providers.
    pub fn balance(&self, provider_id: &str) -> u64 {
        self.providers.get(provider_id).map(|p| p.balance).unwrap_or(0)
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

impl Default for RewardLedger {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RewardCallback for RewardLedger {
    fn reward(&self, subject: &str, work_units: u64) -> Result<u64, ServiceError> {
        if work_units == 0 {
            return Err(ServiceError::NoWork);
        }
        let mut provider = self
            .providers
            .get_mut(subject)
            .ok_or_else(|| ServiceError::UnknownProvider(subject.to_string()))?;

        let credit = work_units
            .checked_mul(self.rate_per_unit)
            .ok_or_else(|| ServiceError::Overflow(subject.to_string()))?;
        provider.balance = provider
            .balance
            .checked_add(credit)
            .ok_or_else(|| ServiceError::Overflow(subject.to_string()))?;

        tracing::info!(
            provider = subject,
            work_units,
            credit,
            balance = provider.balance,
            "reward issued"
        );
        Ok(provider.balance)
    }
}
