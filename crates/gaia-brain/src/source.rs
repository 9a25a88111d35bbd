use async_trait::async_trait;
use gaia_core::error::Result;
use gaia_core::types::{StudioProfile, Trigger};
use gaia_store::StudioStore;

/// Where the assistant reads its enabled trigger rules from.
#[async_trait]
pub trait TriggerSource: Send + Sync {
    /// Enabled triggers in deterministic store order.
    async fn enabled_triggers(&self) -> Result<Vec<Trigger>>;
}

/// Where the assistant reads the studio profile from.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn profile(&self, profile_id: &str) -> Result<Option<StudioProfile>>;
}

#[async_trait]
impl TriggerSource for StudioStore {
    async fn enabled_triggers(&self) -> Result<Vec<Trigger>> {
        StudioStore::enabled_triggers(self).await
    }
}

#[async_trait]
impl ProfileSource for StudioStore {
    async fn profile(&self, profile_id: &str) -> Result<Option<StudioProfile>> {
        self.get_profile(profile_id).await
    }
}
