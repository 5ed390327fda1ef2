//! Host settings collaborator implementation

use posada_core::{models::LoyaltyConfig, traits::HostSettings, AppResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

/// In-memory implementation of `HostSettings`
///
/// Hosts without an explicit configuration fall back to the seeded default.
pub struct MemoryHostSettings {
    default: LoyaltyConfig,
    overrides: RwLock<HashMap<Uuid, LoyaltyConfig>>,
}

impl MemoryHostSettings {
    /// Create host settings with a default loyalty configuration
    pub fn new(default: LoyaltyConfig) -> Self {
        Self {
            default,
            overrides: RwLock::new(HashMap::new()),
        }
    }

    /// Set an explicit configuration for a host
    pub async fn set(&self, host_id: Uuid, config: LoyaltyConfig) {
        self.overrides.write().await.insert(host_id, config);
    }
}

impl Default for MemoryHostSettings {
    fn default() -> Self {
        Self::new(LoyaltyConfig::default())
    }
}

#[async_trait]
impl HostSettings for MemoryHostSettings {
    #[instrument(skip(self))]
    async fn get_loyalty_config(&self, host_id: Uuid) -> AppResult<LoyaltyConfig> {
        let overrides = self.overrides.read().await;
        Ok(overrides
            .get(&host_id)
            .cloned()
            .unwrap_or_else(|| self.default.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_override_beats_default() {
        let settings = MemoryHostSettings::default();
        let host_id = Uuid::new_v4();

        let config = settings.get_loyalty_config(host_id).await.unwrap();
        assert!(!config.enabled);

        settings
            .set(
                host_id,
                LoyaltyConfig {
                    enabled: true,
                    points_per_night_room: 10,
                    points_per_table_booking: 5,
                    points_per_currency_unit: dec!(1),
                    signup_bonus: 100,
                },
            )
            .await;

        let config = settings.get_loyalty_config(host_id).await.unwrap();
        assert!(config.enabled);
        assert_eq!(config.points_per_night_room, 10);

        // Other hosts still see the default
        let other = settings.get_loyalty_config(Uuid::new_v4()).await.unwrap();
        assert!(!other.enabled);
    }
}
