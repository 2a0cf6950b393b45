use super::{AdviceError, AdviceProvider};
use crate::models::Home;
use async_trait::async_trait;

/// General recommendations served when no backend is configured.
pub const FALLBACK_RECOMMENDATIONS: [&str; 5] = [
    "Consider upgrading to a heat pump if your heating system is old.",
    "Improve insulation in the attic and walls where possible.",
    "Install programmable thermostats to reduce heating when away.",
    "Seal drafts around windows and doors.",
    "Switch to LED lighting and energy-efficient appliances.",
];

/// Returns the same fixed list for every home. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackAdviceProvider;

#[async_trait]
impl AdviceProvider for FallbackAdviceProvider {
    async fn generate_advice(&self, _home: &Home) -> Result<Vec<String>, AdviceError> {
        Ok(FALLBACK_RECOMMENDATIONS
            .iter()
            .map(|s| s.to_string())
            .collect())
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
