use super::{AdviceError, AdviceProvider};
use crate::models::Home;
use crate::services::metrics::LLM_REQUEST_DURATION;
use crate::services::providers::{GenerationParams, TextProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Sampling temperature for advice generation.
pub const ADVICE_TEMPERATURE: f32 = 0.3;

/// Characters that end a line in a backend reply.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Leading characters treated as list markers.
const LIST_MARKERS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', ')', '-', '•', '*', ' ',
];

/// Asks a text-generation backend for advice and splits the reply into items.
pub struct LlmAdviceProvider {
    client: Arc<dyn TextProvider>,
    model: String,
}

impl LlmAdviceProvider {
    pub fn new(client: Arc<dyn TextProvider>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl AdviceProvider for LlmAdviceProvider {
    #[instrument(skip(self, home), fields(home_id = home.id, model = %self.model))]
    async fn generate_advice(&self, home: &Home) -> Result<Vec<String>, AdviceError> {
        let prompt = build_prompt(home);
        let params = GenerationParams {
            temperature: ADVICE_TEMPERATURE,
            candidate_count: 1,
        };

        let timer = LLM_REQUEST_DURATION
            .with_label_values(&[self.model.as_str()])
            .start_timer();
        let text = self.client.complete(&self.model, &prompt, &params).await;
        timer.observe_duration();

        Ok(parse_recommendations(&text?))
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

/// Render the advisor prompt for a home.
pub fn build_prompt(home: &Home) -> String {
    let year_built = home
        .year_built
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let insulation = home.insulation.map(|i| i.as_str()).unwrap_or("Unknown");

    let mut parts = vec![
        "You are an energy efficiency advisor. Based on the following home profile, provide actionable, prioritized energy-saving recommendations.".to_string(),
        "Respond with a numbered list of recommendations only, one per line. No preamble or conclusion.".to_string(),
        String::new(),
        "Home profile:".to_string(),
        format!("- Size: {} m²", home.size_sqm),
        format!("- Year built: {}", year_built),
        format!("- Heating: {}", home.heating_type),
        format!("- Insulation: {}", insulation),
    ];

    if let Some(notes) = home.notes.as_deref().filter(|n| !n.is_empty()) {
        parts.push(format!("- Notes: {}", notes));
    }

    parts.join("\n")
}

/// Split a free-text reply into recommendation items.
///
/// Blank lines are dropped and leading list markers stripped. A reply with no
/// usable line comes back whole, trimmed, as a single item.
pub fn parse_recommendations(text: &str) -> Vec<String> {
    let items: Vec<String> = text
        .split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.trim_start_matches(LIST_MARKERS))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        vec![text.trim().to_string()]
    } else {
        items
    }
}
