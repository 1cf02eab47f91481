//! Check-in generation against an external LLM.
//!
//! The generator streams the model's JSON answer, pushing each repaired
//! snapshot into a [`PartialRelay`] so progress flows onto the run's status
//! channel, and returns the parsed final analysis.

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, error, info};
use rig::{
    agent::{Agent, MultiTurnStreamItem},
    client::CompletionClient,
    completion::{CompletionModel, Message},
    message::{Text, UserContent},
    streaming::{StreamedAssistantContent, StreamingChat},
    OneOrMany,
};
use std::sync::Mutex;

use cadence_core::checkins::{
    CheckInAnalysis, CheckInContext, CheckInResource, PartialCheckInAnalysis,
};

use crate::channel::PartialRelay;
use crate::error::CheckInError;
use crate::partial_json::{parse_final_analysis, parse_partial_analysis};
use crate::prompt::{system_preamble, user_prompt};
use crate::providers::{
    create_anthropic_client, create_gemini_client, create_groq_client, create_ollama_client,
    create_openai_client, create_openrouter_client, ProviderSettings,
};

/// Inputs for one generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub context: &'a CheckInContext,
    pub resources: &'a [CheckInResource],
}

/// Trait for producing a check-in analysis.
#[async_trait]
pub trait CheckInGeneratorTrait: Send + Sync {
    /// Generates the analysis, pushing in-progress snapshots into `relay`.
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
        relay: &mut PartialRelay,
    ) -> Result<CheckInAnalysis, CheckInError>;
}

// ============================================================================
// Rig Generator
// ============================================================================

/// Generator backed by a rig-core provider client.
pub struct RigCheckInGenerator {
    settings: ProviderSettings,
}

impl RigCheckInGenerator {
    pub fn new(settings: ProviderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }
}

#[async_trait]
impl CheckInGeneratorTrait for RigCheckInGenerator {
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
        relay: &mut PartialRelay,
    ) -> Result<CheckInAnalysis, CheckInError> {
        let preamble = system_preamble(request.context);
        let prompt = user_prompt(request.context, request.resources)?;
        let provider_id = self.settings.provider_id.as_str();
        let model_id = self.settings.model_id.as_str();
        let api_key = self.settings.api_key.clone();

        info!("Generating check-in with provider {} model {}", provider_id, model_id);

        // Build the agent on the selected client and stream the answer.
        macro_rules! build_and_stream {
            ($client:expr) => {{
                let agent = $client
                    .agent(model_id)
                    .preamble(&preamble)
                    .max_tokens(self.settings.max_tokens)
                    .build();
                stream_analysis(agent, prompt, relay).await
            }};
        }

        match provider_id {
            "anthropic" => {
                let client = create_anthropic_client(api_key, provider_id)?;
                build_and_stream!(client)
            }
            "gemini" | "google" => {
                let client = create_gemini_client(api_key, provider_id)?;
                build_and_stream!(client)
            }
            "groq" => {
                let client = create_groq_client(api_key, provider_id)?;
                build_and_stream!(client)
            }
            "ollama" => {
                let client = create_ollama_client(self.settings.base_url.clone())?;
                build_and_stream!(client)
            }
            "openrouter" => {
                let client = create_openrouter_client(api_key, provider_id)?;
                build_and_stream!(client)
            }
            _ => {
                let client = create_openai_client(api_key, provider_id)?;
                build_and_stream!(client)
            }
        }
    }
}

/// Stream a rig agent's answer, relaying partial analyses as text arrives.
async fn stream_analysis<M: CompletionModel + 'static>(
    agent: Agent<M>,
    prompt: String,
    relay: &mut PartialRelay,
) -> Result<CheckInAnalysis, CheckInError> {
    let prompt = Message::User {
        content: OneOrMany::one(UserContent::Text(Text { text: prompt })),
    };
    let mut stream = agent.stream_chat(prompt, Vec::<Message>::new()).multi_turn(1).await;

    let mut buffer = String::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(MultiTurnStreamItem::StreamAssistantItem(StreamedAssistantContent::Text(
                Text { text },
            ))) => {
                if text.is_empty() {
                    continue;
                }
                buffer.push_str(&text);
                if let Some(partial) = parse_partial_analysis(&buffer) {
                    relay.push(partial);
                }
            }

            // Some providers only deliver the full text at the end.
            Ok(MultiTurnStreamItem::FinalResponse(final_response)) => {
                if buffer.trim().is_empty() {
                    buffer = final_response.response().to_string();
                }
            }

            Ok(_) => {}

            Err(e) => {
                error!("Generation stream error: {}", e);
                return Err(CheckInError::provider(e.to_string()));
            }
        }
    }

    debug!("Generation finished with {} bytes of output", buffer.len());
    parse_final_analysis(&buffer)
}

// ============================================================================
// Fake Generator
// ============================================================================

/// Scripted generator for tests and for running without a provider.
///
/// Replays `partials` through the relay, then returns `result`.
pub struct FakeCheckInGenerator {
    partials: Vec<PartialCheckInAnalysis>,
    result: Result<CheckInAnalysis, String>,
    requests: Mutex<Vec<usize>>,
}

impl FakeCheckInGenerator {
    /// Streams `analysis` field by field, then returns it.
    pub fn new(analysis: CheckInAnalysis) -> Self {
        Self {
            partials: staged_partials(&analysis),
            result: Ok(analysis),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_partials(mut self, partials: Vec<PartialCheckInAnalysis>) -> Self {
        self.partials = partials;
        self
    }

    /// Emits the scripted partials, then fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            partials: Vec::new(),
            result: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A plain analysis echoing the context, used when no provider is configured.
    pub fn summary_of(context: &CheckInContext) -> CheckInAnalysis {
        let names: Vec<&str> = context.activities.iter().map(|a| a.name.as_str()).collect();
        CheckInAnalysis {
            overall_summary: format!(
                "You logged {} entries across {} days between {} and {}.",
                context.assessment.total_entries,
                context.assessment.days_with_entries,
                context.window.start,
                context.window.end
            ),
            insights: context
                .activities
                .iter()
                .map(|a| format!("{}: {}", a.name, a.trend.summary))
                .collect(),
            weekly_focus: match names.first() {
                Some(name) => format!("Keep logging {} every day this week.", name),
                None => "Log one activity every day this week.".to_string(),
            },
            ..Default::default()
        }
    }

    /// Number of resources passed on each call so far.
    pub fn resource_counts(&self) -> Vec<usize> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.resource_counts().len()
    }
}

/// Snapshots that fill the analysis in the order the model writes it.
fn staged_partials(analysis: &CheckInAnalysis) -> Vec<PartialCheckInAnalysis> {
    let mut stages = Vec::new();
    let mut current = PartialCheckInAnalysis {
        overall_summary: Some(analysis.overall_summary.clone()),
        ..Default::default()
    };
    stages.push(current.clone());
    current.celebrations = Some(analysis.celebrations.clone());
    stages.push(current.clone());
    current.insights = Some(analysis.insights.clone());
    stages.push(current.clone());
    current.recommendations = Some(analysis.recommendations.clone());
    stages.push(current.clone());
    current.weekly_focus = Some(analysis.weekly_focus.clone());
    stages.push(current.clone());
    current.motivation = Some(analysis.motivation.clone());
    stages.push(current);
    stages
}

#[async_trait]
impl CheckInGeneratorTrait for FakeCheckInGenerator {
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
        relay: &mut PartialRelay,
    ) -> Result<CheckInAnalysis, CheckInError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.resources.len());
        }
        for partial in &self.partials {
            relay.push(partial.clone());
        }
        self.result.clone().map_err(CheckInError::provider)
    }
}

/// Generator used when no provider is configured: describes the context
/// without calling out.
pub struct OfflineCheckInGenerator;

#[async_trait]
impl CheckInGeneratorTrait for OfflineCheckInGenerator {
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
        relay: &mut PartialRelay,
    ) -> Result<CheckInAnalysis, CheckInError> {
        let analysis = FakeCheckInGenerator::summary_of(request.context);
        for partial in staged_partials(&analysis) {
            relay.push(partial);
        }
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> CheckInAnalysis {
        CheckInAnalysis {
            overall_summary: "Solid month".into(),
            celebrations: vec!["Walked 12 days".into()],
            insights: vec!["Better sleep after walks".into()],
            recommendations: vec!["Walk after lunch".into()],
            weekly_focus: "Lunch walks".into(),
            motivation: "Small steps add up.".into(),
            ..Default::default()
        }
    }

    #[test]
    fn staged_partials_are_all_meaningful() {
        let mut relay = PartialRelay::detached();
        let emitted = staged_partials(&analysis())
            .into_iter()
            .filter(|p| relay.push(p.clone()))
            .count();
        assert_eq!(emitted, 6);
        assert_eq!(relay.last().and_then(|p| p.motivation.as_deref()), Some("Small steps add up."));
    }

    #[test]
    fn empty_fields_are_not_relayed() {
        let mut relay = PartialRelay::detached();
        let emitted = staged_partials(&CheckInAnalysis {
            overall_summary: "Only a summary".into(),
            ..Default::default()
        })
        .into_iter()
        .filter(|p| relay.push(p.clone()))
        .count();
        assert_eq!(emitted, 1);
    }
}
