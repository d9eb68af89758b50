use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};

use crate::assets::{AssetStore, is_plain_file_name};
use crate::llm::{GenerateRequest, ImageRequest, LlmClient};
use crate::telemetry::metrics::STAMPS_GENERATED;

const STAMP_PROMPT_SYSTEM: &str = "I need you to write an image prompt so an image model can generate high quality stamp artwork for me. I will give you a location in a city and state in the U.S.

Here is an example of a prompt that produced a good image: An illustrative flat drawing of Griffith Observatory in Los Angeles, California, featuring the iconic white Art Deco building with its distinctive copper domes perched on the southern slope of Mount Hollywood, overlooking the Los Angeles basin with the downtown skyline visible in the distance, surrounded by chaparral-covered hills and native California vegetation, with the building's three copper domes prominently displayed including the central rotunda dome, rendered in a vintage 1950s postage stamp aesthetic with vibrant, playful colors, geometric shapes, and soft gradients, no text or lettering, no grain, stamp fills entire frame, edge-to-edge composition, no margins, no border space, visible stamp perforations around the edges, transparent background, isolated stamp on transparent background, no background color, square 1:1 aspect ratio.

Return ONLY the image prompt without any markdown formatting, explanations, or code blocks.";

/// One location in a stamp batch. Fields are optional so a bad item does not
/// reject the whole batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StampTarget {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub stamp: Option<StampFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StampFile {
    #[serde(default)]
    pub stamp_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StampStatus {
    Generated,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct StampOutcome {
    pub name: String,
    pub status: StampStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StampOutcome {
    fn failed(name: &str, error: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: StampStatus::Failed,
            file: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StampSettings {
    pub prompt_model: String,
    pub image_model: String,
    pub image_quality: String,
    pub max_tokens: u32,
}

struct ValidTarget<'a> {
    name: &'a str,
    city: &'a str,
    state: &'a str,
    stamp_image: &'a str,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn validate(target: &StampTarget) -> Result<ValidTarget<'_>, String> {
    let missing = "Missing required fields within location data".to_string();

    let name = non_empty(&target.name).ok_or_else(|| missing.clone())?;
    let city = non_empty(&target.city).ok_or_else(|| missing.clone())?;
    let state = non_empty(&target.state).ok_or_else(|| missing.clone())?;
    let stamp_image = target
        .stamp
        .as_ref()
        .and_then(|s| non_empty(&s.stamp_image))
        .ok_or(missing)?;

    if !is_plain_file_name(stamp_image) {
        return Err(format!("Invalid stamp file name {stamp_image:?}"));
    }

    Ok(ValidTarget {
        name,
        city,
        state,
        stamp_image,
    })
}

/// Generates stamps one location at a time. A failed location is recorded and
/// the batch moves on.
#[tracing::instrument(
    name = "pipeline generate_stamps",
    skip_all,
    fields(
        pipeline.stage = "stamps",
        stamps.requested = targets.len(),
        stamps.generated,
        stamps.failed,
    )
)]
pub async fn generate_stamps(
    llm_client: &LlmClient,
    assets: &AssetStore,
    settings: &StampSettings,
    targets: &[StampTarget],
) -> Vec<StampOutcome> {
    let mut outcomes = Vec::with_capacity(targets.len());

    for (index, target) in targets.iter().enumerate() {
        let outcome = match validate(target) {
            Ok(valid) => generate_one(llm_client, assets, settings, &valid).await,
            Err(message) => {
                let label = non_empty(&target.name)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("location #{}", index + 1));
                tracing::warn!(location = %label, error = %message, "Skipping invalid stamp target");
                StampOutcome::failed(&label, message)
            }
        };

        let status = match outcome.status {
            StampStatus::Generated => "generated",
            StampStatus::Failed => "failed",
        };
        STAMPS_GENERATED.add(1, &[KeyValue::new("outcome", status)]);
        outcomes.push(outcome);
    }

    let generated = outcomes
        .iter()
        .filter(|o| o.status == StampStatus::Generated)
        .count();
    let span = tracing::Span::current();
    span.record("stamps.generated", generated);
    span.record("stamps.failed", outcomes.len() - generated);

    outcomes
}

async fn generate_one(
    llm_client: &LlmClient,
    assets: &AssetStore,
    settings: &StampSettings,
    target: &ValidTarget<'_>,
) -> StampOutcome {
    let location_info = format!("{} in {}, {}", target.name, target.city, target.state);

    let prompt = match llm_client
        .generate(&GenerateRequest {
            model: settings.prompt_model.clone(),
            system: STAMP_PROMPT_SYSTEM.to_string(),
            prompt: format!("Create me a prompt for {location_info}"),
            max_tokens: settings.max_tokens,
            operation: "stamp_prompt".to_string(),
        })
        .await
    {
        Ok(resp) => resp.content,
        Err(err) => {
            tracing::error!(location = %target.name, error = %err, "Stamp prompt generation failed");
            return StampOutcome::failed(
                target.name,
                format!("Failed to generate location stamp: {err}"),
            );
        }
    };

    let prompt = prompt.trim();
    if prompt.is_empty() {
        return StampOutcome::failed(
            target.name,
            "The language model did not return a valid image prompt for this location. Please try again later.",
        );
    }
    tracing::info!(location = %target.name, prompt = %prompt, "Image prompt generated");

    let request = ImageRequest::stamp(&settings.image_model, &settings.image_quality, prompt);
    let payload = match llm_client.generate_image(&request).await {
        Ok(resp) => resp.b64_json,
        Err(err) => {
            tracing::error!(location = %target.name, error = %err, "Stamp image generation failed");
            return StampOutcome::failed(
                target.name,
                format!("Failed to generate location stamp: {err}"),
            );
        }
    };

    let Some(payload) = payload else {
        return StampOutcome::failed(
            target.name,
            format!(
                "The image model did not return an image for {}. Please try again later.",
                target.name
            ),
        );
    };

    let bytes = match STANDARD.decode(payload.trim()) {
        Ok(bytes) => bytes,
        Err(err) => {
            return StampOutcome::failed(
                target.name,
                format!("Image payload for {} was not valid base64: {err}", target.name),
            );
        }
    };

    match assets.write_stamp(target.stamp_image, &bytes).await {
        Ok(path) => {
            tracing::info!(location = %target.name, path = %path.display(), "Stamp generated");
            StampOutcome {
                name: target.name.to_string(),
                status: StampStatus::Generated,
                file: Some(target.stamp_image.to_string()),
                error: None,
            }
        }
        Err(err) => {
            tracing::error!(location = %target.name, error = %err, "Failed to write stamp");
            StampOutcome::failed(target.name, format!("Failed to save stamp: {err}"))
        }
    }
}
