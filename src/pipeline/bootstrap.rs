use crate::error::AppError;
use crate::llm::{GenerateRequest, LlmClient};

const SYSTEM_PROMPT: &str = r#"I am going to give you a list of locations and I need you to create SQL statements for each list to insert into my database table 'locations'. Here is the structure of the table:

id- uuid, primary key, unique, default: gen_random_uuid()
name- text
description- text, nullable
hero_image- text, nullable
latitude- double precision, nullable
longitude- double precision, nullable
address- text, nullable
city- text, nullable
state- text, nullable
zipcode- text, nullable
geofence_radius- integer, nullable
difficulty_level- integer, nullable
estimated_time- integer, nullable
best_time_to_visit- text, nullable
entry_fee- text, nullable
accessibility_info- text, nullable
is_active- boolean, nullable, default: true
is_featured- boolean, nullable, default: false
is_trending- boolean, nullable, default: false
admin_notes- text, nullable
created_at- timestamp with time zone, nullable, default: now()
last_updated_at- timestamp with time zone, nullable, default: now()
created_by- uuid, nullable
website- text, nullable
phone- text, nullable

For each location, set the following:
- is_active = true
- is_featured = false
- is_trending = false

Do not include id, created_at, last_updated_at or created_by; they are filled by column defaults.

difficulty_level is an integer from 1 to 5, 1 being very easy and 5 extremely difficult (rock climbing and similar). Very few locations, if any, are a 5.

estimated_time is in minutes, so a one hour visit is 60.

geofence_radius is usually between 100 and 2000 depending on the size of the location.

latitude and longitude have 4 decimal places.

best_time_to_visit is free text, for example "Evenings for stargazing; weekdays to avoid crowds" or "Year-round, but spring (March-May) offers the best weather and blooming flowers".

entry_fee and accessibility_info are free text as needed.

admin_notes are left out; they stay null until a person visits and adds a note.

address only includes the street and building or unit number when needed.

description is at least 250 characters and at most 600.

hero_image is the location name in lowercase with _ for spaces and a .jpg extension, for example Griffith Park Observatory -> griffith_park_observatory.jpg. Special characters such as & are removed, so Park & Gym -> park_gym.jpg.

Return ONLY the SQL INSERT statement without any markdown formatting, explanations, or code blocks."#;

#[derive(Debug, Clone)]
pub struct BootstrapRequest {
    pub locations: Vec<String>,
    pub state: String,
}

fn user_prompt(request: &BootstrapRequest) -> String {
    format!(
        "Create a SQL INSERT statement for the following locations:\n\n\
        Locations:\n{}\n\n\
        State:\n{}",
        request.locations.join("\n"),
        request.state
    )
}

/// Asks the model for an `INSERT INTO locations` statement and returns it verbatim.
#[tracing::instrument(
    name = "pipeline bootstrap_locations",
    skip(llm_client, request),
    fields(
        pipeline.stage = "bootstrap",
        locations.count = request.locations.len(),
        locations.state = %request.state,
        sql.length,
    )
)]
pub async fn bootstrap_locations(
    llm_client: &LlmClient,
    model: &str,
    max_tokens: u32,
    request: &BootstrapRequest,
) -> Result<String, AppError> {
    let resp = llm_client
        .generate(&GenerateRequest {
            model: model.to_string(),
            system: SYSTEM_PROMPT.to_string(),
            prompt: user_prompt(request),
            max_tokens,
            operation: "bootstrap_locations".to_string(),
        })
        .await
        .map_err(|e| AppError::upstream("Failed to generate SQL statement", e))?;

    tracing::Span::current().record("sql.length", resp.content.len());

    Ok(resp.content)
}
