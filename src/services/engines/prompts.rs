//! Prompt templates and output schemas for both engines.

use serde_json::{json, Value};

use super::TitleContext;

/// Persona for open questions on the primary engine
pub const EXPLAINER_SYSTEM_INSTRUCTION: &str = "You are FrameDecoded, a film scholar. \
Analyze 'why' movies/shows are cultural touchpoints. NEVER recommend what to watch. \
When discussing a title, ALWAYS try to find and provide its official YouTube trailer URL \
using your Google Search tool.";

/// Persona for open questions on the fallback engine
pub const FALLBACK_CHAT_SYSTEM_PROMPT: &str = "You are FrameDecoded, a professional film scholar \
and analyst. Your purpose is to explain and analyze movies and TV shows, never to recommend them. \
Focus on the 'why': why is it loved, divisive, or culturally significant?\n\n\
IMPORTANT: Use your web search capabilities to find the official YouTube trailer URL for any \
titles discussed. Always include a direct YouTube link (e.g., https://www.youtube.com/watch?v=...) \
clearly in your response. Maintain a calm, intelligent, and unhurried editorial tone.";

/// System role for structured analysis on the fallback engine
pub const FALLBACK_ANALYSIS_SYSTEM_PROMPT: &str = "You are an AI that provides structured film \
analysis in JSON. You must use web search to find valid YouTube trailers. Respond with a single \
JSON object and nothing else.";

pub fn analyze_title(title: &TitleContext) -> String {
    format!(
        "Analyze the {year} title \"{name}\". Context: {description}.\n\
         FrameDecoded Purpose: Explain why it resonates, why it's divisive, what's misunderstood, \
         and its legacy.\n\
         Rules: Calm, insightful tone. NO recommendations. Fill every field. Return JSON.",
        year = title.year,
        name = title.title,
        description = title.description,
    )
}

pub fn find_trailer(title: &str, year: i32) -> String {
    format!(
        "Find the official YouTube trailer for the {} film or show \"{}\". \
         Search specifically for high-quality official channels.",
        year, title
    )
}

pub fn compare(first: &str, second: &str) -> String {
    format!(
        "Compare \"{}\" and \"{}\".\n\
         Explain differences in tone, storytelling approach, and audience reception.\n\
         Rules: Strictly neutral and informational. NO winner, NO recommendation.",
        first, second
    )
}

pub fn explain_trend(topic: &str) -> String {
    format!(
        "Explain the movie/TV trend: \"{}\".\n\
         Provide historical background, cultural impact, and why it is happening now.\n\
         Rules: Insightful, editorial tone. Use data-driven reasoning where possible.",
        topic
    )
}

pub fn fallback_analyze_title(title: &TitleContext) -> String {
    format!(
        "Perform a deep analysis of the {year} title \"{name}\".\n\
         Database description: {description}\n\n\
         Tasks:\n\
         1. Analyze why it resonates with audiences.\n\
         2. Analyze why it is or was divisive.\n\
         3. Identify common misunderstandings.\n\
         4. Discuss its cultural legacy and how it has aged.\n\
         5. CRITICAL: Use web search to find the official, current, and embeddable YouTube \
         trailer for this exact title.\n\n\
         Do not recommend whether to watch it.\n\n\
         Return your response EXCLUSIVELY in the following JSON format:\n\
         {{\n\
           \"resonance\": \"...\",\n\
           \"divisiveness\": \"...\",\n\
           \"misunderstandings\": \"...\",\n\
           \"legacy\": \"...\",\n\
           \"trailer_url\": \"https://www.youtube.com/watch?v=...\"\n\
         }}",
        year = title.year,
        name = title.title,
        description = title.description,
    )
}

/// Gemini response schema: an object of required string properties
fn string_object_schema(fields: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|field| (field.to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": fields,
    })
}

pub fn analysis_schema() -> Value {
    string_object_schema(&["resonance", "divisiveness", "misunderstandings", "legacy"])
}

pub fn comparison_schema() -> Value {
    string_object_schema(&["tone", "storytelling", "reception", "context"])
}

pub fn trend_schema() -> Value {
    string_object_schema(&["background", "impact", "why_now"])
}
