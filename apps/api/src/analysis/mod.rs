// Resume analysis: request validation, prompt assembly, one LLM call, and
// coercion of the model's JSON into a bounded AnalysisResult.
// All LLM calls go through llm_client; nothing here talks HTTP to the vendor.

pub mod coercion;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod request;
pub mod scoring;
