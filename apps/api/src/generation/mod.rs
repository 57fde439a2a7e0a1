// Bullet generation: relays a streaming chat completion for a job description.
// All LLM calls go through llm_client; nothing here talks to the provider directly.

pub mod handlers;
