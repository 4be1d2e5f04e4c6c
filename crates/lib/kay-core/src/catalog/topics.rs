use kay_store::Envelope;
use serde_json::Value;

pub const MEMORY_TOPICS: [&str; 5] = ["Environment", "Infrastructure", "Security", "TypeScript", "PAI"];

/// Where the full learnings markdown lives outside this server.
pub const MEMORY_DOCS_LOCATION: &str = "~/reference/pai-blueprints/pai-extension-guide/";

/// Lists the MEMORY topics and points at the markdown that holds them.
#[must_use]
pub fn memory_topics() -> Envelope {
    Envelope::new("KAY's MEMORY structure")
        .with_field(
            "learnings_topics",
            MEMORY_TOPICS.iter().copied().map(Value::from).collect::<Vec<_>>(),
        )
        .with_note("These are Oscar's accumulated learnings from previous sessions")
        .with_field(
            "suggestion",
            format!(
                "The raw markdown files are at: {MEMORY_DOCS_LOCATION} - your assistant can read them directly"
            ),
        )
}
