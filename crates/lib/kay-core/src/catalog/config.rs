//! Static configuration facts about KAY. No I/O.

use std::fmt;
use std::str::FromStr;

use kay_store::{Envelope, Outcome, UnknownKey};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigComponent {
    CronSchedule,
    SyncConfiguration,
    TelegramBot,
    FileProcessing,
    Integrations,
}

impl ConfigComponent {
    pub const ALL: [Self; 5] = [
        Self::CronSchedule,
        Self::SyncConfiguration,
        Self::TelegramBot,
        Self::FileProcessing,
        Self::Integrations,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CronSchedule => "cron-schedule",
            Self::SyncConfiguration => "sync-configuration",
            Self::TelegramBot => "telegram-bot",
            Self::FileProcessing => "file-processing",
            Self::Integrations => "integrations",
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::as_str)
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CronSchedule => "KAY's cron automation schedule",
            Self::SyncConfiguration => "KAY's sync configuration",
            Self::TelegramBot => "KAY's Telegram bot configuration",
            Self::FileProcessing => "KAY's file processing configuration",
            Self::Integrations => "KAY's external integrations",
        }
    }

    #[must_use]
    pub fn envelope(self) -> Envelope {
        Envelope::from_object(self.description(), self.body())
    }

    fn body(self) -> Value {
        match self {
            Self::CronSchedule => json!({
                "vps_crons": [
                    { "schedule": "*/15 * * * *", "script": "sync-to-github.sh", "description": "Git auto-sync" },
                    { "schedule": "0 2 * * 1-6", "script": "health-check.sh", "description": "Health check (Mon-Sat)" },
                    { "schedule": "0 2 * * 0", "script": "security-audit.sh", "description": "Security audit (Sunday)" },
                    { "schedule": "0 3 * * *", "script": "rag-reindex.sh", "description": "RAG reindex (daily)" },
                    { "schedule": "0 4 * * *", "script": "extract-missed-learnings.sh", "description": "Extract learnings (daily)" },
                    { "schedule": "0 5 * * 0", "script": "memory-maintenance.sh", "description": "Memory maintenance (Sunday)" },
                    { "schedule": "*/15 8-19 * * 1-5", "script": "meeting-check.sh", "description": "Meeting check (weekdays)" }
                ],
                "railway_crons": [
                    { "schedule": "*/10 * * * *", "script": "cron-sync.ts", "description": "Full sync cycle" }
                ],
                "telegram_scheduler": [
                    { "time": "8:00 AM", "type": "morning_summary" },
                    { "time": "9:00 AM", "type": "overdue_tasks" },
                    { "time": "2:00 PM", "type": "high_priority_reminder" },
                    { "interval": "every minute", "type": "meeting_reminders" }
                ]
            }),
            Self::SyncConfiguration => json!({
                "notion_sync": {
                    "interval": "10 minutes",
                    "databases": 11,
                    "conflict_resolution": "last-write-wins",
                    "retry_on_failure": true
                },
                "google_calendar": {
                    "sync_direction": "bidirectional",
                    "interval": "10 minutes"
                },
                "git_auto_sync": {
                    "interval": "15 minutes",
                    "branch": "main",
                    "auto_push": true
                }
            }),
            Self::TelegramBot => json!({
                "deployment": "VPS",
                "features": [
                    "Natural language task management",
                    "Voice transcription",
                    "Image analysis",
                    "File processing",
                    "Scheduled notifications",
                    "Real-time inbox watching"
                ],
                "commands": ["/help", "/clear", "/tasks", "/changes", "/costs", "/feedback", "/analyze", "/logs"]
            }),
            Self::FileProcessing => json!({
                "pipeline_stages": [
                    "1. Scan inbox",
                    "2. Extract text (Dockling)",
                    "3. Classify (LLM)",
                    "4. Move to PARA folder",
                    "5. Chunk",
                    "6. Generate embeddings"
                ],
                "para_structure": ["Projects", "Areas", "Resources", "Archive"],
                "classification_threshold": 0.7,
                "embedding_model": "text-embedding-3-small"
            }),
            Self::Integrations => json!({
                "services": [
                    { "name": "Notion", "purpose": "11 databases, bidirectional sync" },
                    { "name": "Google Calendar", "purpose": "Event sync" },
                    { "name": "Gmail", "purpose": "Email classification" },
                    { "name": "Telegram", "purpose": "Bot interface" },
                    { "name": "OpenRouter", "purpose": "LLM access (59 models)" },
                    { "name": "Modal", "purpose": "Dockling for file parsing" },
                    { "name": "Neon", "purpose": "PostgreSQL database" },
                    { "name": "Railway", "purpose": "Sync service + LibreChat" }
                ]
            }),
        }
    }
}

impl fmt::Display for ConfigComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigComponent {
    type Err = UnknownKey;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|component| component.as_str() == name)
            .ok_or_else(|| UnknownKey::new("component", name, Self::names()))
    }
}

/// Looks up a component by name.
#[must_use]
pub fn lookup(name: &str) -> Outcome {
    match name.parse::<ConfigComponent>() {
        Ok(component) => component.envelope().into(),
        Err(unknown) => unknown.into(),
    }
}
