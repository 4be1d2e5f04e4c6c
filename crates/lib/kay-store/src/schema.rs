pub const TABLE_SYNC_RUN_HISTORY: &str = "sync_run_history";
pub const TABLE_TASKS: &str = "tasks";
pub const TABLE_PROJECTS: &str = "projects";
pub const TABLE_NOTES: &str = "notes";
pub const TABLE_FILES: &str = "files";
pub const TABLE_FILE_CHUNKS: &str = "file_chunks";
pub const TABLE_BOT_LOGS: &str = "bot_logs";
pub const TABLE_CALENDAR_EVENTS: &str = "calendar_events";
pub const TABLE_LLM_MODELS: &str = "llm_models";

/// Scratch table the preflight tries to create to prove the role is read-only.
pub const TABLE_WRITE_PROBE: &str = "test_write_check";

/// Dimension of the embedding vectors stored in `file_chunks.embedding`.
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// A row-count statement for one table from the fixed allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadProbe {
    pub table: &'static str,
    pub statement: &'static str,
}

/// Tables whose read access the preflight verifies.
pub const READ_PROBES: [ReadProbe; 4] = [
    ReadProbe {
        table: TABLE_TASKS,
        statement: "SELECT COUNT(*) AS count FROM tasks",
    },
    ReadProbe {
        table: TABLE_FILES,
        statement: "SELECT COUNT(*) AS count FROM files",
    },
    ReadProbe {
        table: TABLE_SYNC_RUN_HISTORY,
        statement: "SELECT COUNT(*) AS count FROM sync_run_history",
    },
    ReadProbe {
        table: TABLE_FILE_CHUNKS,
        statement: "SELECT COUNT(*) AS count FROM file_chunks",
    },
];
