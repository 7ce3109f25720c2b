/// Inline SQL migrations for the mirror schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained. Append-only: never
/// edit an applied entry, add a new one.
pub const MIGRATIONS: &[&str] = &[
    // Migration 1: mirrored projects. Remote-assigned id is the key;
    // soft delete sets deleted_at and keeps the row so descendant data
    // stays readable.
    r#"
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY,
    name_with_namespace TEXT NOT NULL CHECK (length(name_with_namespace) > 0),
    description TEXT,
    default_branch TEXT,
    deleted_at INTEGER
);
"#,
    // Migration 2: commits, one row per (project, branch, sha).
    // Timestamps are Unix seconds.
    r#"
CREATE TABLE IF NOT EXISTS commits (
    project_id INTEGER NOT NULL,
    branch TEXT NOT NULL,
    sha TEXT NOT NULL,
    message TEXT,
    committed_date INTEGER NOT NULL,
    author_name TEXT,
    author_email TEXT,
    additions INTEGER NOT NULL DEFAULT 0 CHECK (additions >= 0),
    deletions INTEGER NOT NULL DEFAULT 0 CHECK (deletions >= 0),
    PRIMARY KEY (project_id, branch, sha)
);
"#,
    // Migration 3: range scans for listing and watermark recovery.
    r#"CREATE INDEX IF NOT EXISTS idx_commits_branch_date ON commits(project_id, branch, committed_date);"#,
    // Migration 4: per-branch collection watermark (exclusive resume
    // point). Row absence means "never collected".
    r#"
CREATE TABLE IF NOT EXISTS collection_watermarks (
    project_id INTEGER NOT NULL,
    branch TEXT NOT NULL,
    latest_committed_date INTEGER NOT NULL,
    PRIMARY KEY (project_id, branch),
    FOREIGN KEY (project_id) REFERENCES projects(id)
);
"#,
    // Migration 5: monthly per-author rollup, fully recomputed per
    // (project, branch). The cascade only fires on a manual hard delete
    // of a project; the pipeline itself never hard-deletes.
    r#"
CREATE TABLE IF NOT EXISTS author_monthly_aggregates (
    project_id INTEGER NOT NULL,
    branch TEXT NOT NULL,
    author_email TEXT NOT NULL,
    year INTEGER NOT NULL CHECK (year BETWEEN 1 AND 9999),
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    author_name TEXT,
    total_additions INTEGER NOT NULL DEFAULT 0 CHECK (total_additions >= 0),
    total_deletions INTEGER NOT NULL DEFAULT 0 CHECK (total_deletions >= 0),
    commit_count INTEGER NOT NULL DEFAULT 0 CHECK (commit_count >= 0),
    PRIMARY KEY (project_id, branch, author_email, year, month),
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);
"#,
];
