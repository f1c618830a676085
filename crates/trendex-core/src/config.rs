use std::path::{Path, PathBuf};

/// Environment override for the corpus database location.
pub const DB_ENV_VAR: &str = "TRENDEX_DB";

/// Default database filename under the workspace root.
pub const DB_FILE_NAME: &str = "trendex.db";

/// Resolve the corpus database path: `TRENDEX_DB` wins when set and
/// non-empty, otherwise `<root>/trendex.db`.
#[must_use]
pub fn resolve_db_path(root: &Path) -> PathBuf {
    resolve_db_path_from(read_non_empty_env(DB_ENV_VAR), root)
}

fn resolve_db_path_from(env_override: Option<String>, root: &Path) -> PathBuf {
    env_override
        .map(PathBuf::from)
        .unwrap_or_else(|| root.join(DB_FILE_NAME))
}

fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}
