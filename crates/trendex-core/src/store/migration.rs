use crate::error::Result;

use super::SqliteCorpusStore;

const MIGRATION_SCHEMA_SQL: &str = r"
    PRAGMA journal_mode = WAL;
    PRAGMA foreign_keys = OFF;

    CREATE TABLE IF NOT EXISTS topics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        s TEXT NOT NULL UNIQUE,
        prefLabel TEXT NOT NULL,
        altLabel TEXT,
        description TEXT,
        broader TEXT,
        level INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_topics_s ON topics(s);
    CREATE INDEX IF NOT EXISTS idx_topics_prefLabel ON topics(prefLabel);
    CREATE INDEX IF NOT EXISTS idx_topics_broader ON topics(broader);
    CREATE INDEX IF NOT EXISTS idx_topics_level ON topics(level);

    CREATE TABLE IF NOT EXISTS papers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        categories TEXT,
        abstract TEXT,
        submission_date TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS tagged_papers (
        url TEXT NOT NULL,
        date TEXT NOT NULL,
        title TEXT NOT NULL,
        abstract TEXT,
        topic1 TEXT,
        topic2 TEXT,
        topic3 TEXT,
        topic4 TEXT,
        topic5 TEXT,
        FOREIGN KEY (url) REFERENCES papers (url)
    );

    CREATE INDEX IF NOT EXISTS idx_tagged_papers_date ON tagged_papers(date);
    CREATE INDEX IF NOT EXISTS idx_tagged_papers_topic1 ON tagged_papers(topic1);
    CREATE INDEX IF NOT EXISTS idx_tagged_papers_topic2 ON tagged_papers(topic2);
    CREATE INDEX IF NOT EXISTS idx_tagged_papers_topic3 ON tagged_papers(topic3);
    CREATE INDEX IF NOT EXISTS idx_tagged_papers_topic4 ON tagged_papers(topic4);
    CREATE INDEX IF NOT EXISTS idx_tagged_papers_topic5 ON tagged_papers(topic5);

    CREATE TABLE IF NOT EXISTS topic_descendants (
        topic TEXT NOT NULL,
        descendant TEXT NOT NULL,
        PRIMARY KEY (topic, descendant)
    );
";

impl SqliteCorpusStore {
    pub(super) fn migrate(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(MIGRATION_SCHEMA_SQL)?;
            Ok(())
        })
    }
}
