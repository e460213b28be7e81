/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// All statements use `IF NOT EXISTS` so they are safe to re-run on every
/// startup (idempotent).
///
/// `memory_limit` is passed at runtime from `Config.duckdb_memory_limit`
/// (env `PAGETALLY_DUCKDB_MEMORY`, default `"1GB"`).
///
/// Only `visits` belongs to the analytics pipeline. `settings`, `posts` and
/// `pages` are the CRUD subsystem's tables; they are declared here so the
/// catalog and settings lookups have something to read and so the entry
/// breakdown can join titles in one query.
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- SETTINGS
-- ===========================================
-- Keys read by the analytics pipeline:
--   'site.utc_offset' – e.g. '+07:00'; missing or unparsable means UTC
CREATE TABLE IF NOT EXISTS settings (
    key             VARCHAR PRIMARY KEY,
    value           VARCHAR
);

-- ===========================================
-- CONTENT CATALOG
-- ===========================================
CREATE TABLE IF NOT EXISTS posts (
    id              BIGINT PRIMARY KEY,
    title           VARCHAR NOT NULL,
    slug            VARCHAR NOT NULL UNIQUE,
    state           VARCHAR NOT NULL DEFAULT 'draft',   -- 'draft' | 'published'
    published_at    TIMESTAMP,
    content         VARCHAR NOT NULL DEFAULT '',
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS pages (
    id              BIGINT PRIMARY KEY,
    title           VARCHAR NOT NULL,
    slug            VARCHAR NOT NULL UNIQUE,
    state           VARCHAR NOT NULL DEFAULT 'draft',
    published_at    TIMESTAMP,
    content         VARCHAR NOT NULL DEFAULT '',
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- ===========================================
-- VISITS (append-only analytics log)
-- ===========================================
-- One row per (entry, site-local date, network address). The primary key on
-- visit_hash is the dedup guarantee: writers use
-- INSERT ... ON CONFLICT (visit_hash) DO NOTHING, never check-then-insert.
CREATE TABLE IF NOT EXISTS visits (
    visit_hash      VARCHAR PRIMARY KEY,           -- sha256("{{identity}}-{{date}}-{{ip}}")

    -- Entry identity: catalog id XOR (name, path)
    entry_id        BIGINT,
    entry_type      VARCHAR NOT NULL,              -- 'post' | 'page' | 'none'
    entry_name      VARCHAR,
    entry_path      VARCHAR,

    -- Audience
    browser         VARCHAR NOT NULL,
    device          VARCHAR NOT NULL,
    country         VARCHAR,                       -- English country name
    referer         VARCHAR,                       -- 'scheme://host[:port]/'

    visit_date      DATE NOT NULL,                 -- site-local date
    visitor_id      VARCHAR NOT NULL,              -- sha256(ip)
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,

    CHECK ((entry_id IS NULL) = (entry_type = 'none')),
    CHECK ((entry_id IS NULL) = (entry_path IS NOT NULL)),
    CHECK ((entry_name IS NULL) = (entry_path IS NULL))
);

-- Every report query filters on the date range.
CREATE INDEX IF NOT EXISTS idx_visits_date
    ON visits(visit_date);
"#
    )
}
