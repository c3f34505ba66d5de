//! Database schema and migrations.
//!
//! Migrations are applied in order when the database is opened; the
//! `schema_version` table records which ones already ran.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name   TEXT NOT NULL,
    second_name  TEXT NOT NULL,
    email        TEXT NOT NULL UNIQUE,
    created_at   TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: correspondences and their member sets
    r#"
CREATE TABLE correspondences (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    admin_id    INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_correspondences_admin_id ON correspondences(admin_id);

-- The primary key makes "add member if absent" a single conditional write.
CREATE TABLE correspondence_members (
    correspondence_id  INTEGER NOT NULL REFERENCES correspondences(id) ON DELETE CASCADE,
    user_id            INTEGER NOT NULL REFERENCES users(id),
    joined_at          TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (correspondence_id, user_id)
);

CREATE INDEX idx_correspondence_members_user_id ON correspondence_members(user_id);
"#,
    // v3: messages
    r#"
CREATE TABLE messages (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    correspondence_id  INTEGER NOT NULL REFERENCES correspondences(id) ON DELETE CASCADE,
    sender_id          INTEGER NOT NULL REFERENCES users(id),
    text               TEXT NOT NULL,
    created_at         TEXT NOT NULL,
    is_edited          INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_messages_correspondence_id ON messages(correspondence_id);
CREATE INDEX idx_messages_sender_id ON messages(sender_id);
"#,
];
