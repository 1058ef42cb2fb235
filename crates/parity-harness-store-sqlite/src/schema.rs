// crates/parity-harness-store-sqlite/src/schema.rs
// ============================================================================
// Module: Fixture Schema
// Description: DDL for the seven fixture tables.
// Purpose: Give the embedded store the keys provisioning upserts rely on.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Conflict targets used by the upsert policies must be backed by a primary
//! key or unique constraint: `users.subject_id`, every entity `id`, and the
//! `(entity, user)` pair of both membership tables. Foreign keys are not
//! cascading, so owners cannot be deleted while dependents remain.

/// Fixture tables in dependency order (owners before dependents).
pub const FIXTURE_TABLES: [&str; 7] = [
    "users",
    "organizations",
    "projects",
    "documents",
    "chunks",
    "project_memberships",
    "organization_memberships",
];

/// DDL creating the fixture tables when absent.
pub const FIXTURE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    subject_id TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS organizations (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL REFERENCES organizations (id),
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects (id),
    filename TEXT NOT NULL,
    content TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL REFERENCES documents (id),
    chunk_index INTEGER NOT NULL,
    text TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_chunks_document_id ON chunks (document_id);
CREATE TABLE IF NOT EXISTS project_memberships (
    project_id TEXT NOT NULL REFERENCES projects (id),
    user_id TEXT NOT NULL REFERENCES users (id),
    role TEXT NOT NULL,
    PRIMARY KEY (project_id, user_id)
);
CREATE TABLE IF NOT EXISTS organization_memberships (
    organization_id TEXT NOT NULL REFERENCES organizations (id),
    user_id TEXT NOT NULL REFERENCES users (id),
    role TEXT NOT NULL,
    PRIMARY KEY (organization_id, user_id)
);
";
