mod repository;

pub use repository::*;

/// SQL migration for initial schema
pub const MIGRATION_001_MEMOS: &str = include_str!("migrations/001_memos.sql");
