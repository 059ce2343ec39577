// src/db/mod.rs
//
// SQLite storage: pooled connections and versioned schema

pub mod connection;
pub mod migrations;

pub use connection::{
    create_connection_pool, create_memory_pool, default_database_path, get_connection,
    ConnectionPool, PooledConn,
};

pub use migrations::{
    get_database_stats, initialize_database, latest_schema_version, schema_version,
    verify_database_integrity, DatabaseStats,
};
