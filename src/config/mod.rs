//! Configuration modules.
//!
//! Each submodule loads one concern from environment variables at process
//! start; the resulting structs are assembled into [`crate::state::AppState`]
//! once and passed by reference from there. No process-wide mutable globals.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `JWT_SECRET`: token signing secret
//! - `TOKEN_EXPIRE_MINUTES`: access token TTL, default 1440
//! - `ALLOWED_ORIGINS`: comma-separated CORS origins
//! - `PORT`: listen port, default 3000

pub mod cors;
pub mod database;
pub mod jwt;
