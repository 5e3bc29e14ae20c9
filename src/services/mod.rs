//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own browser-session lifecycle and the extraction run so
//! route handlers can stay focused on request validation and status mapping.

pub mod extraction;
