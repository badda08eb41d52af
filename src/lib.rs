pub mod api;
pub mod db;
pub mod hub;
pub mod mcp;
