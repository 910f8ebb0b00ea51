// MCP server exposing the task commands as tools

pub mod tools;

pub use tools::TaskdeckServer;
