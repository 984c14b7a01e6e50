//! Model Context Protocol server
//!
//! JSON-RPC 2.0 targeting MCP protocol revision 2024-11-05, served either over
//! newline-delimited stdio or over HTTP with Server-Sent Events. The tools and
//! logging capabilities are offered.

pub mod notify;
pub mod protocol;
pub mod server;
pub mod sse;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, LoggingLevel, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use sse::{serve_sse, serve_sse_on};
pub use transport::{serve, serve_stdio};
