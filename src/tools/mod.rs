//! Tool abstractions and the built-in web search tool

pub mod function_factory;
pub mod serpapi;
pub mod tool;

pub use function_factory::FunctionFactory;
pub use serpapi::SerpApiTool;
pub use tool::{Tool, ToolFuture, ToolRegistry};
