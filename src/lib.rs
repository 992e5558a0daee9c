// Library exports for the scroller agent
// The search core is usable on its own; the agent, bot, logging and replay
// modules are the glue the server and the analysis tools share.

pub mod agent;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod frontier;
pub mod node;
pub mod replay;
pub mod search;
pub mod types;
