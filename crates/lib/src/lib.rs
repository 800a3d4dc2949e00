//! DeenGPT core library: config, the chat service client, and the dispatcher
//! shared by the CLI and desktop applications.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod init;
pub mod view;

pub use client::{ChatClient, ChatError, ChatReply};
pub use dispatch::Dispatcher;
pub use view::{MessageSource, ResponseView, TextField};
