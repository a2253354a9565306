pub mod changes;
pub mod cli;
pub mod config;
pub mod notify;
pub mod poller;
pub mod source;
pub mod status;
pub mod watermark;
