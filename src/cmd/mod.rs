pub mod config_cmd;
pub mod flags;
pub mod message;
pub mod strip;
