//! CLI subcommand implementations.

pub mod history;
pub mod login;
pub mod lookup;
pub mod qr;
pub mod register;
pub mod stats;
pub mod status;
pub mod verify;
