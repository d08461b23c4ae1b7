//! Switchboard CLI

pub mod commands;
