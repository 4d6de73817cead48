#![forbid(unsafe_code)]

//! Interactive terminal demo of wallet overlay orchestration.

pub mod app;
pub mod cli;
