pub mod account;
pub mod badges;
pub mod config;
pub mod focus;
pub mod profile;
pub mod task;

use focusflow_core::{Config, FileBackend, Store};
use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the state store in the data directory.
pub fn open_store(config: &Config) -> Result<Store<FileBackend>, Box<dyn std::error::Error>> {
    let backend = FileBackend::open()?;
    Ok(Store::with_backend(backend).pretty(config.storage.pretty))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
