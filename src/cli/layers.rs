//! CLI commands for the layer working set.

use std::io::{self, Write};

use crate::config::QuakelensConfig;
use crate::models::{parse_filename, Layer, SelectionSet};
use crate::services::LayerSync;
use crate::state::LayerRegistry;
use crate::storage::FileStore;
use crate::Error;

/// Writes the working set as a table to the given writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_layers<W: Write>(
    writer: &mut W,
    layers: &[Layer],
    selected: &SelectionSet,
) -> io::Result<()> {
    if layers.is_empty() {
        writeln!(writer, "No layers in the working set.")?;
        return Ok(());
    }
    writeln!(
        writer,
        "{:<30}{:<16}{:<10}SELECTED",
        "FILENAME", "EVENT", "PAYLOAD"
    )?;
    for layer in layers {
        let payload = if layer.is_populated() { "ready" } else { "pending" };
        let marker = if selected.contains(&layer.filename) {
            "*"
        } else {
            ""
        };
        writeln!(
            writer,
            "{:<30}{:<16}{payload:<10}{marker}",
            layer.filename, layer.event_id
        )?;
    }
    Ok(())
}

fn open_registry(config: &QuakelensConfig) -> Result<LayerRegistry<FileStore>, Error> {
    Ok(LayerRegistry::load(FileStore::with_create(
        &config.data_dir,
    )?))
}

/// Executes the layers list command.
///
/// # Errors
///
/// Returns an error when the durable store cannot be opened or output
/// fails.
pub fn cmd_layers_list(config: &QuakelensConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = open_registry(config)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_layers(&mut handle, &registry.snapshot(), &registry.selection())?;
    Ok(())
}

/// Executes the layers add command.
///
/// The event is recovered from the filename convention, so only product
/// filenames can be added.
///
/// # Errors
///
/// Returns an error when the filename does not follow the convention or
/// persistence fails.
pub fn cmd_layers_add(
    config: &QuakelensConfig,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let parts = parse_filename(filename).ok_or_else(|| {
        Error::Validation(format!(
            "filename does not follow the product convention: {filename}"
        ))
    })?;

    let mut registry = open_registry(config)?;
    let added = registry.add(Layer::new(parts.event_id, filename))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if added {
        writeln!(handle, "Added layer: {filename}")?;
    } else {
        writeln!(handle, "Layer already in working set: {filename}")?;
    }
    Ok(())
}

/// Executes the layers select command.
///
/// Selecting also fetches the layer payload when it has not arrived yet;
/// a failed fetch leaves the layer selected but pending.
///
/// # Errors
///
/// Returns an error when the layer is unknown or persistence fails.
pub async fn cmd_layers_select(
    config: &QuakelensConfig,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = open_registry(config)?;
    registry.select(filename)?;

    let sync = LayerSync::new(config);
    let fetched = sync.ensure_fetched(&mut registry, filename).await?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "Selected layer: {filename}")?;
    if fetched {
        writeln!(handle, "Fetched layer payload.")?;
    } else if !registry.get(filename).is_some_and(Layer::is_populated) {
        writeln!(handle, "Payload not available yet; will retry on next select.")?;
    }
    Ok(())
}

/// Executes the layers deselect command.
///
/// # Errors
///
/// Returns an error when persistence or output fails.
pub fn cmd_layers_deselect(
    config: &QuakelensConfig,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = open_registry(config)?;
    let removed = registry.deselect(filename)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if removed {
        writeln!(handle, "Deselected layer: {filename}")?;
    } else {
        writeln!(handle, "Layer was not selected: {filename}")?;
    }
    Ok(())
}
