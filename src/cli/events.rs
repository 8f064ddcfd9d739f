//! CLI command for fetching and listing earthquakes near a region.

use std::io::{self, Write};

use crate::config::QuakelensConfig;
use crate::models::SeismicEvent;
use crate::services::EventFeed;
use crate::state::EventStore;
use crate::storage::FileStore;
use crate::Error;

/// Writes the event collection as a table to the given writer.
///
/// Rows carry the collection index so other commands can refer to events
/// by position.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_events<W: Write>(writer: &mut W, events: &[SeismicEvent]) -> io::Result<()> {
    if events.is_empty() {
        writeln!(writer, "No earthquakes found.")?;
        return Ok(());
    }
    writeln!(
        writer,
        "{:<5}{:<16}{:<6}{:<12}{:<20}LOCATION",
        "#", "EVENT", "MAG", "DATE", "EPICENTER (LON, LAT)"
    )?;
    for (index, event) in events.iter().enumerate() {
        let epicenter = format!(
            "{:.2}, {:.2}",
            event.location.longitude, event.location.latitude
        );
        writeln!(
            writer,
            "{index:<5}{:<16}{:<6.1}{:<12}{epicenter:<20}{}",
            event.id,
            event.magnitude,
            event.occurred_at.format("%Y-%m-%d"),
            event.description
        )?;
    }
    Ok(())
}

/// Applies per-invocation feed overrides on top of the configuration.
fn feed_config(
    config: &QuakelensConfig,
    radius_km: Option<f64>,
    min_magnitude: Option<f64>,
) -> QuakelensConfig {
    let mut effective = config.clone();
    if let Some(radius_km) = radius_km {
        effective = effective.with_radius_km(radius_km);
    }
    if let Some(min_magnitude) = min_magnitude {
        effective = effective.with_min_magnitude(min_magnitude);
    }
    effective
}

/// Executes the events command.
///
/// `radius_km` and `min_magnitude` override the configured values for this
/// invocation only.
///
/// # Errors
///
/// Returns an error when the region is unknown, the durable store cannot
/// be opened, or output fails. Provider failures are downgraded inside the
/// feed and show up as an empty list.
pub async fn cmd_events(
    config: &QuakelensConfig,
    region_name: Option<&str>,
    radius_km: Option<f64>,
    min_magnitude: Option<f64>,
    no_cache: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = feed_config(config, radius_km, min_magnitude);
    let name = region_name.unwrap_or(&config.default_region);
    let region = config
        .find_region(name)
        .ok_or_else(|| Error::Validation(format!("unknown region: {name}")))?
        .clone();

    let store = FileStore::with_create(&config.data_dir)?;
    let feed = EventFeed::new(&config, store);
    let mut events = EventStore::new();
    let merged = feed.refresh(&region, &mut events, !no_cache).await?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(
        handle,
        "Earthquakes within {:.0} km of {} (magnitude {:.1}+):",
        config.radius_km, region.name, config.min_magnitude
    )?;
    writeln!(handle)?;
    write_events(&mut handle, &merged)?;
    Ok(())
}
