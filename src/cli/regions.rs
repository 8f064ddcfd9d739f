//! CLI command for listing the region catalog.

use std::io::{self, Write};

use crate::config::QuakelensConfig;

/// Writes the region catalog as a table to the given writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_regions<W: Write>(writer: &mut W, config: &QuakelensConfig) -> io::Result<()> {
    writeln!(
        writer,
        "{:<12}{:<22}{:<34}DEFAULT",
        "REGION", "CENTER (LON, LAT)", "BOUNDS (LAT, LON)"
    )?;
    for region in &config.regions {
        let center = format!("{:.1}, {:.1}", region.center.longitude, region.center.latitude);
        let bounds = format!(
            "{:.1}..{:.1}, {:.1}..{:.1}",
            region.bounds.min_latitude,
            region.bounds.max_latitude,
            region.bounds.min_longitude,
            region.bounds.max_longitude
        );
        let default = if region.name.eq_ignore_ascii_case(&config.default_region) {
            "*"
        } else {
            ""
        };
        writeln!(writer, "{:<12}{center:<22}{bounds:<34}{default}", region.name)?;
    }
    Ok(())
}

/// Executes the regions command.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn cmd_regions(config: &QuakelensConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_regions(&mut handle, config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_regions_lists_catalog() {
        let config = QuakelensConfig::default();
        let mut buffer = Vec::new();
        write_regions(&mut buffer, &config).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("REGION"));
        assert!(output.contains("nepal"));
        assert!(output.contains("mexico"));
    }

    #[test]
    fn test_write_regions_marks_default() {
        let config = QuakelensConfig::default();
        let mut buffer = Vec::new();
        write_regions(&mut buffer, &config).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let nepal_line = output.lines().find(|l| l.starts_with("nepal")).unwrap();
        assert!(nepal_line.trim_end().ends_with('*'));
    }
}
