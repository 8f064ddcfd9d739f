//! CLI command for the requested-analysis worklist.

use std::io::{self, Write};

use crate::config::QuakelensConfig;
use crate::models::Task;
use crate::services::AnalysisDesk;

/// Writes the worklist as a table to the given writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_tasks<W: Write>(writer: &mut W, tasks: &[Task]) -> io::Result<()> {
    if tasks.is_empty() {
        writeln!(writer, "No analysis requests yet.")?;
        return Ok(());
    }
    writeln!(
        writer,
        "{:<30}{:<16}{:<10}{:<12}STATUS",
        "FILENAME", "EVENT", "ANALYSIS", "DATE"
    )?;
    for task in tasks {
        writeln!(
            writer,
            "{:<30}{:<16}{:<10}{:<12}{}",
            task.filename, task.event_id, task.analysis, task.date, task.status
        )?;
    }
    Ok(())
}

/// Executes the tasks command.
///
/// # Errors
///
/// Returns an error when the worklist fetch or output fails.
pub async fn cmd_tasks(config: &QuakelensConfig) -> Result<(), Box<dyn std::error::Error>> {
    let desk = AnalysisDesk::new(config);
    let tasks = desk.worklist().await?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_tasks(&mut handle, &tasks)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventId, TaskStatus};

    fn sample() -> Vec<Task> {
        vec![Task {
            event_id: EventId::new("us7000m9g4"),
            location: "Nepal".to_string(),
            latitude: 28.1,
            longitude: 85.2,
            filename: "us7000m9g4-earthquake-intf".to_string(),
            event_kind: "earthquake".to_string(),
            analysis: "intf".to_string(),
            date: "2026-03-01".to_string(),
            status: TaskStatus::Processing,
        }]
    }

    #[test]
    fn test_write_tasks_table() {
        let mut buffer = Vec::new();
        write_tasks(&mut buffer, &sample()).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("FILENAME"));
        assert!(output.contains("us7000m9g4-earthquake-intf"));
        assert!(output.contains("processing"));
    }

    #[test]
    fn test_write_tasks_empty() {
        let mut buffer = Vec::new();
        write_tasks(&mut buffer, &[]).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("No analysis requests yet."));
    }
}
