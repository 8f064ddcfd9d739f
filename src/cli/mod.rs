//! CLI command implementations.
//!
//! Each submodule implements one command of the dashboard CLI.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `regions` | List the monitored region catalog |
//! | `events` | Fetch and list earthquakes near a region |
//! | `request` | Request an analysis product for an event |
//! | `tasks` | Show the requested-analysis worklist |
//! | `layers` | Manage the layer working set and its selection |
//!
//! Output goes through `Write` so the rendering is testable; commands lock
//! stdout themselves.

mod events;
mod layers;
mod regions;
mod request;
mod tasks;

pub use events::{cmd_events, write_events};
pub use layers::{
    cmd_layers_add, cmd_layers_deselect, cmd_layers_list, cmd_layers_select, write_layers,
};
pub use regions::{cmd_regions, write_regions};
pub use request::cmd_request;
pub use tasks::{cmd_tasks, write_tasks};
