//! The session loop: prompt, load, report, maybe restart.
//!
//! One iteration owns its trip table exclusively; nothing is cached or
//! carried across iterations.

use std::io::{BufRead, Write};
use std::time::Instant;

use explorer_core::cities::CityRegistry;
use explorer_core::error::Result;
use explorer_core::formatting::format_count;
use explorer_data::reader::load_trip_table;
use explorer_data::reports::{DurationStats, StationStats, TimeStats, UserStats};
use tracing::info;

use crate::prompt;

/// Run the interactive session until the user declines a restart.
///
/// Dataset errors are fatal and propagate; invalid prompt answers never
/// reach this level (the prompt loop re-asks).
pub fn run<R: BufRead, W: Write>(
    registry: &CityRegistry,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    loop {
        let selection = prompt::collect_filters(registry, input, output)?;

        let started = Instant::now();
        let table = load_trip_table(&selection)?;
        info!(
            "Loaded {} trips for {} in {:.3}s",
            table.len(),
            selection.city.name,
            started.elapsed().as_secs_f64()
        );
        writeln!(
            output,
            "{} trips match your selection.",
            format_count(table.len() as u64)
        )?;

        render_section(output, "Calculating The Most Frequent Times of Travel...", || {
            TimeStats::compute(&table)
        })?;
        render_section(output, "Calculating The Most Popular Stations and Trip...", || {
            StationStats::compute(&table)
        })?;
        render_section(output, "Calculating Trip Duration...", || {
            DurationStats::compute(&table)
        })?;
        render_section(output, "Calculating User Stats...", || {
            UserStats::compute(&table)
        })?;

        if !prompt::prompt_restart(input, output)? {
            return Ok(());
        }
    }
}

/// Print one report section: header, the timed computation, elapsed time
/// and a separator rule.
fn render_section<W: Write, T: std::fmt::Display>(
    output: &mut W,
    header: &str,
    compute: impl FnOnce() -> T,
) -> std::io::Result<()> {
    writeln!(output, "\n{}\n", header)?;

    let started = Instant::now();
    let report = compute();
    let elapsed = started.elapsed().as_secs_f64();

    write!(output, "{}", report)?;
    writeln!(output, "\nThis took {:.4} seconds.", elapsed)?;
    writeln!(output, "{}", "-".repeat(40))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
