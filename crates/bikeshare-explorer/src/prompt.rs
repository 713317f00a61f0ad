//! The interactive filter prompts.
//!
//! Generic over the input/output handles so tests can drive the loop with
//! in-memory buffers. Every prompt re-asks on invalid input without bound;
//! an exhausted input stream (EOF) is the only way out besides a valid
//! answer.

use std::io::{self, BufRead, Write};

use explorer_core::cities::CityRegistry;
use explorer_core::filters::{DayFilter, MonthFilter, FILTER_DAYS, FILTER_MONTHS};
use explorer_core::models::FilterSelection;
use tracing::debug;

/// Ask for a city, month and day until all three are valid.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn collect_filters<R: BufRead, W: Write>(
    registry: &CityRegistry,
    input: &mut R,
    output: &mut W,
) -> io::Result<FilterSelection> {
    writeln!(output, "Hello! Let's explore some US bikeshare data!")?;

    let city = loop {
        writeln!(
            output,
            "Please pick a city: {}.",
            registry.names().join(", ")
        )?;
        let line = read_line(input)?;
        match registry.resolve(&line) {
            Some(city) => break city.clone(),
            None => writeln!(
                output,
                "Oops! \"{}\" is not a city I know. Options: {}.",
                line.trim(),
                registry.names().join(", ")
            )?,
        }
    };

    let month = loop {
        writeln!(
            output,
            "Filter by month? all, {}.",
            FILTER_MONTHS.join(", ")
        )?;
        let line = read_line(input)?;
        match MonthFilter::parse(&line) {
            Some(month) => break month,
            None => writeln!(
                output,
                "Oops! \"{}\" is not a valid month. Options: all, {}.",
                line.trim(),
                FILTER_MONTHS.join(", ")
            )?,
        }
    };

    let day = loop {
        writeln!(output, "Filter by day? all, {}.", FILTER_DAYS.join(", "))?;
        let line = read_line(input)?;
        match DayFilter::parse(&line) {
            Some(day) => break day,
            None => writeln!(
                output,
                "Oops! \"{}\" is not a valid day. Options: all, {}.",
                line.trim(),
                FILTER_DAYS.join(", ")
            )?,
        }
    };

    writeln!(output, "{}", "-".repeat(40))?;
    debug!("Selected city={} month={} day={}", city.name, month, day);

    Ok(FilterSelection { city, month, day })
}

/// Ask whether to run another round. Only a case-insensitive `"yes"`
/// restarts; anything else (including EOF) ends the session.
pub fn prompt_restart<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    writeln!(output, "\nWould you like to restart? Enter yes or no.")?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}

/// Read one line, erroring on EOF so the validation loops cannot spin
/// forever on a closed input stream.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input stream closed during prompt",
        ));
    }
    Ok(line)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::filters::{DayFilter, MonthFilter};
    use std::io::Cursor;
    use std::path::Path;

    fn registry() -> CityRegistry {
        CityRegistry::new(Path::new("/data"))
    }

    fn collect(input: &str) -> io::Result<FilterSelection> {
        let mut output = Vec::new();
        collect_filters(&registry(), &mut Cursor::new(input), &mut output)
    }

    // ── collect_filters ───────────────────────────────────────────────────────

    #[test]
    fn test_happy_path() {
        let selection = collect("chicago\nmarch\nmonday\n").unwrap();
        assert_eq!(selection.city.name, "chicago");
        assert_eq!(selection.month, MonthFilter::Month(3));
        assert_eq!(selection.day, DayFilter::Day(0));
    }

    #[test]
    fn test_all_filters() {
        let selection = collect("washington\nall\nall\n").unwrap();
        assert_eq!(selection.city.name, "washington");
        assert_eq!(selection.month, MonthFilter::All);
        assert_eq!(selection.day, DayFilter::All);
    }

    #[test]
    fn test_case_insensitive_input() {
        let selection = collect("CHICAGO\nMaRcH\nSUNDAY\n").unwrap();
        assert_eq!(selection.city.name, "chicago");
        assert_eq!(selection.month, MonthFilter::Month(3));
        assert_eq!(selection.day, DayFilter::Day(6));
    }

    #[test]
    fn test_reprompts_until_valid() {
        let mut output = Vec::new();
        let selection = collect_filters(
            &registry(),
            &mut Cursor::new("boston\nparis\nnew york city\njuly\nall\nfunday\nsunday\n"),
            &mut output,
        )
        .unwrap();

        assert_eq!(selection.city.name, "new york city");
        assert_eq!(selection.month, MonthFilter::All);
        assert_eq!(selection.day, DayFilter::Day(6));

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("\"boston\" is not a city I know"));
        assert!(transcript.contains("\"july\" is not a valid month"));
        assert!(transcript.contains("\"funday\" is not a valid day"));
    }

    #[test]
    fn test_eof_mid_prompt_is_an_error() {
        let err = collect("chicago\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_greeting_and_separator_are_printed() {
        let mut output = Vec::new();
        collect_filters(
            &registry(),
            &mut Cursor::new("chicago\nall\nall\n"),
            &mut output,
        )
        .unwrap();
        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.starts_with("Hello! Let's explore some US bikeshare data!"));
        assert!(transcript.contains(&"-".repeat(40)));
    }

    // ── prompt_restart ────────────────────────────────────────────────────────

    #[test]
    fn test_restart_yes() {
        let mut output = Vec::new();
        assert!(prompt_restart(&mut Cursor::new("yes\n"), &mut output).unwrap());
        assert!(prompt_restart(&mut Cursor::new("YES\n"), &mut output).unwrap());
        assert!(prompt_restart(&mut Cursor::new("  Yes \n"), &mut output).unwrap());
    }

    #[test]
    fn test_restart_anything_else_is_no() {
        let mut output = Vec::new();
        assert!(!prompt_restart(&mut Cursor::new("no\n"), &mut output).unwrap());
        assert!(!prompt_restart(&mut Cursor::new("y\n"), &mut output).unwrap());
        assert!(!prompt_restart(&mut Cursor::new("\n"), &mut output).unwrap());
    }

    #[test]
    fn test_restart_eof_is_no() {
        let mut output = Vec::new();
        assert!(!prompt_restart(&mut Cursor::new(""), &mut output).unwrap());
    }
}
