//! Text and JSON presentation of reports.

mod list;
mod lldp;
mod status;

pub use list::LinkListing;
pub use lldp::LldpListing;

use std::fmt::Display;
use std::io::Write;

use serde::Serialize;

use crate::state::{OperationalState, SetupState};

/// Output format options.
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Use colored output.
    pub color: bool,
    /// Print headers and footers.
    pub legend: bool,
    /// Pretty print (for JSON).
    pub pretty: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            color: false,
            legend: true,
            pretty: false,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// Trait for types that can be printed.
pub trait Printable {
    /// Print as plain text.
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()>;

    /// Convert to JSON value.
    fn to_json(&self) -> serde_json::Value;

    /// Print in the specified format.
    fn print<W: Write>(
        &self,
        w: &mut W,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> std::io::Result<()> {
        match format {
            OutputFormat::Text => self.print_text(w, opts),
            OutputFormat::Json => {
                let json = self.to_json();
                if opts.pretty {
                    serde_json::to_writer_pretty(&mut *w, &json)?;
                } else {
                    serde_json::to_writer(&mut *w, &json)?;
                }
                writeln!(w)?;
                Ok(())
            }
        }
    }
}

/// ANSI escape sequences.
mod ansi {
    pub const GREEN: &str = "\x1b[1;32m";
    pub const YELLOW: &str = "\x1b[1;33m";
    pub const RED: &str = "\x1b[1;31m";
    pub const RESET: &str = "\x1b[0m";
}

/// Status marker in front of report headings.
const BLACK_CIRCLE: &str = "●";

/// Placeholder for missing values.
const NA: &str = "n/a";

/// Color on/off sequences for an operational state.
fn operational_color(
    state: Option<&OperationalState>,
    opts: &OutputOptions,
) -> (&'static str, &'static str) {
    if !opts.color {
        return ("", "");
    }
    match state {
        Some(OperationalState::Routable) => (ansi::GREEN, ansi::RESET),
        Some(OperationalState::Degraded) => (ansi::YELLOW, ansi::RESET),
        _ => ("", ""),
    }
}

/// Color on/off sequences for a setup state.
fn setup_color(state: Option<&SetupState>, opts: &OutputOptions) -> (&'static str, &'static str) {
    if !opts.color {
        return ("", "");
    }
    match state {
        Some(SetupState::Configured) => (ansi::GREEN, ansi::RESET),
        Some(SetupState::Configuring) => (ansi::YELLOW, ansi::RESET),
        Some(SetupState::Failed | SetupState::Linger) => (ansi::RED, ansi::RESET),
        _ => ("", ""),
    }
}

/// Serialize a report for JSON output, logging values serde rejects.
fn json_value<T: Serialize + ?Sized>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize output: {}", e);
        serde_json::Value::Null
    })
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

/// Write one value per line, the label only on the first.
fn write_list<W, I>(w: &mut W, label: &str, items: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: Display,
{
    for (i, item) in items.into_iter().enumerate() {
        if i == 0 {
            writeln!(w, "{}{}", label, item)?;
        } else {
            writeln!(w, "{:width$}{}", "", item, width = label.chars().count())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_list() {
        let mut out = Vec::new();
        write_list(&mut out, "    DNS: ", ["1.1.1.1", "9.9.9.9"]).unwrap();
        write_list(&mut out, "    NTP: ", Vec::<String>::new()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "    DNS: 1.1.1.1\n         9.9.9.9\n"
        );
    }

    #[test]
    fn test_json_value() {
        struct Unserializable;

        impl Serialize for Unserializable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not representable"))
            }
        }

        assert_eq!(json_value(&Unserializable), serde_json::Value::Null);
        assert_eq!(json_value(&[1, 2]), serde_json::json!([1, 2]));
    }

    #[test]
    fn test_colors() {
        let plain = OutputOptions::default();
        let color = OutputOptions {
            color: true,
            ..plain
        };
        assert_eq!(
            operational_color(Some(&OperationalState::Routable), &plain),
            ("", "")
        );
        assert_eq!(
            operational_color(Some(&OperationalState::Routable), &color),
            (ansi::GREEN, ansi::RESET)
        );
        assert_eq!(
            operational_color(Some(&OperationalState::Other("off".into())), &color),
            ("", "")
        );
        assert_eq!(
            setup_color(Some(&SetupState::Linger), &color),
            (ansi::RED, ansi::RESET)
        );
        assert_eq!(setup_color(None, &color), ("", ""));
    }
}
