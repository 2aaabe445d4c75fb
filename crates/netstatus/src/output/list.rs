//! `list` output.

use std::io::Write;

use super::{OutputOptions, Printable, json_value, operational_color, or_na, setup_color};
use crate::status::LinkSummary;

/// The interface list with its legend.
pub struct LinkListing<'a>(pub &'a [LinkSummary]);

impl Printable for LinkListing<'_> {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        if opts.legend {
            writeln!(
                w,
                "{:>3} {:<16} {:<18} {:<11} {:<10}",
                "IDX", "LINK", "TYPE", "OPERATIONAL", "SETUP"
            )?;
        }

        for link in self.0 {
            let (oper_on, oper_off) = operational_color(link.operational.as_ref(), opts);
            let (setup_on, setup_off) = setup_color(link.setup.as_ref(), opts);
            writeln!(
                w,
                "{:>3} {:<16} {:<18} {}{:<11}{} {}{:<10}{}",
                link.index,
                link.name,
                or_na(link.link_type.as_ref()),
                oper_on,
                or_na(link.operational.as_ref()),
                oper_off,
                setup_on,
                or_na(link.setup.as_ref()),
                setup_off,
            )?;
        }

        if opts.legend {
            writeln!(w, "\n{} links listed.", self.0.len())?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        json_value(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use crate::state::{OperationalState, SetupState};

    fn links() -> Vec<LinkSummary> {
        vec![
            LinkSummary {
                index: 1,
                name: "lo".into(),
                link_type: Some("loopback".into()),
                operational: Some(OperationalState::Other("carrier".into())),
                setup: Some(SetupState::Other("unmanaged".into())),
            },
            LinkSummary {
                index: 2,
                name: "eth0".into(),
                link_type: Some("ether".into()),
                operational: Some(OperationalState::Routable),
                setup: Some(SetupState::Configured),
            },
            LinkSummary {
                index: 3,
                name: "veth0".into(),
                link_type: None,
                operational: None,
                setup: None,
            },
        ]
    }

    fn render(opts: &OutputOptions) -> String {
        let links = links();
        let mut out = Vec::new();
        LinkListing(&links).print_text(&mut out, opts).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list_text() {
        let text = render(&OutputOptions::default());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "IDX LINK             TYPE               OPERATIONAL SETUP     "
        );
        assert_eq!(
            lines[2],
            "  2 eth0             ether              routable    configured"
        );
        assert_eq!(
            lines[3],
            "  3 veth0            n/a                n/a         n/a       "
        );
        assert_eq!(lines[5], "3 links listed.");
    }

    #[test]
    fn test_list_no_legend_color() {
        let text = render(&OutputOptions {
            color: true,
            legend: false,
            pretty: false,
        });
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("\x1b[1;32mroutable   \x1b[0m \x1b[1;32mconfigured\x1b[0m"));
    }

    #[test]
    fn test_list_json() {
        let links = links();
        let mut out = Vec::new();
        LinkListing(&links)
            .print(&mut out, OutputFormat::Json, &OutputOptions::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[1]["name"], "eth0");
        assert_eq!(value[1]["type"], "ether");
        assert_eq!(value[1]["operational"], "routable");
        assert!(value[2]["setup"].is_null());
    }
}
