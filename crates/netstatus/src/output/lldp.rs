//! `lldp` output.

use std::io::Write;

use super::{OutputOptions, Printable, json_value, or_na};
use crate::lldp::capabilities_to_string;
use crate::status::LldpEntry;

const CAPABILITY_LEGEND: &str = "\
Capabilities:
o - Other; p - Repeater;  b - Bridge; w - WLAN Access Point; r - Router;
t - Telephone; d - DOCSIS cable device; a - Station; c - Customer VLAN;
s - Service VLAN, m - Two-port MAC Relay (TPMR)";

/// LLDP neighbors of all links.
pub struct LldpListing<'a>(pub &'a [LldpEntry]);

impl Printable for LldpListing<'_> {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        if opts.legend {
            writeln!(
                w,
                "{:<16} {:<17} {:<16} {:<11} {:<17} {:<16}",
                "LINK", "CHASSIS ID", "SYSTEM NAME", "CAPS", "PORT ID", "PORT DESCRIPTION"
            )?;
        }

        let mut printed = 0;
        for entry in self.0 {
            let n = &entry.neighbor;
            writeln!(
                w,
                "{:<16} {:<17} {:<16} {:<11} {:<17} {:<16}",
                entry.link,
                n.chassis_id,
                or_na(n.system_name.as_ref()),
                or_na(n.enabled_capabilities.map(capabilities_to_string)),
                n.port_id,
                or_na(n.port_description.as_ref()),
            )?;
            printed += 1;
        }

        if opts.legend {
            writeln!(w, "\n{}\n\nTotal entries displayed: {}", CAPABILITY_LEGEND, printed)?;
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
    use crate::lldp::LldpNeighbor;

    fn entries() -> Vec<LldpEntry> {
        vec![
            LldpEntry {
                link: "eth0".into(),
                ifindex: 2,
                neighbor: LldpNeighbor {
                    chassis_id: "00:1b:21:01:02:03".into(),
                    port_id: "ge-0/0/1".into(),
                    ttl: 120,
                    system_name: Some("core-sw1".into()),
                    port_description: Some("uplink".into()),
                    system_capabilities: Some(0x0014),
                    enabled_capabilities: Some(0x0014),
                },
            },
            LldpEntry {
                link: "eth1".into(),
                ifindex: 3,
                neighbor: LldpNeighbor {
                    chassis_id: "00:1b:21:01:02:04".into(),
                    port_id: "7".into(),
                    ttl: 30,
                    system_name: None,
                    port_description: None,
                    system_capabilities: None,
                    enabled_capabilities: None,
                },
            },
        ]
    }

    #[test]
    fn test_lldp_text() {
        let entries = entries();
        let mut out = Vec::new();
        LldpListing(&entries)
            .print_text(&mut out, &OutputOptions::default())
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "LINK             CHASSIS ID        SYSTEM NAME      CAPS        PORT ID           PORT DESCRIPTION"
        );
        assert_eq!(
            lines[1],
            "eth0             00:1b:21:01:02:03 core-sw1         ..b.r...... ge-0/0/1          uplink          "
        );
        assert_eq!(
            lines[2],
            "eth1             00:1b:21:01:02:04 n/a              n/a         7                 n/a             "
        );
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Capabilities:");
        assert!(text.ends_with("(TPMR)\n\nTotal entries displayed: 2\n"));
    }

    #[test]
    fn test_lldp_no_legend() {
        let entries = entries();
        let mut out = Vec::new();
        LldpListing(&entries)
            .print_text(
                &mut out,
                &OutputOptions {
                    legend: false,
                    ..Default::default()
                },
            )
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(!text.contains("Total entries"));
    }

    #[test]
    fn test_lldp_json() {
        let entries = entries();
        let json = LldpListing(&entries).to_json();
        assert_eq!(json[0]["link"], "eth0");
        assert_eq!(json[0]["system_name"], "core-sw1");
        assert_eq!(json[0]["ttl"], 120);
        assert_eq!(json[1]["ifindex"], 3);
    }
}
