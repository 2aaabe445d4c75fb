//! `status` output.

use std::io::Write;

use super::{
    BLACK_CIRCLE, OutputOptions, Printable, json_value, operational_color, or_na, setup_color,
    write_list,
};
use crate::lldp::LldpNeighbor;
use crate::status::{AddressEntry, GatewayEntry, InterfaceReport, SystemReport};

/// ` on <name>` suffix for system-wide entries.
fn on_link(ifindex: u32, ifname: Option<&str>) -> String {
    match ifname {
        Some(name) => format!(" on {}", name),
        None => format!(" on %{}", ifindex),
    }
}

fn address_lines(addresses: &[AddressEntry], with_link: bool) -> Vec<String> {
    addresses
        .iter()
        .map(|a| {
            let mut line = a.address.to_string();
            if with_link {
                line.push_str(&on_link(a.ifindex, a.ifname.as_deref()));
            }
            line
        })
        .collect()
}

fn gateway_lines(gateways: &[GatewayEntry], with_link: bool) -> Vec<String> {
    gateways
        .iter()
        .map(|g| {
            let mut line = g.address.to_string();
            if let Some(vendor) = g.vendor.vendor() {
                line.push_str(&format!(" ({})", vendor));
            }
            if with_link {
                line.push_str(&on_link(g.ifindex, g.ifname.as_deref()));
            }
            line
        })
        .collect()
}

fn lldp_line(neighbor: &LldpNeighbor) -> String {
    let system = neighbor.system_name.as_deref().unwrap_or(&neighbor.chassis_id);
    format!("{} on port {}", system, neighbor.port_id)
}

impl Printable for InterfaceReport {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        let (oper_on, oper_off) = operational_color(self.state.operational.as_ref(), opts);
        let (setup_on, setup_off) = setup_color(self.state.setup.as_ref(), opts);

        writeln!(w, "{}{}{} {}: {}", oper_on, BLACK_CIRCLE, oper_off, self.index, self.name)?;
        writeln!(w, "       Link File: {}", or_na(self.device.link_file.as_ref()))?;
        writeln!(w, "    Network File: {}", or_na(self.state.network_file.as_ref()))?;
        writeln!(w, "            Type: {}", or_na(self.link_type.as_ref()))?;
        writeln!(
            w,
            "           State: {}{}{} ({}{}{})",
            oper_on,
            or_na(self.state.operational.as_ref()),
            oper_off,
            setup_on,
            or_na(self.state.setup.as_ref()),
            setup_off
        )?;

        if let Some(path) = &self.device.path {
            writeln!(w, "            Path: {}", path)?;
        }
        if let Some(driver) = &self.device.driver {
            writeln!(w, "          Driver: {}", driver)?;
        }
        if let Some(vendor) = &self.device.vendor {
            writeln!(w, "          Vendor: {}", vendor)?;
        }
        if let Some(model) = &self.device.model {
            writeln!(w, "           Model: {}", model)?;
        }

        if let Some(mac) = &self.hw_address {
            match self.hw_vendor.vendor() {
                Some(vendor) => writeln!(w, "      HW Address: {} ({})", mac, vendor)?,
                None => writeln!(w, "      HW Address: {}", mac)?,
            }
        }
        if let Some(mtu) = self.mtu {
            writeln!(w, "             MTU: {}", mtu)?;
        }

        write_list(w, "         Address: ", address_lines(&self.addresses, false))?;
        write_list(w, "         Gateway: ", gateway_lines(&self.gateways, false))?;
        write_list(w, "             DNS: ", &self.state.dns)?;
        write_list(w, "  Search Domains: ", &self.state.search_domains)?;
        write_list(w, "   Route Domains: ", &self.state.route_domains)?;
        write_list(w, "             NTP: ", &self.state.ntp)?;
        write_list(w, "Carrier Bound To: ", &self.state.carrier_bound_to)?;
        write_list(w, "Carrier Bound By: ", &self.state.carrier_bound_by)?;
        write_list(w, "            LLDP: ", self.lldp.iter().map(lldp_line))?;

        if let Some(tz) = &self.state.timezone {
            writeln!(w, "       Time Zone: {}", tz)?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        json_value(self)
    }
}

/// Several interface reports, separated by blank lines.
impl Printable for [InterfaceReport] {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        for (i, report) in self.iter().enumerate() {
            if i > 0 {
                writeln!(w)?;
            }
            report.print_text(w, opts)?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.iter().map(Printable::to_json).collect())
    }
}

impl Printable for SystemReport {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        let (on, off) = operational_color(self.state.operational.as_ref(), opts);

        writeln!(
            w,
            "{}{}{}        State: {}{}{}",
            on,
            BLACK_CIRCLE,
            off,
            on,
            or_na(self.state.operational.as_ref()),
            off
        )?;
        write_list(w, "       Address: ", address_lines(&self.addresses, true))?;
        write_list(w, "       Gateway: ", gateway_lines(&self.gateways, true))?;
        write_list(w, "           DNS: ", &self.state.dns)?;
        write_list(w, "Search Domains: ", &self.state.search_domains)?;
        write_list(w, " Route Domains: ", &self.state.route_domains)?;
        write_list(w, "           NTP: ", &self.state.ntp)?;
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        json_value(self)
    }
}
