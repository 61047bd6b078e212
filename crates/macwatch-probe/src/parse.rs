//! arp-scan plain-text output parsing.
//!
//! `arp-scan -q` prints one `<ip>\t<mac>` line per responding host between
//! a header and a footer. A line yields an observation iff its first field
//! parses as an IPv4 address and its second passes MAC validation; every
//! other line is skipped, so a garbled or empty result reads as "no
//! devices" rather than an error.

use std::net::Ipv4Addr;

use macwatch_core::{mac, Observation};

/// Extract the observation set from raw arp-scan stdout.
///
/// Duplicate MACs are kept in encounter order; downstream consumers apply
/// last-wins.
pub fn parse_arp_output(output: &str) -> Vec<Observation> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<Observation> {
    let mut fields = line.split_whitespace();
    let ip = fields.next()?;
    let mac_addr = fields.next()?;

    ip.parse::<Ipv4Addr>().ok()?;
    if !mac::is_valid(mac_addr) {
        return None;
    }

    Some(Observation::new(ip, mac_addr))
}
