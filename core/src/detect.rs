//! # Private Address Detection
//!
//! Finds the IPv4 address under which this machine is reachable on the LAN.
//!
//! The pipeline is: capture an interface listing from the OS network tool,
//! extract every dotted-quad candidate in document order, keep the RFC 1918
//! ones, then pick a winner. `192.168.` addresses win over the other private
//! ranges regardless of where they appear in the listing.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use lanserve_common::error::DetectError;

pub mod listing;

use self::listing::{CommandListing, ListingSource};

/// Dotted quads that follow an `IPv4 ... :` label, as printed by `ipconfig`.
const LABELLED_PATTERN: &str = r"IPv4.*?:\s*([\d.]+)";
/// Dotted quads after an `inet ` marker, as printed by `ip addr`/`ifconfig`.
const INET_PATTERN: &str = r"inet ([\d.]+)";

fn labelled_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LABELLED_PATTERN).expect("invalid labelled pattern"))
}

fn inet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(INET_PATTERN).expect("invalid inet pattern"))
}

/// Detects the private IPv4 address of this host, if any.
///
/// Every failure mode (tool missing, tool failed, nothing private in the
/// listing) collapses to `None` here; this never propagates or panics.
pub fn detect_private_ipv4() -> Option<String> {
    match detect_with(&CommandListing) {
        Ok(addr) => Some(addr),
        Err(err) => {
            debug!("address detection failed: {err}");
            None
        }
    }
}

/// Typed detection path, parameterized over the listing source.
pub fn detect_with(source: &impl ListingSource) -> Result<String, DetectError> {
    let text: String = source.listing()?;
    let candidates: Vec<String> = extract_candidates(&text);
    let private: Vec<String> = filter_private(&candidates);
    select(private).ok_or(DetectError::NoPrivateAddress)
}

/// Pulls every IPv4-looking substring out of an interface listing,
/// in document order.
///
/// Matching is purely syntactic; octet values above 255 are not rejected
/// here, the private-range filter deals with them.
pub fn extract_candidates(text: &str) -> Vec<String> {
    let labelled: Vec<String> = capture_all(labelled_re(), text);
    if !labelled.is_empty() {
        return labelled;
    }
    capture_all(inet_re(), text)
}

fn capture_all(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Keeps the candidates inside the RFC 1918 blocks, preserving order.
pub fn filter_private(candidates: &[String]) -> Vec<String> {
    candidates
        .iter()
        .filter(|addr| is_private(addr))
        .cloned()
        .collect()
}

fn is_private(addr: &str) -> bool {
    if addr.starts_with("192.168.") || addr.starts_with("10.") {
        return true;
    }
    // 172.16.0.0/12: only second octets 16 through 31 qualify.
    if let Some(rest) = addr.strip_prefix("172.") {
        if let Some(second) = rest.split('.').next() {
            if let Ok(octet) = second.parse::<u16>() {
                return (16..=31).contains(&octet);
            }
        }
    }
    false
}

/// Selection rule: the first `192.168.` address wins, then the first
/// private address of any range, then nothing.
pub fn select(private: Vec<String>) -> Option<String> {
    if let Some(addr) = private.iter().find(|addr| addr.starts_with("192.168.")) {
        return Some(addr.clone());
    }
    private.into_iter().next()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
