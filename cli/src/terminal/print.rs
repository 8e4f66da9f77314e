//! The three user-facing lines this tool ever prints.
//!
//! These strings are part of the tool's contract and are printed to stdout
//! verbatim; diagnostics belong in `tracing`, not here.

/// Renders the startup report. The success form carries its own trailing
/// newline so the printed output ends with a blank line.
pub fn render_report(selected: Option<&str>, port: u16) -> String {
    match selected {
        Some(addr) => format!("Server Running On: http://{addr}:{port}\n"),
        None => "Could not detect local IPv4 address.".to_string(),
    }
}

pub fn report(selected: Option<&str>, port: u16) {
    println!("{}", render_report(selected, port));
}

/// Renders the interrupt farewell; the leading newline separates it from
/// whatever the terminal showed when ctrl-c arrived.
pub fn render_stopped() -> &'static str {
    "\nServer stopped."
}

pub fn stopped() {
    println!("{}", render_stopped());
}
