//! HTML text helpers

/// Line terminator used for every emitted line
pub const EOL: &str = "\r\n";

/// Escape text for use in element content and quoted attribute values
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
