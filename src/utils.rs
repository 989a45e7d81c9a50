// ABOUTME: Small shared helpers
// ABOUTME: Sanitizes remote-supplied identifiers before they reach log lines

/// Sanitize a class name for display.
///
/// Class names arrive from a remote schema document and get interpolated into
/// log lines; control characters are removed and length is capped so a
/// malformed name cannot mangle the output.
///
/// **Note**: display only, not an escaping mechanism for requests.
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !c.is_control())
        .take(100)
        .collect()
}
