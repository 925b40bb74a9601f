//! Test fixtures: small PDF payloads.

/// Minimal PDF bytes with a distinguishing marker in the body.
pub fn minimal_pdf(marker: &str) -> Vec<u8> {
    format!(
        "%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n% {}\ntrailer << /Root 1 0 R >>\n%%EOF\n",
        marker
    )
    .into_bytes()
}
