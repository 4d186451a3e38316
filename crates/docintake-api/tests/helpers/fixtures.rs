//! Test fixtures: small document blobs.

pub const PDF: &str = "application/pdf";
pub const TEXT: &str = "text/plain";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Minimal valid PDF.
pub fn create_test_pdf() -> Vec<u8> {
    b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>
endobj
trailer
<< /Root 1 0 R >>
%%EOF
"
    .to_vec()
}

/// Plain text of exactly `len` bytes.
pub fn create_text(len: usize) -> Vec<u8> {
    b"lorem ipsum ".iter().copied().cycle().take(len).collect()
}
