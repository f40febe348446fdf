//! `multipart/mixed` bodies for datasource publishing.
//!
//! The server expects exactly two parts: the `tsRequest` metadata first, then
//! the datasource document.

/// Build the two-part publish body.
pub fn publish_body(boundary: &str, request_xml: &[u8], filename: &str, document: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(request_xml.len() + document.len() + 256);

    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Disposition: name=\"request_payload\"\r\n");
    body.extend_from_slice(b"Content-Type: text/xml\r\n");
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(request_xml);

    body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: name=\"tableau_datasource\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(document);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    body
}

/// `Content-Type` value announcing `boundary`.
pub fn content_type(boundary: &str) -> String {
    format!("multipart/mixed; boundary={}", boundary)
}
