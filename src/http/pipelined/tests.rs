use bytes::BytesMut;
use tokio_util::codec::Decoder;

use super::codec::MAX_HEAD_BYTES;
use super::{ResponseDecoder, encode_request};
use crate::http::SignedRequest;

fn decode_all(decoder: &mut ResponseDecoder, buf: &mut BytesMut) -> Result<Vec<u16>, String> {
    let mut statuses = Vec::new();
    while let Some(status) = decoder
        .decode(buf)
        .map_err(|err| format!("decode failed: {}", err))?
    {
        statuses.push(status);
    }
    Ok(statuses)
}

#[test]
fn pipelined_responses_yield_statuses_in_order() -> Result<(), String> {
    let mut decoder = ResponseDecoder::new();
    let mut buf = BytesMut::from(
        &b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok\
HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n\
HTTP/1.1 204 No Content\r\n\r\n"[..],
    );
    let statuses = decode_all(&mut decoder, &mut buf)?;
    if statuses != [200, 500, 204] {
        return Err(format!("Unexpected statuses: {:?}", statuses));
    }
    if !buf.is_empty() {
        return Err(format!("Expected buffer drained, {} bytes left", buf.len()));
    }
    Ok(())
}

#[test]
fn body_split_across_reads_is_consumed() -> Result<(), String> {
    let mut decoder = ResponseDecoder::new();
    let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n0123"[..]);
    let first = decode_all(&mut decoder, &mut buf)?;
    if !first.is_empty() {
        return Err(format!("Expected no status yet, got {:?}", first));
    }
    buf.extend_from_slice(b"456789HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
    let rest = decode_all(&mut decoder, &mut buf)?;
    if rest != [200, 404] {
        return Err(format!("Unexpected statuses: {:?}", rest));
    }
    Ok(())
}

#[test]
fn chunked_body_with_trailers_is_consumed() -> Result<(), String> {
    let mut decoder = ResponseDecoder::new();
    let mut buf = BytesMut::from(
        &b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
4;ext=1\r\nwiki\r\n5\r\npedia\r\n0\r\nX-Trailer: yes\r\n\r\n\
HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n"[..],
    );
    let statuses = decode_all(&mut decoder, &mut buf)?;
    if statuses != [200, 201] {
        return Err(format!("Unexpected statuses: {:?}", statuses));
    }
    Ok(())
}

#[test]
fn interim_responses_are_skipped() -> Result<(), String> {
    let mut decoder = ResponseDecoder::new();
    let mut buf = BytesMut::from(
        &b"HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n"[..],
    );
    let statuses = decode_all(&mut decoder, &mut buf)?;
    if statuses != [200] {
        return Err(format!("Unexpected statuses: {:?}", statuses));
    }
    Ok(())
}

#[test]
fn body_without_length_ends_at_close() -> Result<(), String> {
    let mut decoder = ResponseDecoder::new();
    let mut buf = BytesMut::from(&b"HTTP/1.0 200 OK\r\n\r\nsome body"[..]);
    let statuses = decode_all(&mut decoder, &mut buf)?;
    if !statuses.is_empty() {
        return Err(format!("Expected no status before close, got {:?}", statuses));
    }
    let at_close = decoder
        .decode_eof(&mut buf)
        .map_err(|err| format!("decode_eof failed: {}", err))?;
    if at_close != Some(200) {
        return Err(format!("Expected 200 at close, got {:?}", at_close));
    }
    Ok(())
}

#[test]
fn close_mid_body_is_an_error() -> Result<(), String> {
    let mut decoder = ResponseDecoder::new();
    let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc"[..]);
    decode_all(&mut decoder, &mut buf)?;
    if decoder.decode_eof(&mut buf).is_ok() {
        return Err("Expected truncated body to fail at close".to_owned());
    }
    Ok(())
}

#[test]
fn malformed_status_line_is_rejected() -> Result<(), String> {
    let mut decoder = ResponseDecoder::new();
    let mut buf = BytesMut::from(&b"SSH-2.0-OpenSSH\r\n\r\n"[..]);
    if decoder.decode(&mut buf).is_ok() {
        return Err("Expected bad status line to fail".to_owned());
    }
    Ok(())
}

#[test]
fn oversized_head_is_rejected() -> Result<(), String> {
    let mut decoder = ResponseDecoder::new();
    let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nX-Fill: "[..]);
    buf.extend_from_slice(&vec![b'a'; MAX_HEAD_BYTES]);
    if decoder.decode(&mut buf).is_ok() {
        return Err("Expected oversized head to fail".to_owned());
    }
    Ok(())
}

#[test]
fn encoded_request_carries_signed_headers() -> Result<(), String> {
    let request = SignedRequest::new("http://127.0.0.1:8080/derivatives/api/v3/accounts?x=1", "key-1", "c2ln")
        .map_err(|err| format!("request failed: {}", err))?;
    let encoded = String::from_utf8(encode_request(&request))
        .map_err(|err| format!("not utf8: {}", err))?;
    let expected_prefix = "GET /derivatives/api/v3/accounts?x=1 HTTP/1.1\r\nHost: 127.0.0.1:8080\r\nAPIKey: key-1\r\nAuthent: c2ln\r\n";
    if !encoded.starts_with(expected_prefix) {
        return Err(format!("Unexpected request head: {:?}", encoded));
    }
    if !encoded.ends_with("Accept: */*\r\n\r\n") {
        return Err(format!("Unexpected request tail: {:?}", encoded));
    }
    Ok(())
}
