use super::completion::ResponseHandler;
use super::*;
use crate::args::ClientKind;
use crate::error::HttpError;

fn request(url: &str) -> Result<SignedRequest, String> {
    SignedRequest::new(url, "key", "sig").map_err(|err| format!("request failed: {}", err))
}

#[test]
fn default_target_is_accepted() -> Result<(), String> {
    let signed = request(DEFAULT_TARGET_URL)?;
    if !signed.is_tls() {
        return Err("Expected https target".to_owned());
    }
    if signed.port() != 443 {
        return Err(format!("Expected port 443, got {}", signed.port()));
    }
    if signed.authority() != "demo-futures.kraken.com" {
        return Err(format!("Unexpected authority: {}", signed.authority()));
    }
    if signed.path_and_query() != "/derivatives/api/v3/accounts" {
        return Err(format!("Unexpected path: {}", signed.path_and_query()));
    }
    Ok(())
}

#[test]
fn explicit_port_is_kept_in_authority() -> Result<(), String> {
    let signed = request("http://127.0.0.1:9000/a?b=c")?;
    if signed.authority() != "127.0.0.1:9000" {
        return Err(format!("Unexpected authority: {}", signed.authority()));
    }
    if signed.path_and_query() != "/a?b=c" {
        return Err(format!("Unexpected path: {}", signed.path_and_query()));
    }
    Ok(())
}

#[test]
fn non_http_scheme_is_rejected() -> Result<(), String> {
    match SignedRequest::new("ftp://example.com/x", "key", "sig") {
        Err(HttpError::UnsupportedScheme { scheme }) if scheme == "ftp" => Ok(()),
        other => Err(format!("Expected UnsupportedScheme, got {:?}", other.map(|_| ()))),
    }
}

#[test]
fn unparsable_url_is_rejected() -> Result<(), String> {
    if SignedRequest::new("not a url", "key", "sig").is_ok() {
        return Err("Expected invalid URL to fail".to_owned());
    }
    Ok(())
}

#[test]
fn header_with_newline_is_rejected() -> Result<(), String> {
    match SignedRequest::new("http://localhost/", "bad\nkey", "sig") {
        Err(HttpError::InvalidHeaderValue { name, .. }) if name == API_KEY_HEADER => Ok(()),
        other => Err(format!("Expected InvalidHeaderValue, got {:?}", other.map(|_| ()))),
    }
}

#[test]
fn signed_headers_are_attached() -> Result<(), String> {
    let signed = request("http://localhost/")?;
    let headers = signed.headers();
    let api_key = headers.get(API_KEY_HEADER).map(|value| value.as_bytes());
    let signature = headers.get(SIGNATURE_HEADER);
    if api_key != Some(b"key".as_slice()) {
        return Err(format!("Unexpected APIKey header: {:?}", api_key));
    }
    match signature {
        Some(value) if value.as_bytes() == b"sig" && value.is_sensitive() => Ok(()),
        other => Err(format!("Unexpected Authent header: {:?}", other)),
    }
}

#[test]
fn each_outcome_signals_exactly_once() -> Result<(), String> {
    let context = BackendContext::new(4);
    let handler = ResponseHandler::new(ClientKind::Reqwest, &context);

    handler.begin().responded(200);
    handler.begin().responded(503);
    handler.begin().failed(&"connection reset");
    drop(handler.begin());

    let counts = context.tally.snapshot();
    let expected = OutcomeCounts {
        ok: 1,
        non_success: 1,
        failed: 1,
        cancelled: 1,
    };
    if counts != expected {
        return Err(format!("Unexpected tally: {:?}", counts));
    }
    if context.tracker.outstanding() != 0 {
        return Err(format!(
            "Expected tracker drained, {} outstanding",
            context.tracker.outstanding()
        ));
    }
    Ok(())
}

#[test]
fn tally_is_complete_once_tracker_drains() -> Result<(), String> {
    let context = BackendContext::new(64);
    let handler = ResponseHandler::new(ClientKind::Hyper, &context);
    let workers: Vec<_> = (0..8)
        .map(|_| {
            let handler = handler.clone();
            std::thread::spawn(move || {
                for _ in 0..8 {
                    handler.begin().responded(200);
                }
            })
        })
        .collect();

    if !context.tracker.await_zero(std::time::Duration::from_secs(5)) {
        return Err("Expected all completions within timeout".to_owned());
    }
    let total = context.tally.snapshot().total();
    for worker in workers {
        worker
            .join()
            .map_err(|err| format!("worker panicked: {:?}", err))?;
    }
    if total != 64 {
        return Err(format!("Expected 64 outcomes at drain, got {}", total));
    }
    Ok(())
}
