use std::io::Read;
use std::time::Duration;

use flate2::read::{DeflateDecoder, GzDecoder};
use log::debug;

use crate::errors::{Error, Result};

const RESPONSE_CODE_OK: u16 = 200;

/// Opens a request URL and hands back the decompressed response body.
pub trait Transport {
    fn open(&self, url: &str) -> Result<Box<dyn Read>>;
}

pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        HttpTransport {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect_timeout)
                .build(),
        }
    }
}

impl Transport for HttpTransport {
    fn open(&self, url: &str) -> Result<Box<dyn Read>> {
        let response = match self.agent.get(url).set("Accept-Encoding", "gzip, deflate").call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                return Err(status_error(code, response.header("Error"), url))
            }
            Err(err) => return Err(err.into()),
        };

        if response.status() != RESPONSE_CODE_OK {
            return Err(status_error(response.status(), response.header("Error"), url));
        }

        let encoding = response.header("Content-Encoding").map(str::to_string);
        debug!(url = url, encoding = encoding.as_deref().unwrap_or("identity"); "Opened response stream");
        Ok(decode_content_encoding(encoding.as_deref(), response.into_reader()))
    }
}

/// Error for a response that did not carry a document, including the detail the
/// server put in its `Error` header, if any.
pub fn status_error(code: u16, api_message: Option<&str>, url: &str) -> Error {
    match api_message {
        Some(api_message) => Error::transport(format!(
            "Received API HTTP response code {code} with message \"{api_message}\" for URL \"{url}\"."
        )),
        None => Error::transport(format!("Received API HTTP response code {code} for URL \"{url}\".")),
    }
}

/// Undo the `Content-Encoding` of a response body. `deflate` is read as a raw
/// deflate stream; unknown or missing encodings pass through.
pub fn decode_content_encoding<R: Read + 'static>(encoding: Option<&str>, body: R) -> Box<dyn Read> {
    match encoding {
        Some(encoding) if encoding.eq_ignore_ascii_case("gzip") => Box::new(GzDecoder::new(body)),
        Some(encoding) if encoding.eq_ignore_ascii_case("deflate") => Box::new(DeflateDecoder::new(body)),
        _ => Box::new(body),
    }
}
