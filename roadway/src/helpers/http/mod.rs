//! Helpers for HTTP request handling and response generation

pub mod request;
pub mod response;

use log::trace;
use percent_encoding::percent_decode_str;

/// Percent-decodes a request path.
///
/// Routing never fails on an undecodable path: when the decoded bytes are not valid UTF-8 the
/// raw path is kept as-is.
pub(crate) fn percent_decode(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(pd) => {
            trace!(" percent_decode: {}, src: {}", pd, raw);
            pd.into_owned()
        }
        Err(_) => {
            trace!(" percent_decode: error, keeping src: {}", raw);
            raw.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_valid_percent_decode() {
        assert_eq!("A+B+c d", percent_decode("%41+%42%2B%63%20%64"));
    }

    #[test]
    fn keeps_segments_that_are_not_utf8() {
        assert_eq!("%FF%FE", percent_decode("%FF%FE"));
    }
}
