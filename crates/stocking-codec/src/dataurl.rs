//! RFC 2397 data URLs.
//!
//! Encoding always produces the base64 form. Decoding follows what a
//! browser does when it fetches a data URL: the scheme is matched without
//! regard to case, the body is percent-decoded, base64 bodies may omit
//! padding and contain ASCII whitespace, and a missing media type means
//! `text/plain;charset=US-ASCII`.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use stocking_store::StoredAsset;
use stocking_types::media::OCTET_STREAM;
use stocking_types::MediaType;

use crate::error::DataUrlError;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = "base64";
const DEFAULT_MEDIA_TYPE: &str = "text/plain;charset=US-ASCII";

const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode a payload as `data:<media-type>;base64,<data>`.
///
/// An empty media type is written as `application/octet-stream`.
pub fn encode_data_url(asset: &StoredAsset) -> Result<String, DataUrlError> {
    asset
        .media_type
        .validate()
        .map_err(|_| DataUrlError::InvalidMediaType(asset.media_type.to_string()))?;
    let media = if asset.media_type.is_empty() {
        OCTET_STREAM
    } else {
        asset.media_type.as_str()
    };
    Ok(format!(
        "{SCHEME}{media};{BASE64_MARKER},{}",
        STANDARD.encode(&asset.data)
    ))
}

/// Decode a data URL back into a payload.
pub fn decode_data_url(url: &str) -> Result<StoredAsset, DataUrlError> {
    let url = url.trim();
    let has_scheme = url
        .get(..SCHEME.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(SCHEME));
    if !has_scheme {
        return Err(DataUrlError::MissingScheme);
    }
    let rest = &url[SCHEME.len()..];
    let (header, body) = rest.split_once(',').ok_or(DataUrlError::MissingSeparator)?;

    let header = header.trim();
    let (media, is_base64) = match header.rsplit_once(';') {
        Some((media, marker)) if marker.trim().eq_ignore_ascii_case(BASE64_MARKER) => {
            (media.trim(), true)
        }
        _ => (header, false),
    };
    let media_type = if media.is_empty() || media.starts_with(';') {
        MediaType::new(DEFAULT_MEDIA_TYPE)
    } else {
        MediaType::new(media)
    };

    let raw = percent_decode(body.as_bytes());
    let data = if is_base64 {
        let compact: Vec<u8> = raw
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        FORGIVING
            .decode(&compact)
            .map_err(|e| DataUrlError::InvalidBase64(e.to_string()))?
    } else {
        raw
    };

    Ok(StoredAsset { media_type, data })
}

/// Percent-decode `input`. Malformed escapes are kept literally.
fn percent_decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%' && i + 2 < input.len() {
            if let (Some(hi), Some(lo)) = (hex_val(input[i + 1]), hex_val(input[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(input[i]);
        i += 1;
    }
    out
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
