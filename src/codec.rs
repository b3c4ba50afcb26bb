//! Payment payload codec.
//!
//! Fields are carried as the query of a `pay://` URI. Each value is percent-encoded as a URI
//! component, then the whole URI is percent-encoded once more before it goes into the QR
//! symbol:
//!
//! ```text
//! pay://?identifier=123&amount=1.0&expiry=2%2F10%2F2024
//! pay%3A%2F%2F%3Fidentifier%3D123%26amount%3D1.0%26expiry%3D2%252F10%252F2024
//! ```
//!
//! The outer layer is what deployed codes carry, so it is kept on both sides.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, warn};

use crate::{
    constraint::ConstraintSet,
    error::{PayQrError, PayQrResult},
    expiry::today,
    types::{Field, PaymentFields, ScanResult},
};

pub const SCHEME: &str = "pay";

// Only the shape is checked here, values may be empty
const PAYLOAD_PATTERN: &str = r"^pay://\?identifier=[^&]*&amount=[^&]*&expiry=[^&]*$";

fn payload_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PAYLOAD_PATTERN).expect("payload pattern is valid"))
}

// Encode
//------------------------------------------------------------------------------

/// Validates `fields` against `constraints` and builds the QR payload string.
pub fn encode(fields: &PaymentFields, constraints: &ConstraintSet) -> PayQrResult<String> {
    encode_on(fields, constraints, today())
}

/// [`encode`] with an explicit reference date for date constraints.
pub fn encode_on(
    fields: &PaymentFields,
    constraints: &ConstraintSet,
    today: NaiveDate,
) -> PayQrResult<String> {
    constraints.validate_fields_on(fields, today)?;
    let uri = build_uri(fields);
    debug!(%uri, "Encoded payment uri");
    Ok(urlencoding::encode(&uri).into_owned())
}

/// Builds the inner `pay://` URI, values percent-encoded once.
pub fn build_uri(fields: &PaymentFields) -> String {
    let query = Field::ALL
        .iter()
        .map(|&f| format!("{}={}", f.name(), urlencoding::encode(fields.get(f))))
        .collect::<Vec<_>>()
        .join("&");
    format!("{SCHEME}://?{query}")
}

// Decode
//------------------------------------------------------------------------------

/// Parses a scanned payload. Field values are not validated, see
/// [`ConstraintSet::validate`].
pub fn decode(raw: &str) -> PayQrResult<ScanResult> {
    let uri = percent_decode(raw);
    if !payload_regex().is_match(&uri) {
        warn!("Payload does not match payment uri shape");
        return Err(PayQrError::InvalidPayload);
    }

    // Anything after `#` is the fragment, not part of the query
    let query = uri.split_once('?').map_or("", |(_, q)| q);
    let query = query.split_once('#').map_or(query, |(q, _)| q);
    Ok(ScanResult {
        identifier: query_param(query, Field::Identifier),
        amount: query_param(query, Field::Amount),
        expiry: query_param(query, Field::Expiry),
    })
}

// First occurrence wins, `+` reads as a space
fn query_param(query: &str, field: Field) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == field.name())
        .map(|(_, value)| percent_decode(&value.replace('+', " ")))
}

// Malformed escapes are kept as is, invalid UTF-8 is replaced
fn percent_decode(s: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(s.as_bytes())).into_owned()
}

#[cfg(test)]
mod codec_tests {
    use chrono::NaiveDate;
    use test_case::test_case;

    use super::{build_uri, decode, encode, encode_on};
    use crate::{
        constraint::ConstraintSet,
        error::PayQrError,
        types::{Field, PaymentFields, ScanResult},
    };

    fn sample() -> PaymentFields {
        PaymentFields::new("123", "1.0", "2/10/2024")
    }

    #[test]
    fn test_build_uri() {
        assert_eq!(build_uri(&sample()), "pay://?identifier=123&amount=1.0&expiry=2%2F10%2F2024");
    }

    #[test]
    fn test_encode() {
        let payload = encode(&sample(), &ConstraintSet::default()).unwrap();
        assert_eq!(
            payload,
            "pay%3A%2F%2F%3Fidentifier%3D123%26amount%3D1.0%26expiry%3D2%252F10%252F2024"
        );
    }

    #[test]
    fn test_encode_escapes_values() {
        let fields = PaymentFields::new("a&b=c d", "5", "1/1/2030");
        let payload = encode(&fields, &ConstraintSet::default()).unwrap();
        assert!(!payload.contains('&'));
        assert_eq!(decode(&payload).unwrap(), ScanResult::from(fields));
    }

    #[test_case(PaymentFields::new(" ", "1.0", "2/10/2024"), Field::Identifier)]
    #[test_case(PaymentFields::new("123", "abc", "2/10/2024"), Field::Amount)]
    #[test_case(PaymentFields::new("123", "abc", ""), Field::Amount; "amount before expiry")]
    #[test_case(PaymentFields::new("123", "1.0", ""), Field::Expiry)]
    fn test_encode_invalid_field(fields: PaymentFields, exp: Field) {
        let res = encode(&fields, &ConstraintSet::default());
        assert!(matches!(res, Err(PayQrError::InvalidField(f)) if f == exp));
    }

    #[test]
    fn test_encode_expired() {
        let constraints = ConstraintSet::strict();
        let day_before = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        let day_after = NaiveDate::from_ymd_opt(2024, 2, 11).unwrap();
        assert!(encode_on(&sample(), &constraints, day_before).is_ok());
        let res = encode_on(&sample(), &constraints, day_after);
        assert!(matches!(res, Err(PayQrError::InvalidField(Field::Expiry))));
    }

    #[test]
    fn test_round_trip() {
        let payload = encode(&sample(), &ConstraintSet::default()).unwrap();
        let res = decode(&payload).unwrap();
        assert_eq!(res.into_fields(), Some(sample()));
    }

    #[test]
    fn test_decode_single_encoded() {
        let res = decode("pay://?identifier=123&amount=1.0&expiry=2%2F10%2F2024").unwrap();
        assert_eq!(res, ScanResult::from(sample()));
    }

    #[test]
    fn test_decode_empty_values() {
        let res = decode("pay%3A%2F%2F%3Fidentifier%3D%26amount%3D%26expiry%3D").unwrap();
        let empty = Some(String::new());
        assert_eq!(res, ScanResult { identifier: empty.clone(), amount: empty.clone(), expiry: empty });
        assert!(ConstraintSet::default().validate(&res).is_err());
    }

    #[test]
    fn test_decode_plus_as_space() {
        let res = decode("pay://?identifier=a+b&amount=1&expiry=x").unwrap();
        assert_eq!(res.identifier.as_deref(), Some("a b"));
    }

    #[test_case("pay://?identifier=a#b&amount=1&expiry=x", Some("a"), None, None; "fragment in identifier")]
    #[test_case("pay://?identifier=a&amount=1&expiry=x#top", Some("a"), Some("1"), Some("x"); "trailing fragment")]
    #[test_case("pay%3A%2F%2F%3Fidentifier%3Da%26amount%3D1%26expiry%3Dx%2523y", Some("a"), Some("1"), Some("x#y"); "escaped hash")]
    fn test_decode_fragment(
        raw: &str,
        identifier: Option<&str>,
        amount: Option<&str>,
        expiry: Option<&str>,
    ) {
        let res = decode(raw).unwrap();
        assert_eq!(res.identifier.as_deref(), identifier);
        assert_eq!(res.amount.as_deref(), amount);
        assert_eq!(res.expiry.as_deref(), expiry);
    }

    #[test_case("pay://?identifier=123&expiry=2%2F10%2F2024"; "missing amount")]
    #[test_case("pay://?amount=1.0&identifier=123&expiry=2%2F10%2F2024"; "wrong order")]
    #[test_case("pay://?identifier=123&amount=1.0&expiry=2%2F10%2F2024&extra=1"; "extra param")]
    #[test_case("http://?identifier=123&amount=1.0&expiry=2%2F10%2F2024"; "wrong scheme")]
    #[test_case("pay://host?identifier=123&amount=1.0&expiry=1"; "authority")]
    #[test_case("hello world"; "text")]
    #[test_case(""; "empty")]
    fn test_decode_invalid(raw: &str) {
        assert!(matches!(decode(raw), Err(PayQrError::InvalidPayload)));
        assert!(matches!(decode(&urlencoding::encode(raw)), Err(PayQrError::InvalidPayload)));
    }

    #[test]
    fn test_decode_rejects_unescaped_ampersand() {
        // Single encoding leaves the `&` of a value exposed to the shape check
        let raw = "pay://?identifier=a&b&amount=1&expiry=x";
        assert!(matches!(decode(raw), Err(PayQrError::InvalidPayload)));
    }
}
