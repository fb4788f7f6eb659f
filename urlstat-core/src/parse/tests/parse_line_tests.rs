use crate::parse::{Latency, ParseFailure, ParsedRecord, parse_line, parse_str};
use crate::stream::RawLine;

use pretty_assertions::assert_eq;

const SAMPLE: &str = r#"1.196.116.32 -  - [29/Jun/2017:03:50:22 +0300] "GET /api/v2/banner/25019354 HTTP/1.1" 200 927 "-" "Lynx/2.8.8dev.9 libwww-FM/2.14 SSL-MM/1.4.1 GNUTLS/2.10.5" "-" "1498697422-2190034393-4708-9752759" "dc7161be3" 0.390"#;

fn line_with(request: &str, request_time: &str) -> String {
    format!(
        r#"1.99.174.176 3b81f63526fa8  - [29/Jun/2017:03:50:22 +0300] "{request}" 200 12 "-" "Python-urllib/2.7" "-" "1498697422-32900793-4708-9752770" "-" {request_time}"#
    )
}

#[test]
fn extracts_url_and_latency_from_sample() {
    // Act
    let record = parse_str(SAMPLE).unwrap();

    // Assert
    assert_eq!(
        record,
        ParsedRecord {
            url: "/api/v2/banner/25019354".to_string(),
            latency: Latency::Seconds(0.390),
        }
    );
}

#[test]
fn keeps_query_strings_in_url() {
    let line = line_with("GET /api/1/photogenic_banners/list/?server_name=WIN7RB4 HTTP/1.1", "0.133");

    let record = parse_str(&line).unwrap();

    assert_eq!(record.url, "/api/1/photogenic_banners/list/?server_name=WIN7RB4");
    assert_eq!(record.latency, Latency::Seconds(0.133));
}

#[test]
fn dash_latency_is_unknown() {
    let line = line_with("POST /api/v2/target/12988/list HTTP/1.1", "-");

    let record = parse_str(&line).unwrap();

    assert_eq!(record.latency, Latency::Unknown);
    assert_eq!(record.latency.seconds(), None);
}

#[test]
fn escaped_quotes_inside_fields_are_accepted() {
    let line = r#"1.2.3.4 - - [29/Jun/2017:03:50:22 +0300] "GET /a HTTP/1.1" 200 1 "-" "Agent \"quoted\" 1.0" "-" "id" "-" 0.010"#;

    let record = parse_str(line).unwrap();

    assert_eq!(record.url, "/a");
}

#[test]
fn trailing_whitespace_is_tolerated() {
    let line = format!("{SAMPLE}  ");

    assert!(parse_str(&line).is_ok());
}

#[test]
fn malformed_request_clause_fails() {
    let cases = [
        line_with("0", "0.001"),
        line_with("GET /only-two", "0.001"),
        line_with("GET  /double-space HTTP/1.1", "0.001"),
    ];

    for line in cases {
        assert_eq!(parse_str(&line), Err(ParseFailure::Malformed), "{line}");
    }
}

#[test]
fn wrong_field_count_fails() {
    let missing_quoted = r#"1.2.3.4 - - [29/Jun/2017:03:50:22 +0300] "GET /a HTTP/1.1" 200 1 "-" "agent" "-" "id" 0.010"#;
    let extra_field = format!("{SAMPLE} 0.5");
    let truncated = &SAMPLE[..SAMPLE.len() / 2];

    assert_eq!(parse_str(missing_quoted), Err(ParseFailure::Malformed));
    assert_eq!(parse_str(&extra_field), Err(ParseFailure::Malformed));
    assert_eq!(parse_str(truncated), Err(ParseFailure::Malformed));
    assert_eq!(parse_str(""), Err(ParseFailure::Malformed));
}

#[test]
fn unbalanced_quotes_fail() {
    let line = r#"1.2.3.4 - - [29/Jun/2017:03:50:22 +0300] "GET /a HTTP/1.1 200 1 "-" "agent" "-" "id" "-" 0.010"#;

    assert_eq!(parse_str(line), Err(ParseFailure::Malformed));
}

#[test]
fn invalid_latency_values_fail() {
    for raw in ["abc", "-1.0", "NaN", "inf", "0.3s"] {
        let line = line_with("GET /a HTTP/1.1", raw);
        assert_eq!(parse_str(&line), Err(ParseFailure::InvalidLatency), "{raw}");
    }
}

#[test]
fn non_utf8_bytes_are_an_encoding_failure() {
    let mut bytes = SAMPLE.as_bytes().to_vec();
    bytes[40] = 0xff;
    let line = RawLine { number: 1, bytes };

    assert_eq!(parse_line(&line), Err(ParseFailure::Encoding));
}

#[test]
fn raw_line_delegates_to_text_parser() {
    let line = RawLine {
        number: 7,
        bytes: SAMPLE.as_bytes().to_vec(),
    };

    assert_eq!(parse_line(&line), parse_str(SAMPLE));
}
