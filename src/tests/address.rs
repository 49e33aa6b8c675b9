use crate::wifi::{broadcast_address, parse_address_line};

#[test]
fn test_parse_address_bare() {
    assert_eq!("10.0.0.181", parse_address_line(b"10.0.0.181").unwrap().as_str());
}

#[test]
fn test_parse_address_quoted() {
    let address = parse_address_line(b"+CIFSR:STAIP,\"192.168.1.42\"").unwrap();
    assert_eq!("192.168.1.42", address.as_str());
}

#[test]
fn test_parse_address_max_length() {
    let address = parse_address_line(b"255.255.255.255").unwrap();
    assert_eq!("255.255.255.255", address.as_str());
}

#[test]
fn test_parse_address_mac_line() {
    assert!(parse_address_line(b"+CIFSR:STAMAC,\"5c:cf:7f:01:02:03\"").is_none());
}

#[test]
fn test_parse_address_wrong_dot_count() {
    assert!(parse_address_line(b"10.0.0").is_none());
    assert!(parse_address_line(b"10.0.0.1.2").is_none());
    assert!(parse_address_line(b"OK").is_none());
    assert!(parse_address_line(b"").is_none());
}

#[test]
fn test_parse_address_too_long() {
    assert!(parse_address_line(b"1000.2000.3000.4000").is_none());
}

#[test]
fn test_parse_address_unterminated_quote() {
    // Falls back to the whole line, which contains three dots
    let address = parse_address_line(b"\"10.0.0.1").unwrap();
    assert_eq!("\"10.0.0.1", address.as_str());
}

#[test]
fn test_broadcast_address() {
    assert_eq!("192.168.1.255", broadcast_address("192.168.1.42").unwrap().as_str());
    assert_eq!("10.0.0.255", broadcast_address("10.0.0.181").unwrap().as_str());
    assert_eq!("10.0.0.255", broadcast_address("10.0.0.").unwrap().as_str());
}

#[test]
fn test_broadcast_address_too_few_dots() {
    assert!(broadcast_address("10.0.0").is_none());
    assert!(broadcast_address("").is_none());
}
