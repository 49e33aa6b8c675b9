use crate::urc::URCMessages;

#[test]
fn test_parse_link_state() {
    assert_eq!(URCMessages::Link, URCMessages::parse(b"Link"));
    assert_eq!(URCMessages::Unlink, URCMessages::parse(b"Unlink"));
    assert_eq!(URCMessages::Error, URCMessages::parse(b"ERROR"));
}

#[test]
fn test_parse_link_exact_match() {
    assert_eq!(URCMessages::Unknown, URCMessages::parse(b"Link "));
    assert_eq!(URCMessages::Unknown, URCMessages::parse(b"Linked"));
    assert_eq!(URCMessages::Unknown, URCMessages::parse(b"link"));
}

#[test]
fn test_parse_data() {
    assert_eq!(
        URCMessages::Data {
            channel: 1,
            length: 5,
            payload: Some(9..14),
        },
        URCMessages::parse(b"+IPD,1,5:hello")
    );
}

#[test]
fn test_parse_data_clipped_to_announced_length() {
    assert_eq!(
        URCMessages::Data {
            channel: 0,
            length: 2,
            payload: Some(9..11),
        },
        URCMessages::parse(b"+IPD,0,2:hello")
    );
}

#[test]
fn test_parse_data_clipped_to_line() {
    assert_eq!(
        URCMessages::Data {
            channel: 0,
            length: 10,
            payload: Some(10..13),
        },
        URCMessages::parse(b"+IPD,0,10:abc")
    );
}

#[test]
fn test_parse_data_zero_length() {
    assert_eq!(
        URCMessages::Data {
            channel: 2,
            length: 0,
            payload: None,
        },
        URCMessages::parse(b"+IPD,2,0:")
    );
}

#[test]
fn test_parse_data_missing_separator() {
    assert_eq!(
        URCMessages::Data {
            channel: 3,
            length: 4,
            payload: None,
        },
        URCMessages::parse(b"+IPD,3,4")
    );
}

#[test]
fn test_parse_data_payload_containing_separator() {
    assert_eq!(
        URCMessages::Data {
            channel: 0,
            length: 5,
            payload: Some(9..14),
        },
        URCMessages::parse(b"+IPD,0,5:a:b:c")
    );
}

#[test]
fn test_parse_data_invalid_header() {
    assert_eq!(URCMessages::Unknown, URCMessages::parse(b"+IPD,x,4:abcd"));
    assert_eq!(URCMessages::Unknown, URCMessages::parse(b"+IPD,1:abcd"));
    assert_eq!(URCMessages::Unknown, URCMessages::parse(b"+IPD,"));
}

#[test]
fn test_parse_socket_state() {
    assert_eq!(URCMessages::SocketConnected(0), URCMessages::parse(b"0,CONNECT"));
    assert_eq!(URCMessages::SocketConnected(4), URCMessages::parse(b"4,CONNECT"));
    assert_eq!(URCMessages::SocketClosed(2), URCMessages::parse(b"2,CLOSED"));
    assert_eq!(URCMessages::Unknown, URCMessages::parse(b"5,CONNECT"));
}

#[test]
fn test_parse_unknown() {
    assert_eq!(URCMessages::Unknown, URCMessages::parse(b""));
    assert_eq!(URCMessages::Unknown, URCMessages::parse(b"WIFI GOT IP"));
    assert_eq!(URCMessages::Unknown, URCMessages::parse(b"OK"));
}

#[test]
fn test_parse_data_length_exceeding_address_space() {
    let line = format!("+IPD,1,{}:hello", usize::MAX);
    let start = line.len() - 5;

    assert_eq!(
        URCMessages::Data {
            channel: 1,
            length: usize::MAX,
            payload: Some(start..line.len()),
        },
        URCMessages::parse(line.as_bytes())
    );
}
