use crate::config::Config;
use crate::session::Role;
use crate::stack::Error;
use crate::tests::mock::{create_adapter, server_adapter, MockSerial};
use embedded_io::ErrorKind;

#[test]
fn test_start_server_correct_commands() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();
    serial.add_ok_response();

    let (mut adapter, _) = create_adapter(serial, Config::default());
    adapter.start_server(8000, 300).unwrap();

    assert_eq!(Role::Server, adapter.role());
    assert_eq!(8000, adapter.listen_port());
    assert_eq!(
        vec!["AT+CIPSERVER=1,8000", "AT+CIPSTO=300"],
        adapter.serial.get_commands_as_strings()
    );
}

#[test]
fn test_start_server_not_confirmed() {
    let mut serial = MockSerial::new();
    serial.add_error_response();

    let (mut adapter, clock) = create_adapter(serial, Config::default());
    assert_eq!(Error::ServerStartFailed, adapter.start_server(9000, 300).unwrap_err());

    assert_eq!(Role::Idle, adapter.role());
    assert_eq!(500, clock.now_ms());
    assert_eq!(vec!["AT+CIPSERVER=1,9000"], adapter.serial.get_commands_as_strings());

    // Port got cached anyway
    assert_eq!(9000, adapter.listen_port());
}

#[test]
fn test_start_server_timeout_not_confirmed() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();
    serial.add_no_response();

    let (mut adapter, _) = create_adapter(serial, Config::default());
    assert_eq!(Error::ServerTimeoutFailed, adapter.start_server(8000, 60).unwrap_err());
    assert_eq!(Role::Idle, adapter.role());
}

#[test]
fn test_start_server_retry_after_failure() {
    let mut serial = MockSerial::new();
    serial.add_no_response();
    serial.add_ok_response();
    serial.add_ok_response();

    let (mut adapter, _) = create_adapter(serial, Config::default());
    assert_eq!(Error::ServerStartFailed, adapter.start_server(8000, 300).unwrap_err());

    adapter.start_server(8000, 300).unwrap();
    assert_eq!(Role::Server, adapter.role());
}

#[test]
fn test_start_client_correct_commands() {
    let mut serial = MockSerial::new();
    serial.add_response(b"3,CONNECT\r\n\r\nOK\r\n");

    let (mut adapter, clock) = create_adapter(serial, Config::default());
    adapter.start_client("10.0.0.1", 21, 5_000).unwrap();

    assert_eq!(Role::Client, adapter.role());
    assert_eq!(
        vec!["AT+CIPSTART=3,\"TCP\",\"10.0.0.1\",21"],
        adapter.serial.get_commands_as_strings()
    );

    // Settle time + scan until confirmation
    assert!(clock.now_ms() >= 100);
    assert!(clock.now_ms() < 200);
}

#[test]
fn test_start_client_not_confirmed() {
    let mut serial = MockSerial::new();
    serial.add_response(b"\r\nERROR\r\nCLOSED\r\n");

    let (mut adapter, clock) = create_adapter(serial, Config::default());
    assert_eq!(
        Error::ClientConnectFailed,
        adapter.start_client("10.0.0.1", 21, 2_000).unwrap_err()
    );

    assert_eq!(Role::Idle, adapter.role());
    assert_eq!(2_100, clock.now_ms());
}

#[test]
fn test_start_client_host_too_long() {
    let (mut adapter, _) = create_adapter(MockSerial::new(), Config::default());

    let host = "h".repeat(65);
    assert_eq!(Error::HostTooLong, adapter.start_client(&host, 21, 1_000).unwrap_err());

    assert_eq!(Role::Idle, adapter.role());
    assert!(adapter.serial.get_commands_as_strings().is_empty());
}

#[test]
fn test_server_role_is_one_shot() {
    let (mut adapter, _) = server_adapter(Config::default());
    let command_count = adapter.serial.get_commands_as_strings().len();

    assert_eq!(
        Error::RoleAlreadyAssigned,
        adapter.start_client("10.0.0.1", 21, 1_000).unwrap_err()
    );
    assert_eq!(Error::RoleAlreadyAssigned, adapter.start_server(9000, 300).unwrap_err());

    assert_eq!(Role::Server, adapter.role());
    assert_eq!(8000, adapter.listen_port());
    assert_eq!(command_count, adapter.serial.get_commands_as_strings().len());
}

#[test]
fn test_client_role_is_one_shot() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();

    let (mut adapter, _) = create_adapter(serial, Config::default());
    adapter.start_client("10.0.0.1", 21, 1_000).unwrap();

    assert_eq!(Error::RoleAlreadyAssigned, adapter.start_server(8000, 300).unwrap_err());
    assert_eq!(
        Error::RoleAlreadyAssigned,
        adapter.start_client("10.0.0.2", 21, 1_000).unwrap_err()
    );
    assert_eq!(1, adapter.serial.get_commands_as_strings().len());
}

#[test]
fn test_send_client_channel() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();
    serial.add_response(b"\r\nOK\r\n> \r\nRecv 5 bytes\r\n\r\nSEND OK\r\n");

    let (mut adapter, _) = create_adapter(serial, Config::default());
    adapter.start_client("10.0.0.1", 21, 1_000).unwrap();
    adapter.send(b"hello").unwrap();

    let commands = adapter.serial.get_commands_as_strings();
    assert_eq!("AT+CIPSEND=3,5", commands[1]);
    assert_eq!("hello", commands[2]);
}

#[test]
fn test_send_idle_uses_client_channel() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();

    let (mut adapter, _) = create_adapter(serial, Config::default());
    adapter.send(b"hi").unwrap();

    assert_eq!(
        vec!["AT+CIPSEND=3,2", "hi"],
        adapter.serial.get_commands_as_strings()
    );
}

#[test]
fn test_send_server_replies_on_last_inbound_channel() {
    let (mut adapter, _) = server_adapter(Config::default());

    adapter.serial.add_incoming(b"Link\r\n+IPD,4,4:ping\r\n");
    adapter.poll().unwrap();
    assert_eq!(4, adapter.reply_channel());

    adapter.serial.add_ok_response();
    adapter.send(b"pong").unwrap();

    let commands = adapter.serial.get_commands_as_strings();
    assert_eq!("AT+CIPSEND=4,4", commands[commands.len() - 2]);
    assert_eq!("pong", commands[commands.len() - 1]);
}

#[test]
fn test_send_server_default_channel() {
    let (mut adapter, _) = server_adapter(Config::default());

    adapter.serial.add_ok_response();
    adapter.send(b"pong").unwrap();

    let commands = adapter.serial.get_commands_as_strings();
    assert_eq!("AT+CIPSEND=0,4", commands[commands.len() - 2]);
}

#[test]
fn test_send_not_confirmed_is_no_error() {
    let mut serial = MockSerial::new();
    serial.add_error_response();

    let (mut adapter, clock) = create_adapter(serial, Config::default().send_timeout_ms(200));
    adapter.send(b"hello").unwrap();

    // Settle time + send timeout
    assert_eq!(250, clock.now_ms());
}

#[test]
fn test_send_transport_error() {
    let mut serial = MockSerial::new();
    serial.fail_writes();

    let (mut adapter, _) = create_adapter(serial, Config::default());
    assert_eq!(Error::Transport(ErrorKind::BrokenPipe), adapter.send(b"hello").unwrap_err());
}
