use crate::commands::{
    AccessPointConnectCommand, AttentionCommand, CommandErrorHandler, ConnectCommand, ListAccessPointsCommand,
    ObtainLocalAddressCommand, RestartCommand, ServerCommand, ServerTimeoutCommand, SetMultipleConnectionsCommand,
    TransmissionPrepareCommand, WifiModeCommand, COMMAND_SIZE,
};
use crate::config::WifiMode;
use crate::stack::Error;
use crate::wifi::JoinError;
use atat::AtatCmd;

fn encode<Cmd: AtatCmd>(command: &Cmd) -> String {
    let mut buffer = [0x0; COMMAND_SIZE];
    let length = command.write(&mut buffer);
    String::from_utf8(buffer[..length].to_vec()).unwrap()
}

#[test]
fn test_plain_commands() {
    assert_eq!("AT\r\n", encode(&AttentionCommand));
    assert_eq!("AT+RST\r\n", encode(&RestartCommand));
    assert_eq!("AT+CWLAP\r\n", encode(&ListAccessPointsCommand));
    assert_eq!("AT+CIFSR\r\n", encode(&ObtainLocalAddressCommand));
}

#[test]
fn test_numeric_arguments() {
    assert_eq!("AT+CWMODE=3\r\n", encode(&WifiModeCommand::new(WifiMode::Both)));
    assert_eq!("AT+CIPMUX=1\r\n", encode(&SetMultipleConnectionsCommand::multiple()));
    assert_eq!("AT+CIPSERVER=1,8000\r\n", encode(&ServerCommand::new(1, 8000)));
    assert_eq!("AT+CIPSTO=300\r\n", encode(&ServerTimeoutCommand::new(300)));
    assert_eq!("AT+CIPSEND=2,74\r\n", encode(&TransmissionPrepareCommand::new(2, 74)));
}

#[test]
fn test_join_command_quotes_credentials() {
    let command = AccessPointConnectCommand::new("home", "secret123").unwrap();
    assert_eq!("AT+CWJAP=\"home\",\"secret123\"\r\n", encode(&command));
}

#[test]
fn test_join_command_credentials_too_long() {
    assert_eq!(
        JoinError::InvalidSSIDLength,
        AccessPointConnectCommand::new(&"s".repeat(33), "secret").err().unwrap()
    );
    assert_eq!(
        JoinError::InvalidPasswordLength,
        AccessPointConnectCommand::new("home", &"p".repeat(65)).err().unwrap()
    );
}

#[test]
fn test_connect_command_protocols() {
    let tcp = ConnectCommand::tcp(3, "10.0.0.1", 21).unwrap();
    assert_eq!("AT+CIPSTART=3,\"TCP\",\"10.0.0.1\",21\r\n", encode(&tcp));
    assert_eq!(Error::ClientConnectFailed, tcp.unconfirmed());

    let udp = ConnectCommand::udp(2, "192.168.1.255", 34807).unwrap();
    assert_eq!("AT+CIPSTART=2,\"UDP\",\"192.168.1.255\",34807\r\n", encode(&udp));
    assert_eq!(Error::UdpChannelFailed, udp.unconfirmed());
}

#[test]
fn test_connect_command_host_too_long() {
    assert!(ConnectCommand::tcp(3, &"h".repeat(64), 21).is_ok());
    assert_eq!(Error::HostTooLong, ConnectCommand::tcp(3, &"h".repeat(65), 21).err().unwrap());
}

#[test]
fn test_confirmation_tokens() {
    assert_eq!(b"OK", AttentionCommand::CONFIRMATION);
    assert_eq!(b"ready", RestartCommand::CONFIRMATION);
}

#[test]
fn test_encoded_commands_fit_buffer() {
    assert!(AccessPointConnectCommand::MAX_LEN <= COMMAND_SIZE);
    assert!(ConnectCommand::MAX_LEN <= COMMAND_SIZE);
    assert!(TransmissionPrepareCommand::MAX_LEN <= COMMAND_SIZE);
}
