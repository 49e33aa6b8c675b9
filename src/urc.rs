use core::ops::Range;

/// Classified unsolicited message, parsed from a single line without line termination
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum URCMessages {
    /// A session was established
    Link,
    /// A session was closed
    Unlink,
    /// Inbound data packet `+IPD,<channel>,<length>:<payload>`
    Data {
        /// Logical channel the data was received on
        channel: usize,

        /// Announced payload length
        length: usize,

        /// Position of the payload inside the line. None if the announced length is zero or no
        /// payload separator was found.
        payload: Option<Range<usize>>,
    },
    /// Socket with the given channel connected
    SocketConnected(usize),
    /// Socket with the given channel closed
    SocketClosed(usize),
    /// A general error happened
    Error,
    /// Unknown message
    Unknown,
}

const DATA_PREFIX: &[u8] = b"+IPD,";

impl URCMessages {
    pub fn parse(line: &[u8]) -> Self {
        match line {
            b"Link" => return Self::Link,
            b"Unlink" => return Self::Unlink,
            b"ERROR" => return Self::Error,
            _ => {}
        }

        if line.starts_with(DATA_PREFIX) {
            return Self::parse_data(line).unwrap_or(Self::Unknown);
        }

        if line.len() > 2 {
            match &line[1..] {
                b",CONNECT" => return Self::parse_channel(line[0]).map_or(Self::Unknown, Self::SocketConnected),
                b",CLOSED" => return Self::parse_channel(line[0]).map_or(Self::Unknown, Self::SocketClosed),
                _ => {}
            }
        }

        Self::Unknown
    }

    /// Parses the header `<channel>,<length>` and locates the payload
    fn parse_data(line: &[u8]) -> Option<Self> {
        let header_end = line
            .iter()
            .position(|byte| *byte == b':')
            .unwrap_or(line.len());

        let header = core::str::from_utf8(&line[DATA_PREFIX.len()..header_end]).ok()?;
        let (channel, length) = header.split_once(',')?;
        let channel = channel.trim().parse::<usize>().ok()?;
        let length = length.trim().parse::<usize>().ok()?;

        let payload = if length > 0 && header_end < line.len() {
            let start = header_end + 1;
            let end = line.len().min(start.saturating_add(length));
            Some(start..end)
        } else {
            None
        };

        Some(Self::Data {
            channel,
            length,
            payload,
        })
    }

    /// Parses the channel of socket state messages. Currently supports just channel 0-4
    fn parse_channel(channel: u8) -> Option<usize> {
        match channel {
            b'0'..=b'4' => Some((channel - b'0') as usize),
            _ => None,
        }
    }
}
