//! Input decoding for the TUI
//!
//! Turns the raw byte stream from a terminal in raw mode into key events.
//! Escape sequences are only completed from bytes that already arrived, so a
//! lone ESC never waits for more input.

use std::io::{BufRead, BufReader, ErrorKind, Read};

use super::TuiError;

/// TUI events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Printable character, possibly multi-byte
    Char(char),
    Enter,
    Esc,
    /// Backspace or DEL
    Backspace,
    /// Quit control (ctrl+c)
    CtrlC,
    /// Other control byte, as its letter (`Ctrl('u')` for 0x15)
    Ctrl(char),
    Up,
    Down,
    PageUp,
    PageDown,
    /// Terminal resize (columns, rows)
    Resize(u16, u16),
    /// Bytes that do not form a known key
    Unknown,
}

impl Event {
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Event::Char(got) if *got == c)
    }
}

/// Decoder reading events from a byte source
pub struct EventHandler<R> {
    reader: BufReader<R>,
}

impl<R: Read> EventHandler<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Block until the next event. Fails only when input ends or errors.
    pub fn next(&mut self) -> Result<Event, TuiError> {
        let byte = self.read_byte()?.ok_or(TuiError::InputClosed)?;
        let event = match byte {
            0x03 => Event::CtrlC,
            b'\r' | b'\n' => Event::Enter,
            0x7f | 0x08 => Event::Backspace,
            0x1b => self.escape(),
            0x01..=0x1a => Event::Ctrl(char::from(b'a' + byte - 1)),
            0x20..=0x7e => Event::Char(char::from(byte)),
            0x80..=0xff => self.multibyte(byte)?,
            _ => Event::Unknown,
        };
        Ok(event)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, TuiError> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(TuiError::Input(e)),
            }
        }
    }

    /// Next byte if it has already been read from the source
    fn peek_buffered(&self) -> Option<u8> {
        self.reader.buffer().first().copied()
    }

    fn take_buffered(&mut self) -> Option<u8> {
        let byte = self.peek_buffered()?;
        self.reader.consume(1);
        Some(byte)
    }

    fn escape(&mut self) -> Event {
        if self.peek_buffered() != Some(b'[') {
            return Event::Esc;
        }
        self.reader.consume(1);

        match self.take_buffered() {
            Some(b'A') => Event::Up,
            Some(b'B') => Event::Down,
            Some(digit @ b'0'..=b'9') => {
                if self.peek_buffered() != Some(b'~') {
                    return Event::Unknown;
                }
                self.reader.consume(1);
                match digit {
                    b'5' => Event::PageUp,
                    b'6' => Event::PageDown,
                    _ => Event::Unknown,
                }
            }
            _ => Event::Esc,
        }
    }

    /// Next byte if it is a UTF-8 continuation byte, left unread otherwise
    fn peek_continuation(&mut self) -> Result<Option<u8>, TuiError> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied().filter(|b| b & 0xc0 == 0x80)),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(TuiError::Input(e)),
            }
        }
    }

    fn multibyte(&mut self, lead: u8) -> Result<Event, TuiError> {
        let len = match lead {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Ok(Event::Unknown),
        };
        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(len).skip(1) {
            // a byte that cannot continue the character starts the next event
            match self.peek_continuation()? {
                Some(b) => {
                    *slot = b;
                    self.reader.consume(1);
                }
                None => return Ok(Event::Unknown),
            }
        }
        Ok(std::str::from_utf8(&buf[..len])
            .ok()
            .and_then(|s| s.chars().next())
            .map_or(Event::Unknown, Event::Char))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> Vec<Event> {
        let mut handler = EventHandler::new(bytes);
        let mut events = Vec::new();
        while let Ok(event) = handler.next() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_control_bytes() {
        assert_eq!(
            decode_all(b"\x03\r\n\x7f\x15"),
            vec![
                Event::CtrlC,
                Event::Enter,
                Event::Enter,
                Event::Backspace,
                Event::Ctrl('u')
            ]
        );
    }

    #[test]
    fn test_arrows_and_pages() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B\x1b[5~\x1b[6~"),
            vec![Event::Up, Event::Down, Event::PageUp, Event::PageDown]
        );
    }

    #[test]
    fn test_lone_escape() {
        assert_eq!(decode_all(b"\x1b"), vec![Event::Esc]);
        assert_eq!(decode_all(b"\x1bq"), vec![Event::Esc, Event::Char('q')]);
    }

    #[test]
    fn test_unknown_sequences() {
        assert_eq!(decode_all(b"\x1b[3~"), vec![Event::Unknown]);
        assert_eq!(decode_all(b"\x1b[5x"), vec![Event::Unknown, Event::Char('x')]);
        assert_eq!(decode_all(b"\x1b[C"), vec![Event::Esc]);
    }

    #[test]
    fn test_utf8_characters() {
        assert_eq!(
            decode_all("é日🙂".as_bytes()),
            vec![Event::Char('é'), Event::Char('日'), Event::Char('🙂')]
        );
    }

    #[test]
    fn test_malformed_utf8_is_unknown() {
        assert_eq!(decode_all(&[0xff, b'a']), vec![Event::Unknown, Event::Char('a')]);
        assert_eq!(decode_all(&[0xe6, 0x97]), vec![Event::Unknown]);
        assert_eq!(decode_all(&[0xc3, b'q']), vec![Event::Unknown, Event::Char('q')]);
        assert_eq!(decode_all(&[0xc3, b'\r']), vec![Event::Unknown, Event::Enter]);
        assert_eq!(decode_all(b"\xe6\x1b[A"), vec![Event::Unknown, Event::Up]);
    }

    #[test]
    fn test_end_of_input_is_error() {
        let mut handler = EventHandler::new(&b""[..]);
        assert!(matches!(handler.next(), Err(TuiError::InputClosed)));
    }
}
