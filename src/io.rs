//! One-character-at-a-time input and output boundaries for the evaluator.

use std::io::{self, Read, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// Source of characters for `,`.
pub trait Input {
    /// Read exactly one character. `Ok(None)` means no input is left.
    fn read_char(&mut self) -> io::Result<Option<char>>;
}

/// Sink for characters written by `.`.
pub trait Output {
    fn write_char(&mut self, byte: u8) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Decodes UTF-8 characters one at a time from any [`Read`] (a file, piped
/// stdin, a byte slice).
///
/// Only the bytes of the character being decoded are consumed. Malformed or
/// truncated sequences fail with [`io::ErrorKind::InvalidData`].
pub struct StreamInput<R> {
    inner: R,
}

impl<R: Read> StreamInput<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Input for StreamInput<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };
        let width = utf8_width(lead).ok_or_else(|| invalid_utf8(&[lead]))?;

        let mut buf = [lead, 0, 0, 0];
        for i in 1..width {
            match self.read_byte()? {
                Some(b) => buf[i] = b,
                None => return Err(invalid_utf8(&buf[..i])),
            }
        }
        let text = std::str::from_utf8(&buf[..width]).map_err(|_| invalid_utf8(&buf[..width]))?;
        Ok(text.chars().next())
    }
}

/// Encoded length announced by a UTF-8 leading byte.
fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn invalid_utf8(bytes: &[u8]) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("input is not valid UTF-8 (bytes {bytes:02x?})"),
    )
}

/// Writes bytes to any [`Write`] (stdout, a file, a `Vec<u8>`).
pub struct StreamOutput<W> {
    inner: W,
}

impl<W: Write> StreamOutput<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Output for StreamOutput<W> {
    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        self.inner.write_all(&[byte])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Reads one raw keystroke at a time from the controlling terminal.
///
/// Raw mode is only held for the duration of a single read, so program
/// output written between reads renders normally.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    pub fn new() -> Self {
        Self
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TerminalInput {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key_to_char(key) {
                    KeyChar::Char(c) => return Ok(Some(c)),
                    KeyChar::Eof => return Ok(None),
                    KeyChar::Interrupt => return Err(io::Error::from(io::ErrorKind::Interrupted)),
                    KeyChar::Ignored => {}
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyChar {
    Char(char),
    Eof,
    Interrupt,
    Ignored,
}

fn key_to_char(key: KeyEvent) -> KeyChar {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => KeyChar::Interrupt,
        KeyCode::Char('d') if ctrl => KeyChar::Eof,
        // Ctrl+A..Ctrl+Z are the control codes 0x01..0x1a.
        KeyCode::Char(c) if ctrl && c.is_ascii_alphabetic() => {
            KeyChar::Char(char::from(c.to_ascii_lowercase() as u8 - b'a' + 1))
        }
        KeyCode::Char(c) => KeyChar::Char(c),
        KeyCode::Enter => KeyChar::Char('\r'),
        KeyCode::Tab => KeyChar::Char('\t'),
        KeyCode::Backspace => KeyChar::Char('\u{8}'),
        KeyCode::Esc => KeyChar::Char('\u{1b}'),
        _ => KeyChar::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_input_reads_one_character_at_a_time() {
        let mut input = StreamInput::new("aé€😀b".as_bytes());
        assert_eq!(input.read_char().unwrap(), Some('a'));
        assert_eq!(input.read_char().unwrap(), Some('é'));
        assert_eq!(input.read_char().unwrap(), Some('€'));
        assert_eq!(input.read_char().unwrap(), Some('😀'));
        assert_eq!(input.read_char().unwrap(), Some('b'));
        assert_eq!(input.read_char().unwrap(), None);
    }

    #[test]
    fn stream_input_rejects_malformed_utf8() {
        let cases: [&[u8]; 5] = [&[0xC1], &[0x80], &[0xC3, 0x28], &[0xE2, 0x82], &[0xED, 0xA0, 0x80]];
        for bytes in cases {
            let mut input = StreamInput::new(bytes);
            let err = input.read_char().unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidData, "bytes {bytes:x?}");
        }
    }

    #[test]
    fn stream_output_collects_bytes() {
        let mut out = StreamOutput::new(Vec::new());
        out.write_char(b'h').unwrap();
        out.write_char(b'i').unwrap();
        out.flush().unwrap();
        assert_eq!(out.into_inner(), b"hi");
    }

    #[test]
    fn keys_map_like_a_raw_getch() {
        let key = |code, modifiers| KeyEvent::new(code, modifiers);
        assert_eq!(key_to_char(key(KeyCode::Char('Z'), KeyModifiers::SHIFT)), KeyChar::Char('Z'));
        assert_eq!(key_to_char(key(KeyCode::Char('é'), KeyModifiers::NONE)), KeyChar::Char('é'));
        assert_eq!(key_to_char(key(KeyCode::Enter, KeyModifiers::NONE)), KeyChar::Char('\r'));
        assert_eq!(key_to_char(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), KeyChar::Interrupt);
        assert_eq!(key_to_char(key(KeyCode::Char('d'), KeyModifiers::CONTROL)), KeyChar::Eof);
        assert_eq!(key_to_char(key(KeyCode::Char('a'), KeyModifiers::CONTROL)), KeyChar::Char('\u{1}'));
        assert_eq!(key_to_char(key(KeyCode::Left, KeyModifiers::NONE)), KeyChar::Ignored);
    }
}
