use std::io::{self, Write};

use nu_ansi_term::Style;

use crate::config::Colors;
use crate::theme::catppuccin::Mocha;
use crate::BrainfuckError;

/// How diagnostics and the completion notice are styled.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub colors: Colors,
    /// Style stderr diagnostics.
    pub diagnostics: bool,
    /// Style the stdout completion notice.
    pub notice: bool,
}

impl Palette {
    pub fn plain() -> Self {
        Self {
            colors: Colors::default(),
            diagnostics: false,
            notice: false,
        }
    }

    fn paint(enabled: bool, style: Style, text: &str) -> String {
        if enabled {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Write a classified diagnostic: a bold kind label, the message, and for
/// parse-time errors a caret context window over the filtered source.
pub fn write_reader_error<W: Write>(
    w: &mut W,
    program: Option<&str>,
    code: &str,
    err: &BrainfuckError,
    palette: &Palette,
) -> io::Result<()> {
    let label = Palette::paint(
        palette.diagnostics,
        palette.colors.error.bold(),
        &format!("{}:", err.kind()),
    );
    match program {
        Some(p) => writeln!(w, "{p}: {label} {err}")?,
        None => writeln!(w, "{label} {err}")?,
    }
    if let Some(pos) = err.position() {
        write_context(w, code, pos, palette)?;
    }
    Ok(())
}

/// Pretty-print a structured [`BrainfuckError`] to stderr.
/// If `program` is `Some("bf")`, prefix messages with "bf: ...".
pub fn print_reader_error(program: Option<&str>, code: &str, err: &BrainfuckError, palette: &Palette) {
    let mut stderr = io::stderr().lock();
    let _ = write_reader_error(&mut stderr, program, code, err, palette);
    let _ = stderr.flush();
}

/// The "(Finished execution)" line printed after a successful run.
pub fn finished_notice(palette: &Palette) -> String {
    Palette::paint(palette.notice, palette.colors.notice.normal(), "(Finished execution)")
}

/// Show a short window of `code` around `pos` with a caret under it,
/// slicing by char index so UTF-8 input stays intact.
fn write_context<W: Write>(w: &mut W, code: &str, pos: usize, palette: &Palette) -> io::Result<()> {
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    let slice = &code[start_byte..end_byte];

    writeln!(w, "  {}", Palette::paint(palette.diagnostics, Mocha::SURFACE2.normal(), slice))?;

    let caret_offset_chars = pos.saturating_sub(start_char);
    let underline = format!("{}^", " ".repeat(caret_offset_chars));
    writeln!(w, "  {}", Palette::paint(palette.diagnostics, Mocha::PEACH.bold(), &underline))
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RuntimeFault, UnmatchedBracketKind};

    fn render(err: &BrainfuckError, code: &str) -> String {
        let mut buf = Vec::new();
        write_reader_error(&mut buf, Some("bf"), code, err, &Palette::plain()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn syntax_error_shows_label_and_caret() {
        let err = BrainfuckError::Syntax { pos: 3, kind: UnmatchedBracketKind::Close };
        let text = render(&err, "+-.]+");
        assert_eq!(
            text,
            "bf: SyntaxError: unmatched bracket ']' at instruction 3\n  +-.]+\n     ^\n"
        );
    }

    #[test]
    fn runtime_error_has_no_context_window() {
        let err = BrainfuckError::from(RuntimeFault::EndOfInput);
        let text = render(&err, ",");
        assert_eq!(text, "bf: RuntimeError: input exhausted while reading a character\n");
    }

    #[test]
    fn context_window_is_clipped_around_position() {
        let code = "+".repeat(100);
        let err = BrainfuckError::Syntax { pos: 50, kind: UnmatchedBracketKind::Open };
        let text = render(&err, &code);
        let window = text.lines().nth(1).unwrap().trim_start();
        assert_eq!(window.len(), 65);
        let caret = text.lines().nth(2).unwrap();
        assert_eq!(caret.find('^'), Some(2 + 32));
    }

    #[test]
    fn colored_label_contains_escape_codes() {
        let palette = Palette { diagnostics: true, ..Palette::plain() };
        let err = BrainfuckError::RecursionLimit { depth: 101, limit: 100 };
        let mut buf = Vec::new();
        write_reader_error(&mut buf, None, "", &err, &palette).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("RecursionError:"));
    }

    #[test]
    fn char_index_handles_multibyte() {
        assert_eq!(char_to_byte_index("aλb", 0), 0);
        assert_eq!(char_to_byte_index("aλb", 2), 3);
        assert_eq!(char_to_byte_index("aλb", 9), 4);
    }

    #[test]
    fn plain_notice_has_no_escapes() {
        assert_eq!(finished_notice(&Palette::plain()), "(Finished execution)");
    }
}
