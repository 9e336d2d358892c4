use crate::parser::Symbol;

/// Keep only instruction characters, in their original order.
///
/// Everything outside `><+-.,[]` is treated as commentary and dropped.
pub fn filter(text: &str) -> String {
    text.chars().filter(|&c| Symbol::from_char(c).is_some()).collect()
}
