//! Query auto-indentation
//!
//! Re-indents a query by parenthesis depth while the user is typing, keeping
//! the selection attached to the same text. Two spaces per open paren; a
//! line starting with `)` is outdented once per leading `)`.

/// A selection (or caret when `start == end`) in char offsets.
///
/// `end < start` means the selection was made backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Selection spanning `start..end`
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Empty selection at `pos`
    pub fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Whether the selection runs forwards (or is a caret)
    pub fn is_forward(&self) -> bool {
        self.start <= self.end
    }
}

/// Result of [`format_query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    /// Re-indented text
    pub text: String,
    /// Selection mapped onto `text`
    pub selection: Selection,
    changed: bool,
}

impl Formatted {
    /// Whether formatting altered the text
    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// Indentation unit per level of paren nesting
const INDENT: &str = "  ";

/// Re-indent `text` by paren depth and remap `selection` onto the result
pub fn format_query(text: &str, selection: Selection) -> Formatted {
    let char_len = text.chars().count();
    let forward = selection.is_forward();
    let (lo, hi) = if forward {
        (selection.start, selection.end)
    } else {
        (selection.end, selection.start)
    };
    let lo = lo.min(char_len);
    let hi = hi.min(char_len);

    let lo_byte = byte_offset(text, lo);
    let hi_byte = byte_offset(text, hi);
    let pieces = [&text[..lo_byte], &text[lo_byte..hi_byte], &text[hi_byte..]];

    let mut depth: i64 = 0;
    let mut formatted = [String::new(), String::new(), String::new()];

    for (piece_idx, piece) in pieces.iter().enumerate() {
        let out = &mut formatted[piece_idx];
        let last_piece = piece_idx == pieces.len() - 1;
        let lines: Vec<&str> = piece.split('\n').collect();

        for (i, line) in lines.iter().enumerate() {
            // The first line of a later piece continues a line started earlier.
            let starts_line = i > 0 || piece_idx == 0;
            let ends_line = i + 1 < lines.len() || last_piece;

            let mut content: &str = line;
            if starts_line {
                content = content.trim_start_matches([' ', '\t']);
            }
            if ends_line {
                content = content.trim_end_matches(['\t', '\n']);
            }

            if i > 0 {
                out.push('\n');
            }
            if starts_line {
                let leading_close = content.chars().take_while(|&c| c == ')').count() as i64;
                let level = (depth - leading_close).max(0) as usize;
                out.push_str(&INDENT.repeat(level));
            }
            out.push_str(content);

            depth += line.matches('(').count() as i64 - line.matches(')').count() as i64;
        }
    }

    let new_lo = formatted[0].chars().count();
    let new_hi = new_lo + formatted[1].chars().count();
    let selection = if forward {
        Selection::new(new_lo, new_hi)
    } else {
        Selection::new(new_hi, new_lo)
    };

    let text_out = formatted.concat();
    let changed = text_out != text;
    Formatted {
        text: text_out,
        selection,
        changed,
    }
}

/// Byte index of the `char_idx`-th char, or the end of the string
fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_end(text: &str) -> Formatted {
        let len = text.chars().count();
        format_query(text, Selection::caret(len))
    }

    #[test]
    fn test_single_line_unchanged() {
        let out = at_end("up{job=\"node\"}");
        assert_eq!(out.text, "up{job=\"node\"}");
        assert!(!out.changed());
    }

    #[test]
    fn test_nested_parens_indented() {
        let out = at_end("sum(\nrate(x[5m])\n)");
        assert_eq!(out.text, "sum(\n  rate(x[5m])\n)");
        assert!(out.changed());
        assert_eq!(out.selection, Selection::caret(out.text.chars().count()));
    }

    #[test]
    fn test_existing_indentation_normalized() {
        let out = at_end("a(\n        b(\n\t\t\tc\n    )\n)");
        assert_eq!(out.text, "a(\n  b(\n    c\n  )\n)");
    }

    #[test]
    fn test_excess_close_parens_do_not_underflow() {
        let out = at_end("x)\n))\ny");
        assert_eq!(out.text, "x)\n))\ny");
    }

    #[test]
    fn test_caret_follows_indented_line() {
        // Caret right after the newline, before "bar)"
        let out = format_query("foo(\nbar)", Selection::caret(5));
        assert_eq!(out.text, "foo(\n  bar)");
        assert_eq!(out.selection, Selection::caret(7));
    }

    #[test]
    fn test_spaces_inside_a_line_are_kept() {
        // Caret in the middle of a line must not eat the following space
        let out = format_query("a b", Selection::caret(1));
        assert_eq!(out.text, "a b");
        assert_eq!(out.selection, Selection::caret(1));
    }

    #[test]
    fn test_backward_selection_preserved() {
        let text = "f(\nx\n)";
        // Select "x" backwards
        let out = format_query(text, Selection::new(4, 3));
        assert_eq!(out.text, "f(\n  x\n)");
        assert!(!out.selection.is_forward());
        let (lo, hi) = (out.selection.end, out.selection.start);
        let selected: String = out.text.chars().skip(lo).take(hi - lo).collect();
        assert_eq!(selected, "x");
    }

    #[test]
    fn test_multibyte_text() {
        let out = at_end("é(\nü)");
        assert_eq!(out.text, "é(\n  ü)");
        assert_eq!(out.selection, Selection::caret(7));
    }

    #[test]
    fn test_out_of_range_selection_clamped() {
        let out = format_query("abc", Selection::new(10, 20));
        assert_eq!(out.text, "abc");
        assert_eq!(out.selection, Selection::new(3, 3));
    }
}
