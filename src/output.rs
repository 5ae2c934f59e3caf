// src/output.rs

//! Terminal output helpers for the command-line front-end

use crossterm::style::Stylize;
use serde::Serialize;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

/// Width used when stdout is not a terminal
const DEFAULT_WIDTH: usize = 80;

/// Narrowest column allowed for wrapped descriptions
const MIN_DESCRIPTION_WIDTH: usize = 20;

/// One row of `list-available` / `list-installed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRow {
    pub name: String,
    pub description: String,
    pub installed: bool,
    pub pspec: PathBuf,
}

/// Whether ANSI styling should be emitted on stdout
pub fn use_color() -> bool {
    io::stdout().is_terminal()
}

/// Current terminal width in columns
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(columns, _)| columns as usize)
        .ok()
        .filter(|&columns| columns > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Greedy word wrap measured in display columns
///
/// Words longer than `width` are kept whole on their own line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render rows as `name - description`, names right-aligned and
/// descriptions wrapped with a hanging indent
///
/// Installed packages are highlighted when `color` is set.
pub fn render_rows(rows: &[PackageRow], total_width: usize, color: bool) -> String {
    let Some(name_width) = rows.iter().map(|row| row.name.width()).max() else {
        return String::new();
    };
    let head_width = name_width + 1;
    let indent = head_width + 3;
    let description_width = total_width
        .saturating_sub(indent)
        .max(MIN_DESCRIPTION_WIDTH);

    let mut out = String::new();
    for row in rows {
        let padding = " ".repeat(head_width - row.name.width());
        let head = format!("{}{}", padding, row.name);
        let head = if color && row.installed {
            head.green().to_string()
        } else {
            head
        };

        let lines = wrap(&row.description, description_width);
        out.push_str(&head);
        out.push_str(" -");
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                out.push(' ');
            } else {
                out.push('\n');
                out.push_str(&" ".repeat(indent));
            }
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Styled name for "will be installed/upgraded" listings
pub fn highlight(name: &str, color: bool) -> String {
    if color {
        name.cyan().to_string()
    } else {
        name.to_string()
    }
}

/// Styled warning line
pub fn warning(message: &str, color: bool) -> String {
    if color {
        message.yellow().to_string()
    } else {
        message.to_string()
    }
}

/// Styled error line
pub fn error(message: &str, color: bool) -> String {
    if color {
        message.red().bold().to_string()
    } else {
        message.to_string()
    }
}

/// Ask a yes/no question; an empty answer means yes
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    loop {
        write!(output, "{} [Y/n]: ", question)?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            // EOF: nobody to ask
            writeln!(output)?;
            return Ok(false);
        }

        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" | "" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please enter Y or n.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn row(name: &str, description: &str, installed: bool) -> PackageRow {
        PackageRow {
            name: name.to_string(),
            description: description.to_string(),
            installed,
            pspec: PathBuf::from(format!("/repo/{name}/pspec.xml")),
        }
    }

    #[test]
    fn test_wrap() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
        assert_eq!(wrap("  spaced\n\tout  ", 80), vec!["spaced out"]);
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn test_wrap_long_word() {
        assert_eq!(
            wrap("a supercalifragilistic b", 5),
            vec!["a", "supercalifragilistic", "b"]
        );
    }

    #[test]
    fn test_render_rows_aligns_names() {
        let rows = vec![
            row("spotify", "Music streaming", false),
            row("skype", "Calls", true),
        ];

        let rendered = render_rows(&rows, 80, false);

        assert_eq!(rendered, " spotify - Music streaming\n   skype - Calls\n");
    }

    #[test]
    fn test_render_rows_hanging_indent() {
        let rows = vec![row("foo", "one two three four five six", false)];

        // indent = 3 + 1 + 3 = 7, so descriptions get MIN_DESCRIPTION_WIDTH
        let rendered = render_rows(&rows, 7 + 20, false);

        assert_eq!(rendered, " foo - one two three four\n       five six\n");
    }

    #[test]
    fn test_render_rows_empty() {
        assert_eq!(render_rows(&[], 80, true), "");
    }

    #[test]
    fn test_render_rows_highlights_installed() {
        let rows = vec![row("foo", "x", true), row("bar", "y", false)];

        let rendered = render_rows(&rows, 80, true);
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].contains("foo") && lines[0].ends_with(" - x"));
        assert_eq!(lines[1], " bar - y");
    }

    #[test]
    fn test_confirm_answers() {
        let mut out = Vec::new();
        assert!(confirm("Continue?", &mut Cursor::new("\n"), &mut out).unwrap());
        assert!(confirm("Continue?", &mut Cursor::new("yes\n"), &mut out).unwrap());
        assert!(!confirm("Continue?", &mut Cursor::new("n\n"), &mut out).unwrap());
        assert!(!confirm("Continue?", &mut Cursor::new(""), &mut out).unwrap());
    }

    #[test]
    fn test_confirm_reprompts() {
        let mut out = Vec::new();
        let answer = confirm("Continue?", &mut Cursor::new("maybe\nY\n"), &mut out).unwrap();

        assert!(answer);
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("Continue? [Y/n]: ").count(), 2);
        assert!(out.contains("Please enter Y or n."));
    }

    #[test]
    fn test_rows_serialize() {
        let json = serde_json::to_value(vec![row("foo", "x", true)]).unwrap();
        assert_eq!(json[0]["name"], "foo");
        assert_eq!(json[0]["installed"], true);
        assert_eq!(json[0]["pspec"], "/repo/foo/pspec.xml");
    }
}
