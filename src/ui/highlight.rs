use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

const THEME: &str = "Solarized (dark)";
const RESET: &str = "\x1b[0m";

/// Terminal syntax highlighting for JSON payloads.
pub struct JsonHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl JsonHighlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Highlight `json`, falling back to the plain text when the theme or
    /// grammar is unavailable or a line fails to highlight.
    pub fn highlight(&self, json: &str) -> String {
        let Some(theme) = self.theme_set.themes.get(THEME) else {
            return json.to_string();
        };
        let syntax = self
            .syntax_set
            .find_syntax_by_extension("json")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::new();

        for line in LinesWithEndings::from(json) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    let ranges: Vec<(Style, &str)> = ranges;
                    output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
                }
                Err(_) => return json.to_string(),
            }
        }

        output.push_str(RESET);
        output
    }
}

impl Default for JsonHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
