use std::fmt;

/// One effect declaration as it arrives from the caller
///
/// Items are either already tokenized (`["0", "3", "fade", "in", "1.0"]`) or a
/// single space-separated line (`"0 3 fade in 1.0"`). In a line, `'...'` or
/// `"..."` keeps spaces inside one token: `"0 5 drawtext 'Hello World'"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectItem {
    Tokens(Vec<String>),
    Line(String),
}

impl EffectItem {
    /// Token list for this item, splitting shorthand lines
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Line(line) => split_line(line),
            Self::Tokens(tokens) if tokens.len() == 1 && tokens[0].contains(char::is_whitespace) => {
                split_line(&tokens[0])
            }
            Self::Tokens(tokens) => tokens.clone(),
        }
    }
}

fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for c in line.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    // An unclosed quote runs to the end of the line
    if in_token {
        tokens.push(current);
    }
    tokens
}

impl From<&str> for EffectItem {
    fn from(line: &str) -> Self {
        Self::Line(line.to_string())
    }
}

impl From<String> for EffectItem {
    fn from(line: String) -> Self {
        Self::Line(line)
    }
}

impl From<Vec<String>> for EffectItem {
    fn from(tokens: Vec<String>) -> Self {
        Self::Tokens(tokens)
    }
}

impl From<Vec<&str>> for EffectItem {
    fn from(tokens: Vec<&str>) -> Self {
        Self::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

/// Half-open time interval `[start, end)` in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s-{:.3}s", self.start, self.end)
    }
}

/// A parsed effect declaration
///
/// `start < end` always holds. `index` is the item's position in the caller's
/// input and is what error reports refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSpec {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub kind: String,
    pub raw_params: Vec<String>,
}

impl EffectSpec {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_is_split() {
        let item = EffectItem::from("0  3 fade in\t1.0");
        assert_eq!(item.tokens(), vec!["0", "3", "fade", "in", "1.0"]);
    }

    #[test]
    fn test_single_token_with_spaces_is_split() {
        let item = EffectItem::Tokens(vec!["1 2 boxblur".to_string()]);
        assert_eq!(item.tokens(), vec!["1", "2", "boxblur"]);
    }

    #[test]
    fn test_quoted_text_stays_one_token() {
        let item = EffectItem::from("0 5 drawtext 'Hello World' 10 \"it's\"");
        assert_eq!(item.tokens(), vec!["0", "5", "drawtext", "Hello World", "10", "it's"]);
    }

    #[test]
    fn test_empty_quotes_give_empty_token() {
        let item = EffectItem::from("0 5 drawtext ''");
        assert_eq!(item.tokens(), vec!["0", "5", "drawtext", ""]);
    }

    #[test]
    fn test_tokens_are_kept() {
        let item = EffectItem::from(vec!["0", "2", "drawtext", "hello world"]);
        assert_eq!(item.tokens()[3], "hello world");
    }

    #[test]
    fn test_window_display_and_duration() {
        let window = TimeWindow::new(1.0, 2.5);
        assert_eq!(window.duration(), 1.5);
        assert_eq!(window.to_string(), "1.000s-2.500s");
    }
}
