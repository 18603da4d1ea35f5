//! Line-fed parser for Conventional Commits v1.0.0 messages.
//!
//! See https://www.conventionalcommits.org/en/v1.0.0/

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static SUBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>\w+)(?:\((?P<scope>[\w\-./]+)\))?(?P<breaking>!)?: (?P<description>.+)$")
        .unwrap()
});

static FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<token>BREAKING CHANGE|BREAKING-CHANGE|\w+(?:-\w+)*): (?P<value>.*)$").unwrap()
});

const BREAKING_CHANGE_TOKENS: [&str; 2] = ["BREAKING CHANGE", "BREAKING-CHANGE"];

/// Parser state; each fed line moves the parser to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectSubject,
    ExpectBlank,
    ExpectBodyOrFooter,
    InFooter,
    Done,
    Rejected,
}

/// Fields extracted from a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedMessage {
    pub r#type: String,
    pub description: String,
    pub scope: Option<String>,
    pub body: Option<String>,
    pub breaking_changes: Vec<String>,
    pub footers: IndexMap<String, String>,
}

/// Single-pass state machine over commit message lines.
///
/// Feed the message one line at a time (without line terminators), then
/// feed an empty line as the flush sentinel and call [`finish`].
///
/// [`finish`]: ConventionalCommitParser::finish
#[derive(Debug)]
pub struct ConventionalCommitParser {
    state: State,
    output: ParsedMessage,
    body: Vec<String>,
    footer: Option<(String, Vec<String>)>,
    pending_blank_lines: usize,
}

impl Default for ConventionalCommitParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConventionalCommitParser {
    pub fn new() -> Self {
        ConventionalCommitParser {
            state: State::ExpectSubject,
            output: ParsedMessage::default(),
            body: Vec::new(),
            footer: None,
            pending_blank_lines: 0,
        }
    }

    /// Parse a whole message; `None` means it is not a conventional commit.
    pub fn parse(message: &str) -> Option<ParsedMessage> {
        let mut parser = Self::new();
        for line in message.lines() {
            if !parser.feed(line) {
                return None;
            }
        }
        parser.feed("");
        parser.finish()
    }

    /// Feed the next line. Returns `false` once the message is known not to
    /// be a conventional commit.
    pub fn feed(&mut self, line: &str) -> bool {
        self.state = match self.state {
            State::ExpectSubject => self.on_subject(line),
            State::ExpectBlank => {
                if line.is_empty() {
                    State::ExpectBodyOrFooter
                } else {
                    State::Rejected
                }
            }
            State::ExpectBodyOrFooter => self.on_body_or_footer(line),
            State::InFooter => self.on_footer(line),
            State::Done => State::Done,
            State::Rejected => State::Rejected,
        };
        self.state != State::Rejected
    }

    /// Close the message and return the parsed fields.
    ///
    /// The parser is done afterwards: further lines are ignored and another
    /// `finish` returns `None`.
    pub fn finish(&mut self) -> Option<ParsedMessage> {
        match self.state {
            State::Rejected | State::ExpectSubject | State::Done => return None,
            _ => {}
        }
        self.close_footer();
        trim_trailing_blank(&mut self.body);
        if !self.body.is_empty() {
            self.output.body = Some(self.body.join("\n"));
        }
        self.body.clear();
        self.state = State::Done;
        Some(std::mem::take(&mut self.output))
    }

    fn on_subject(&mut self, line: &str) -> State {
        let Some(captures) = SUBJECT_RE.captures(line) else {
            return State::Rejected;
        };
        let description = captures["description"].to_string();
        self.output.r#type = captures["type"].to_string();
        self.output.scope = captures.name("scope").map(|m| m.as_str().to_string());
        if captures.name("breaking").is_some() {
            self.output.breaking_changes.push(description.clone());
        }
        self.output.description = description;
        State::ExpectBlank
    }

    fn on_body_or_footer(&mut self, line: &str) -> State {
        if self.try_open_footer(line) {
            return State::InFooter;
        }
        self.body.push(line.to_string());
        State::ExpectBodyOrFooter
    }

    fn on_footer(&mut self, line: &str) -> State {
        if line.is_empty() {
            self.pending_blank_lines += 1;
            return State::InFooter;
        }
        if self.try_open_footer(line) {
            return State::InFooter;
        }
        if let Some((_, value)) = self.footer.as_mut() {
            value.extend(std::iter::repeat(String::new()).take(self.pending_blank_lines));
            value.push(line.to_string());
        }
        self.pending_blank_lines = 0;
        State::InFooter
    }

    fn try_open_footer(&mut self, line: &str) -> bool {
        let Some(captures) = FOOTER_RE.captures(line) else {
            return false;
        };
        self.close_footer();
        self.footer = Some((
            captures["token"].to_string(),
            vec![captures["value"].to_string()],
        ));
        true
    }

    fn close_footer(&mut self) {
        self.pending_blank_lines = 0;
        let Some((token, mut lines)) = self.footer.take() else {
            return;
        };
        trim_trailing_blank(&mut lines);
        let value = lines.join("\n");
        if BREAKING_CHANGE_TOKENS.contains(&token.as_str()) {
            self.output.breaking_changes.push(value);
        } else {
            self.output.footers.insert(token, value);
        }
    }
}

fn trim_trailing_blank(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footers(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_simple_subject() {
        let parsed = ConventionalCommitParser::parse("fix: a fix").unwrap();
        assert_eq!(parsed.r#type, "fix");
        assert_eq!(parsed.description, "a fix");
        assert_eq!(parsed.scope, None);
        assert_eq!(parsed.body, None);
        assert!(parsed.breaking_changes.is_empty());
        assert!(parsed.footers.is_empty());
    }

    #[test]
    fn test_parse_breaking_marker() {
        let parsed = ConventionalCommitParser::parse("fix!: a breaking fix").unwrap();
        assert_eq!(parsed.breaking_changes, vec!["a breaking fix"]);
    }

    #[test]
    fn test_parse_scope_with_breaking_marker() {
        let parsed =
            ConventionalCommitParser::parse("feat(foo)!: a breaking feat with scope").unwrap();
        assert_eq!(parsed.r#type, "feat");
        assert_eq!(parsed.scope.as_deref(), Some("foo"));
        assert_eq!(parsed.breaking_changes, vec!["a breaking feat with scope"]);
    }

    #[test]
    fn test_parse_multiline_body() {
        let parsed = ConventionalCommitParser::parse(
            "fix: a fix with multiline body\n\none\ntwo\n\nthree\nfour",
        )
        .unwrap();
        assert_eq!(parsed.body.as_deref(), Some("one\ntwo\n\nthree\nfour"));
    }

    #[test]
    fn test_parse_breaking_change_footer_variants() {
        for token in ["BREAKING CHANGE", "BREAKING-CHANGE"] {
            let message = format!("fix: a fix\n\n{}: a breaking change info", token);
            let parsed = ConventionalCommitParser::parse(&message).unwrap();
            assert_eq!(parsed.breaking_changes, vec!["a breaking change info"]);
            assert!(parsed.footers.is_empty());
        }
    }

    #[test]
    fn test_parse_multiline_footer_with_trailing_blank_lines() {
        let parsed = ConventionalCommitParser::parse(
            "fix: multiline\n\nBREAKING CHANGE: first\nsecond\nthird\n\n",
        )
        .unwrap();
        assert_eq!(parsed.breaking_changes, vec!["first\nsecond\nthird"]);
    }

    #[test]
    fn test_parse_two_breaking_change_footers() {
        for separator in ["\n", "\n\n"] {
            let message = format!(
                "fix: two footers\n\nBREAKING CHANGE: first{}BREAKING CHANGE: second",
                separator
            );
            let parsed = ConventionalCommitParser::parse(&message).unwrap();
            assert_eq!(parsed.breaking_changes, vec!["first", "second"]);
        }
    }

    #[test]
    fn test_parse_footer_continuation_keeps_inner_blank_lines() {
        let parsed =
            ConventionalCommitParser::parse("fix: x\n\nRefs: one\n\ntwo").unwrap();
        assert_eq!(parsed.footers, footers(&[("Refs", "one\n\ntwo")]));
    }

    #[test]
    fn test_parse_dashed_footer_tokens() {
        let parsed = ConventionalCommitParser::parse(
            "fix: footers\n\nFix: 123\nFixed-by: Johnny\nReview-made-by: Johnny",
        )
        .unwrap();
        assert_eq!(
            parsed.footers,
            footers(&[
                ("Fix", "123"),
                ("Fixed-by", "Johnny"),
                ("Review-made-by", "Johnny")
            ])
        );
    }

    #[test]
    fn test_parse_body_then_footers() {
        let parsed = ConventionalCommitParser::parse(
            "fix: body and footers\n\nthis is a body\n\nfoo: 1\nbar: 2",
        )
        .unwrap();
        assert_eq!(parsed.body.as_deref(), Some("this is a body"));
        assert_eq!(parsed.footers, footers(&[("foo", "1"), ("bar", "2")]));
    }

    #[test]
    fn test_parse_duplicate_footer_overwrites() {
        let parsed = ConventionalCommitParser::parse("fix: x\n\nfoo: 1\nfoo: 2").unwrap();
        assert_eq!(parsed.footers, footers(&[("foo", "2")]));
    }

    #[test]
    fn test_almost_footer_becomes_body() {
        let parsed =
            ConventionalCommitParser::parse("chore: dummy change\n\ntag with no dash: value")
                .unwrap();
        assert_eq!(parsed.body.as_deref(), Some("tag with no dash: value"));
        assert!(parsed.footers.is_empty());
    }

    #[test]
    fn test_almost_footer_continues_open_footer() {
        let parsed =
            ConventionalCommitParser::parse("chore: x\n\nfoo: 1\ntag with no dash: value")
                .unwrap();
        assert_eq!(parsed.body, None);
        assert_eq!(
            parsed.footers,
            footers(&[("foo", "1\ntag with no dash: value")])
        );
    }

    #[test]
    fn test_invalid_messages_are_rejected() {
        for message in ["no type given", "fix: foo\nbody", "", "fix:nospace", "(scope): x"] {
            assert!(
                ConventionalCommitParser::parse(message).is_none(),
                "{:?} should be rejected",
                message
            );
        }
    }

    #[test]
    fn test_trailing_newline_after_subject_is_accepted() {
        let parsed = ConventionalCommitParser::parse("feat: a feat\n").unwrap();
        assert_eq!(parsed.description, "a feat");
    }

    #[test]
    fn test_finished_parser_ignores_further_input() {
        let mut parser = ConventionalCommitParser::new();
        assert!(parser.feed("fix: a fix"));
        assert!(parser.feed(""));
        let parsed = parser.finish().unwrap();
        assert_eq!(parsed.description, "a fix");

        assert!(parser.feed("feat: another subject"));
        assert!(parser.finish().is_none());
    }

    #[test]
    fn test_footers_keep_order_of_appearance() {
        let parsed = ConventionalCommitParser::parse("fix: x\n\nZeta: 1\nAlpha: 2").unwrap();
        assert_eq!(
            parsed.footers.keys().collect::<Vec<_>>(),
            vec!["Zeta", "Alpha"]
        );
    }
}
