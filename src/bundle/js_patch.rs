//! Text patches applied to the HTML shell and to inlined loader scripts.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Rewrites `"Build/".concat("X")` into the literal `"Build/X"`.
///
/// Unity's bootstrap builds asset paths at runtime; later passes and the runtime shim need
/// the literal form. Either quote style is accepted as long as it is used consistently.
/// Both patterns are compiled once and reused for the shell and every inlined script.
#[derive(Debug, Clone)]
pub struct ConcatPatcher {
    prefix: String,
    double_quoted: Regex,
    single_quoted: Regex,
}

impl ConcatPatcher {
    /// Build a patcher for the build directory name as it appears in URLs.
    pub fn new(build_prefix: &str) -> Self {
        let prefix = build_prefix.trim_matches('/').to_string();
        let escaped = regex::escape(&prefix);
        let double_quoted = Regex::new(&format!(r#""{escaped}/"\s*\.concat\(\s*"([^"]*)"\s*\)"#))
            .expect("invalid double-quoted concat regex");
        let single_quoted = Regex::new(&format!(r#"'{escaped}/'\s*\.concat\(\s*'([^']*)'\s*\)"#))
            .expect("invalid single-quoted concat regex");

        Self {
            prefix,
            double_quoted,
            single_quoted,
        }
    }

    /// Apply the rewrite to `text`.
    pub fn apply(&self, text: &str) -> String {
        let prefix = &self.prefix;
        let text = self.double_quoted.replace_all(text, |caps: &Captures| {
            format!("\"{prefix}/{}\"", &caps[1])
        });
        self.single_quoted
            .replace_all(&text, |caps: &Captures| format!("'{prefix}/{}'", &caps[1]))
            .into_owned()
    }
}

/// Escape closing-tag and comment-open sequences so `text` can sit inside a `<script>` block.
///
/// `<!--` inside a script can switch the HTML tokenizer into its escaped state, where a
/// later `<script` keeps the block open past its real end.
pub fn escape_inline_script(text: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"(?i)</(script)").expect("invalid script close regex"));
    escape_comment_open(&pattern.replace_all(text, r"<\/$1"))
}

/// Escape closing-tag sequences so `text` can sit inside a `<style>` block.
pub fn escape_inline_style(text: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"(?i)</(style)").expect("invalid style close regex"));
    pattern.replace_all(text, r"<\/$1").into_owned()
}

/// Make serialised JSON safe to embed in a script block.
pub fn escape_embedded_json(json: &str) -> String {
    escape_comment_open(&json.replace("</", r"<\/"))
}

// JavaScript string literals read `<\!--` as `<!--`. Embedded JSON is evaluated as a
// JavaScript literal, not handed to `JSON.parse`.
fn escape_comment_open(text: &str) -> String {
    text.replace("<!--", r"<\!--")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_double_quoted_concat() {
        let source = r#"var url = "Build/".concat("game.wasm");"#;
        let patched = ConcatPatcher::new("Build").apply(source);
        assert_eq!(patched, r#"var url = "Build/game.wasm";"#);
        assert!(!patched.contains(".concat("));
    }

    #[test]
    fn normalizes_single_quoted_concat_with_whitespace() {
        let source = "loader('Build/' .concat( 'game.json' ))";
        assert_eq!(
            ConcatPatcher::new("Build/").apply(source),
            "loader('Build/game.json')"
        );
    }

    #[test]
    fn leaves_other_concat_calls_alone() {
        let source = r#"a.concat("b"); "Other/".concat("x"); "Build/".concat(name)"#;
        assert_eq!(ConcatPatcher::new("Build").apply(source), source);
    }

    #[test]
    fn replacement_keeps_dollar_signs() {
        let source = r#""Build/".concat("$1.data")"#;
        assert_eq!(ConcatPatcher::new("Build").apply(source), r#""Build/$1.data""#);
    }

    #[test]
    fn one_patcher_serves_many_texts() {
        let patcher = ConcatPatcher::new("Build");
        assert_eq!(patcher.apply(r#""Build/".concat("a")"#), r#""Build/a""#);
        assert_eq!(patcher.apply("'Build/'.concat('b')"), "'Build/b'");
        assert_eq!(patcher.apply("no paths here"), "no paths here");
    }

    #[test]
    fn escapes_closing_tags() {
        assert_eq!(
            escape_inline_script(r#"document.write("</SCRIPT>")"#),
            r#"document.write("<\/SCRIPT>")"#
        );
        assert_eq!(
            escape_inline_style("a::after{content:'</style>'}"),
            r"a::after{content:'<\/style>'}"
        );
        assert_eq!(escape_embedded_json(r#"{"a":"</b>"}"#), r#"{"a":"<\/b>"}"#);
    }

    #[test]
    fn escapes_comment_open_in_scripts_and_json() {
        assert_eq!(
            escape_inline_script(r#"var s = "<!--<script>";"#),
            r#"var s = "<\!--<script>";"#
        );
        assert_eq!(
            escape_embedded_json(r#"{"productName":"<!-- x"}"#),
            r#"{"productName":"<\!-- x"}"#
        );
        assert_eq!(escape_inline_style("/* <!-- */"), "/* <!-- */");
    }
}
