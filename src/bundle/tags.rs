//! Minimal tag and attribute scanning for `<link>` and `<script>` elements.

use std::sync::OnceLock;

use regex::Regex;

/// Attribute list body: quoted values may contain `>`.
const ATTRS: &str = r#"(?:[^>"']|"[^"]*"|'[^']*')*"#;

/// Opening `<link ...>` tags (void element).
pub fn link_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(r"(?i)<link\b({ATTRS})/?>")).expect("invalid link tag regex")
    })
}

/// Complete `<script ...>body</script>` elements. Group 1 is the attributes, group 2 the body.
pub fn script_element_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(r"(?is)<script\b({ATTRS})>(.*?)</script\s*>"))
            .expect("invalid script element regex")
    })
}

/// Start of the first `<script` tag.
pub fn script_open_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<script\b").expect("invalid script open regex"))
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("invalid attribute regex")
    })
}

/// One parsed attribute. Names are lowercased; valueless attributes have `value: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Unquoted value, if one was given.
    pub value: Option<String>,
}

/// Parse the attribute section of a tag.
pub fn parse_attributes(source: &str) -> Vec<Attribute> {
    attribute_pattern()
        .captures_iter(source)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());
            Some(Attribute { name, value })
        })
        .collect()
}

/// Value of the first attribute called `name`.
pub fn attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name == name)
        .and_then(|attr| attr.value.as_deref())
}

/// Render attributes back into tag source, dropping any listed in `skip`.
pub fn render_attributes(attributes: &[Attribute], skip: &[&str]) -> String {
    let mut rendered = String::new();
    for attr in attributes.iter().filter(|attr| !skip.contains(&attr.name.as_str())) {
        rendered.push(' ');
        rendered.push_str(&attr.name);
        if let Some(value) = &attr.value {
            rendered.push_str("=\"");
            rendered.push_str(&value.replace('"', "&quot;"));
            rendered.push('"');
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_quoting_styles() {
        let attrs = parse_attributes(r#" href='style.css' REL="stylesheet" media=screen disabled"#);
        assert_eq!(attribute(&attrs, "href"), Some("style.css"));
        assert_eq!(attribute(&attrs, "rel"), Some("stylesheet"));
        assert_eq!(attribute(&attrs, "media"), Some("screen"));
        assert_eq!(attrs[3], Attribute {
            name: "disabled".into(),
            value: None,
        });
    }

    #[test]
    fn link_pattern_tolerates_gt_inside_quotes() {
        let html = r#"<link title="a > b" rel="stylesheet" href="x.css">"#;
        let caps = link_tag_pattern().captures(html).unwrap();
        assert_eq!(&caps[0], html);
    }

    #[test]
    fn script_pattern_captures_body() {
        let html = "<SCRIPT type=\"text/javascript\">var a = 1;</script >";
        let caps = script_element_pattern().captures(html).unwrap();
        assert_eq!(&caps[2], "var a = 1;");
    }

    #[test]
    fn renders_without_skipped_attributes() {
        let attrs = parse_attributes(r#"src="a.js" type="module" defer data-x='say "hi"'"#);
        assert_eq!(
            render_attributes(&attrs, &["src", "defer"]),
            r#" type="module" data-x="say &quot;hi&quot;""#
        );
    }
}
