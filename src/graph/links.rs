use std::sync::OnceLock;

use regex::Regex;

const WIKI_LINK_PATTERN: &str = r"\[\[([^\]\n]+)\]\]";

fn wiki_link_regex() -> &'static Regex {
	static WIKI_LINK_REGEX: OnceLock<Regex> = OnceLock::new();
	WIKI_LINK_REGEX.get_or_init(|| Regex::new(WIKI_LINK_PATTERN).expect("wiki link pattern is valid"))
}

/// Collect the `[[target]]` references in `text`, trimmed, in order of appearance.
///
/// Duplicates are kept and nothing is resolved here. Unterminated markers and
/// markers spanning a line break are ignored.
pub fn extract_links(text: &str) -> Vec<String> {
	wiki_link_regex()
		.captures_iter(text)
		.filter_map(|caps| caps.get(1))
		.map(|m| m.as_str().trim().to_string())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_in_order_with_duplicates() {
		let links = extract_links("see [[Beta]] then [[ Gamma ]] and [[Beta]] again");
		assert_eq!(links, vec!["Beta", "Gamma", "Beta"]);
	}

	#[test]
	fn ignores_unterminated_markers() {
		assert!(extract_links("[[Title").is_empty());
		assert!(extract_links("Title]]").is_empty());
		assert!(extract_links("[[Split\nTitle]]").is_empty());
		assert!(extract_links("[[]]").is_empty());
	}

	#[test]
	fn target_stops_at_first_closing_bracket() {
		assert_eq!(extract_links("[[a]b]]"), Vec::<String>::new());
		assert_eq!(extract_links("[[[inner]]"), vec!["[inner"]);
	}

	#[test]
	fn no_links_in_plain_text() {
		assert!(extract_links("").is_empty());
		assert!(extract_links("fn main() { let v = a[0]; }").is_empty());
	}
}
