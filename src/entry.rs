//! Line splitting and entry segmentation for LDIF-style directory exports.
//!
//! Every line is trimmed and split at its first `:` into an attribute name and
//! a value. An entry starts at a `dn` line and owns every following line up to
//! the next `dn` line. Lines before the first `dn` belong to no entry.
//!
//! [`entries`] is the only segmenter in the crate; classification,
//! resolution, group previews, and entry lookup all go through it.
use std::iter::Peekable;
use std::str::Lines;

/// Attribute name that introduces a new entry.
pub const DN_ATTRIBUTE: &str = "dn";

/// One trimmed line of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLine<'a> {
    /// The trimmed line as it appeared in the document.
    pub raw: &'a str,
    /// Text before the first colon, or `None` if there is no colon or the
    /// name would be empty.
    pub name: Option<&'a str>,
    /// Trimmed text after the first colon (empty when `name` is `None`).
    pub value: &'a str,
}

impl<'a> AttributeLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        let raw = line.trim();
        match memchr::memchr(b':', raw.as_bytes()) {
            Some(0) | None => Self {
                raw,
                name: None,
                value: "",
            },
            Some(pos) => Self {
                raw,
                name: Some(&raw[..pos]),
                value: raw[pos + 1..].trim(),
            },
        }
    }

    /// True when the attribute name is exactly `name`.
    pub fn is(&self, name: &str) -> bool {
        self.name == Some(name)
    }
}

/// A directory record: its distinguished name and the lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry<'a> {
    pub dn: &'a str,
    /// Lines after the `dn` line, in document order.
    pub lines: Vec<AttributeLine<'a>>,
}

impl<'a> DirectoryEntry<'a> {
    /// Values of every line whose attribute name is exactly `name`.
    pub fn values<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'a str> + 's {
        self.lines
            .iter()
            .filter(move |l| l.is(name))
            .map(|l| l.value)
    }
}

/// Lazy iterator over the entries of a document.
pub struct Entries<'a> {
    lines: Peekable<Lines<'a>>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = DirectoryEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let dn = loop {
            let line = AttributeLine::parse(self.lines.next()?);
            if line.is(DN_ATTRIBUTE) {
                break line.value;
            }
        };
        let mut lines = Vec::new();
        while let Some(&next) = self.lines.peek() {
            let line = AttributeLine::parse(next);
            if line.is(DN_ATTRIBUTE) {
                break;
            }
            lines.push(line);
            self.lines.next();
        }
        Some(DirectoryEntry { dn, lines })
    }
}

/// Segment `text` into entries.
pub fn entries(text: &str) -> Entries<'_> {
    Entries {
        lines: text.lines().peekable(),
    }
}

/// Find the first entry whose dn equals `dn`.
pub fn find_entry<'a>(text: &'a str, dn: &str) -> Option<DirectoryEntry<'a>> {
    entries(text).find(|e| e.dn == dn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_colon_and_trims() {
        let l = AttributeLine::parse("  member: uid=a,ou=people:x  ");
        assert_eq!(l.name, Some("member"));
        assert_eq!(l.value, "uid=a,ou=people:x");
        assert_eq!(l.raw, "member: uid=a,ou=people:x");
    }

    #[test]
    fn no_colon_or_empty_name_has_no_attribute() {
        assert_eq!(AttributeLine::parse("just text").name, None);
        assert_eq!(AttributeLine::parse(": value").name, None);
        assert_eq!(AttributeLine::parse("").name, None);
    }

    #[test]
    fn segments_on_dn_lines_without_blank_separators() {
        let text = "version: 1\ndn: cn=a\ncn: a\ndn: cn=b\n\ncn: b\nnonsense\n";
        let all: Vec<_> = entries(text).collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].dn, "cn=a");
        assert_eq!(all[0].lines.len(), 1);
        assert_eq!(all[1].dn, "cn=b");
        // blank and colon-less lines are kept as raw lines
        assert_eq!(all[1].lines.len(), 3);
        assert_eq!(all[1].lines[2].raw, "nonsense");
        assert_eq!(all[1].lines[2].name, None);
    }

    #[test]
    fn values_filters_by_exact_name() {
        let text = "dn: cn=g\nmember: x\nmemberOf: y\nmember: z\n";
        let e = entries(text).next().unwrap();
        assert_eq!(e.values("member").collect::<Vec<_>>(), vec!["x", "z"]);
    }

    #[test]
    fn find_entry_by_dn() {
        let text = "dn: cn=a\ncn: a\ndn: cn=b\ncn: b\n";
        let e = find_entry(text, "cn=b").unwrap();
        assert_eq!(e.values("cn").next(), Some("b"));
        assert!(find_entry(text, "cn=c").is_none());
    }
}
