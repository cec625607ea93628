use super::{LicenseNormalizer, NOASSERTION, NONE};

/// SPDX identifiers recognized by [`SpdxNormalizer`], in canonical casing.
const KNOWN_IDS: &[&str] = &[
    "0BSD",
    "AFL-3.0",
    "AGPL-3.0",
    "AGPL-3.0-only",
    "AGPL-3.0-or-later",
    "APSL-2.0",
    "Apache-1.1",
    "Apache-2.0",
    "Artistic-2.0",
    "BlueOak-1.0.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "BSD-4-Clause",
    "BSL-1.0",
    "CC-BY-3.0",
    "CC-BY-4.0",
    "CC-BY-SA-4.0",
    "CC0-1.0",
    "CDDL-1.0",
    "CDDL-1.1",
    "EPL-1.0",
    "EPL-2.0",
    "EUPL-1.1",
    "EUPL-1.2",
    "GPL-2.0",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
    "ISC",
    "LGPL-2.0",
    "LGPL-2.0-only",
    "LGPL-2.0-or-later",
    "LGPL-2.1",
    "LGPL-2.1-only",
    "LGPL-2.1-or-later",
    "LGPL-3.0",
    "LGPL-3.0-only",
    "LGPL-3.0-or-later",
    "MIT",
    "MIT-0",
    "MPL-1.1",
    "MPL-2.0",
    "MS-PL",
    "OFL-1.1",
    "OpenSSL",
    "OSL-3.0",
    "PostgreSQL",
    "PSF-2.0",
    "Python-2.0",
    "Unicode-DFS-2016",
    "Unlicense",
    "UPL-1.0",
    "WTFPL",
    "X11",
    "Zlib",
];

/// Default [`LicenseNormalizer`].
///
/// Accepts SPDX expressions in any casing, ScanCode license keys
/// (`mit and apache-2.0`), and a table of common free-text names.
/// Identifiers it cannot map inside an otherwise recognized expression become
/// `NOASSERTION`; input with no recognizable identifier at all yields `None`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpdxNormalizer;

impl SpdxNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl LicenseNormalizer for SpdxNormalizer {
    fn normalize(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(id) = alias(trimmed) {
            return Some(id.to_string());
        }

        let tokens = tokenize(trimmed);
        let mut parser = ExprParser { tokens, pos: 0 };
        let expr = parser.parse_or()?;
        if parser.pos != parser.tokens.len() {
            return None;
        }

        let mut recognized = false;
        let expr = expr.canonicalize(&mut recognized);
        recognized.then(|| expr.render(0))
    }
}

/// Normalize common non-SPDX strings to their SPDX equivalents.
fn alias(raw: &str) -> Option<&'static str> {
    let id = match raw.to_ascii_lowercase().as_str() {
        "apache 2.0" | "apache2" | "apache license 2.0" | "apache license, version 2.0"
        | "apache software license" => "Apache-2.0",
        "mit license" | "the mit license" | "expat" => "MIT",
        "bsd" | "bsd license" | "bsd 3-clause" | "new bsd" | "modified bsd" => "BSD-3-Clause",
        "bsd 2-clause" | "simplified bsd" => "BSD-2-Clause",
        "gnu gpl v2" | "gnu general public license v2" | "gpl v2" | "gplv2" => "GPL-2.0",
        "gnu gpl v3" | "gnu general public license v3" | "gpl v3" | "gplv3" => "GPL-3.0",
        "gnu lgpl v2.1" | "lgpl v2.1" | "lgplv2.1" => "LGPL-2.1",
        "gnu lgpl v3" | "lgpl v3" | "lgplv3" => "LGPL-3.0",
        "mozilla public license 2.0" | "mpl 2.0" | "mplv2" => "MPL-2.0",
        "isc license" => "ISC",
        "cc0" | "public domain" => "CC0-1.0",
        "agpl v3" | "agplv3" | "gnu agpl v3" => "AGPL-3.0",
        _ => return None,
    };
    Some(id)
}

/// ScanCode license keys whose spelling differs from the SPDX identifier.
fn scancode_key(key: &str) -> Option<&'static str> {
    let id = match key.to_ascii_lowercase().as_str() {
        "bsd-new" => "BSD-3-Clause",
        "bsd-simplified" => "BSD-2-Clause",
        "bsd-original" => "BSD-4-Clause",
        "gpl-2.0-plus" => "GPL-2.0-or-later",
        "gpl-3.0-plus" => "GPL-3.0-or-later",
        "lgpl-2.0-plus" => "LGPL-2.0-or-later",
        "lgpl-2.1-plus" => "LGPL-2.1-or-later",
        "lgpl-3.0-plus" => "LGPL-3.0-or-later",
        "agpl-3.0-plus" => "AGPL-3.0-or-later",
        "boost-1.0" => "BSL-1.0",
        "mit-old-style" | "mit-license" => "MIT",
        "python" => "Python-2.0",
        "zlib-license" => "Zlib",
        _ => return None,
    };
    Some(id)
}

fn known_id(id: &str) -> Option<&'static str> {
    KNOWN_IDS.iter().copied().find(|k| k.eq_ignore_ascii_case(id))
}

/// Map one identifier token to its canonical form, if recognized.
fn canonical_id(id: &str) -> Option<String> {
    if id.eq_ignore_ascii_case(NOASSERTION) {
        return Some(NOASSERTION.to_string());
    }
    if id.eq_ignore_ascii_case(NONE) {
        return Some(NONE.to_string());
    }
    const LICENSE_REF: &str = "LicenseRef-";
    if let (Some(prefix), Some(rest)) = (id.get(..LICENSE_REF.len()), id.get(LICENSE_REF.len()..)) {
        if prefix.eq_ignore_ascii_case(LICENSE_REF) && !rest.is_empty() {
            return Some(format!("{LICENSE_REF}{rest}"));
        }
    }
    if let Some(known) = known_id(id).or_else(|| scancode_key(id)).or_else(|| alias(id)) {
        return Some(known.to_string());
    }
    // GPL-2.0+ style
    let base = known_id(id.strip_suffix('+')?)?;
    let or_later = format!("{base}-or-later");
    Some(match known_id(&or_later) {
        Some(canonical) => canonical.to_string(),
        None => format!("{base}+"),
    })
}

#[derive(Debug, PartialEq, Clone)]
enum Token {
    Id(String),
    And,
    Or,
    With,
    LParen,
    RParen,
}

/// Split an expression into tokens; operators are matched case-insensitively
/// because ScanCode emits them in lowercase.
fn tokenize(expr: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '(' {
            tokens.push(Token::LParen);
            chars.next();
        } else if c == ')' {
            tokens.push(Token::RParen);
            chars.next();
        } else {
            let mut s = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '(' || c == ')' {
                    break;
                }
                s.push(c);
                chars.next();
            }
            let token = match s.to_ascii_uppercase().as_str() {
                "AND" => Token::And,
                "OR" => Token::Or,
                "WITH" => Token::With,
                _ => Token::Id(s),
            };
            tokens.push(token);
        }
    }
    tokens
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    License(String),
    With(String, String),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn canonicalize(self, recognized: &mut bool) -> Expr {
        let leaf = |id: String, recognized: &mut bool| match canonical_id(&id) {
            Some(c) => {
                *recognized = true;
                c
            }
            None => NOASSERTION.to_string(),
        };
        match self {
            Expr::License(id) => Expr::License(leaf(id, recognized)),
            Expr::With(id, exception) => Expr::With(leaf(id, recognized), exception),
            Expr::And(l, r) => Expr::And(
                Box::new(l.canonicalize(recognized)),
                Box::new(r.canonicalize(recognized)),
            ),
            Expr::Or(l, r) => Expr::Or(
                Box::new(l.canonicalize(recognized)),
                Box::new(r.canonicalize(recognized)),
            ),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Or(..) => 1,
            Expr::And(..) => 2,
            Expr::License(_) | Expr::With(..) => 3,
        }
    }

    /// Render with only the parentheses the precedence rules require.
    fn render(&self, parent: u8) -> String {
        let s = match self {
            Expr::License(id) => id.clone(),
            Expr::With(id, exception) => format!("{id} WITH {exception}"),
            Expr::And(l, r) => format!("{} AND {}", l.render(2), r.render(2)),
            Expr::Or(l, r) => format!("{} OR {}", l.render(1), r.render(1)),
        };
        if self.precedence() < parent {
            format!("({s})")
        } else {
            s
        }
    }
}

/// Recursive descent parser for license expressions.
///
/// Grammar (AND binds tighter than OR):
/// ```text
/// or_expr  := and_expr ( "OR" and_expr )*
/// and_expr := atom ( "AND" atom )*
/// atom     := "(" or_expr ")" | id ( "WITH" id )?
/// ```
struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut result = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.consume();
            let rhs = self.parse_and()?;
            result = Expr::Or(Box::new(result), Box::new(rhs));
        }
        Some(result)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut result = self.parse_atom()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.consume();
            let rhs = self.parse_atom()?;
            result = Expr::And(Box::new(result), Box::new(rhs));
        }
        Some(result)
    }

    fn parse_atom(&mut self) -> Option<Expr> {
        match self.consume()? {
            Token::LParen => {
                let inner = self.parse_or()?;
                match self.consume()? {
                    Token::RParen => Some(inner),
                    _ => None,
                }
            }
            Token::Id(id) => {
                if matches!(self.peek(), Some(Token::With)) {
                    self.consume();
                    match self.consume()? {
                        Token::Id(exception) => Some(Expr::With(id, exception)),
                        _ => None,
                    }
                } else {
                    Some(Expr::License(id))
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> Option<String> {
        SpdxNormalizer.normalize(raw)
    }

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize("MIT License").as_deref(), Some("MIT"));
        assert_eq!(normalize("Apache License 2.0").as_deref(), Some("Apache-2.0"));
        assert_eq!(normalize("  the mit license ").as_deref(), Some("MIT"));
    }

    #[test]
    fn test_normalize_casing_and_scancode_keys() {
        assert_eq!(normalize("mit").as_deref(), Some("MIT"));
        assert_eq!(
            normalize("mit and apache-2.0").as_deref(),
            Some("MIT AND Apache-2.0")
        );
        assert_eq!(normalize("bsd-new").as_deref(), Some("BSD-3-Clause"));
        assert_eq!(normalize("GPL-2.0+").as_deref(), Some("GPL-2.0-or-later"));
    }

    #[test]
    fn test_normalize_keeps_required_parentheses_only() {
        assert_eq!(normalize("(MIT)").as_deref(), Some("MIT"));
        assert_eq!(
            normalize("(MIT) AND (Apache-2.0 OR ISC)").as_deref(),
            Some("MIT AND (Apache-2.0 OR ISC)")
        );
        assert_eq!(
            normalize("MIT OR Apache-2.0 AND ISC").as_deref(),
            Some("MIT OR Apache-2.0 AND ISC")
        );
    }

    #[test]
    fn test_normalize_with_exception() {
        assert_eq!(
            normalize("gpl-2.0 with Classpath-exception-2.0").as_deref(),
            Some("GPL-2.0 WITH Classpath-exception-2.0")
        );
    }

    #[test]
    fn test_unknown_parts_become_noassertion() {
        assert_eq!(
            normalize("MIT AND some-custom-thing").as_deref(),
            Some("MIT AND NOASSERTION")
        );
        assert_eq!(normalize("NOASSERTION").as_deref(), Some("NOASSERTION"));
        assert_eq!(
            normalize("LicenseRef-scancode-public-domain").as_deref(),
            Some("LicenseRef-scancode-public-domain")
        );
    }

    #[test]
    fn test_unrecognizable_text_is_none() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("No_license_found"), None);
        assert_eq!(normalize("see the file for details"), None);
        assert_eq!(normalize("(MIT"), None);
        assert_eq!(normalize("MIT AND"), None);
    }

    #[test]
    fn test_is_valid_declared() {
        let n = SpdxNormalizer;
        assert!(n.is_valid_declared("MIT"));
        assert!(!n.is_valid_declared(""));
        assert!(!n.is_valid_declared("NOASSERTION"));
        assert!(!n.is_valid_declared("NONE"));
    }
}
