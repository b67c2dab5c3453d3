//! AST types for PPL
//!
//! Split into:
//! - `expr`: literals, logical/comparison/value expressions, function calls
//! - `command`: the query and its pipeline commands
//!
//! Every node is built once by a parse call and owned strictly by its parent.

pub mod command;
pub mod expr;

/// Enum whose variants map one-to-one onto reserved words
macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $kw:ident,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn from_keyword(keyword: $crate::keyword::Keyword) -> Option<Self> {
                match keyword {
                    $($crate::keyword::Keyword::$kw => Some($name::$variant),)*
                    _ => None,
                }
            }

            pub fn keyword(self) -> $crate::keyword::Keyword {
                match self {
                    $($name::$variant => $crate::keyword::Keyword::$kw,)*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.keyword().as_str())
            }
        }
    };
}

pub(crate) use keyword_enum;

// ============ Names ============

/// A single identifier, as written (quotes removed)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ident(String);

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Dotted field path; never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct QualifiedName {
    parts: Vec<Ident>,
}

impl QualifiedName {
    pub fn new(first: Ident, rest: impl IntoIterator<Item = Ident>) -> Self {
        let mut parts = vec![first];
        parts.extend(rest);
        Self { parts }
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self::new(Ident::new(name), [])
    }

    /// Split on `.`; empty segments are kept as empty identifiers
    pub fn dotted(path: &str) -> Self {
        let mut segments = path.split('.').map(Ident::from);
        let first = segments.next().unwrap_or_else(|| Ident::new(""));
        Self::new(first, segments)
    }

    pub fn parts(&self) -> &[Ident] {
        &self.parts
    }

    pub fn first(&self) -> &Ident {
        &self.parts[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum QuoteStyle {
    Single,
    Double,
    Backtick,
}

impl QuoteStyle {
    pub fn quote_char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
            QuoteStyle::Backtick => '`',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(QuoteStyle::Single),
            '"' => Some(QuoteStyle::Double),
            '`' => Some(QuoteStyle::Backtick),
            _ => None,
        }
    }
}

/// One segment of a wildcard name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Wildcard {
    /// Identifier text, possibly containing `*`
    Pattern(String),
    /// Quote-wrapped wildcard; the wrapped part may itself be quoted
    Quoted { style: QuoteStyle, inner: Box<Wildcard> },
}

impl Wildcard {
    pub fn pattern(text: impl Into<String>) -> Self {
        Wildcard::Pattern(text.into())
    }

    pub fn has_star(&self) -> bool {
        match self {
            Wildcard::Pattern(text) => text.contains('*'),
            Wildcard::Quoted { inner, .. } => inner.has_star(),
        }
    }
}

/// Dotted path of wildcard segments; never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WildcardQualifiedName {
    parts: Vec<Wildcard>,
}

impl WildcardQualifiedName {
    pub fn new(first: Wildcard, rest: impl IntoIterator<Item = Wildcard>) -> Self {
        let mut parts = vec![first];
        parts.extend(rest);
        Self { parts }
    }

    pub fn single(pattern: impl Into<String>) -> Self {
        Self::new(Wildcard::pattern(pattern), [])
    }

    pub fn parts(&self) -> &[Wildcard] {
        &self.parts
    }

    pub fn is_pattern(&self) -> bool {
        self.parts.iter().any(Wildcard::has_star)
    }
}

pub use command::*;
pub use expr::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_names() {
        let name = QualifiedName::dotted("a.b.c");
        let parts: Vec<&str> = name.parts().iter().map(Ident::as_str).collect();
        assert_eq!(parts, vec!["a", "b", "c"]);
        assert_eq!(name.first().as_str(), "a");
    }

    #[test]
    fn wildcard_detection() {
        assert!(WildcardQualifiedName::single("host*").is_pattern());
        assert!(!WildcardQualifiedName::single("host").is_pattern());
        let quoted = Wildcard::Quoted {
            style: QuoteStyle::Single,
            inner: Box::new(Wildcard::pattern("*_id")),
        };
        assert!(quoted.has_star());
    }
}
