use std::fmt;

/// Explicit type marker trailing a numeric literal.
///
/// # Examples
/// ```text
/// 2L     // Long
/// 2.5D   // Double
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSuffix {
    /// `L` / `l`: 64-bit integer
    Long,
    /// `D` / `d`: double precision float
    Double,
}

impl TypeSuffix {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'L' | 'l' => Some(TypeSuffix::Long),
            'D' | 'd' => Some(TypeSuffix::Double),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            TypeSuffix::Long => 'L',
            TypeSuffix::Double => 'D',
        }
    }
}

/// An untyped argument as it appeared in the query.
///
/// The literal only remembers its text and any explicit suffix. The declared
/// type of the attribute it is compared against decides how it is read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    /// Literal text, with quotes and the type suffix removed
    pub text: String,

    /// Explicit type suffix (`2L`)
    pub suffix: Option<TypeSuffix>,

    /// Whether the literal was written between quotes
    pub quoted: bool,
}

impl Literal {
    /// A quoted string literal.
    pub fn string(text: impl Into<String>) -> Self {
        Literal {
            text: text.into(),
            suffix: None,
            quoted: true,
        }
    }

    /// An unquoted literal (numbers, dates, enum names, booleans).
    pub fn bare(text: impl Into<String>) -> Self {
        Literal {
            text: text.into(),
            suffix: None,
            quoted: false,
        }
    }

    pub fn with_suffix(mut self, suffix: TypeSuffix) -> Self {
        self.suffix = Some(suffix);
        self
    }

    /// Whether the text carries the `*` wildcard marker.
    pub fn has_wildcard(&self) -> bool {
        self.text.contains('*')
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "'{}'", self.text.replace('\\', "\\\\").replace('\'', "\\'"))?;
        } else {
            f.write_str(&self.text)?;
        }
        if let Some(suffix) = self.suffix {
            write!(f, "{}", suffix.as_char())?;
        }
        Ok(())
    }
}
