//! Documentation content for the fiql CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Types,
    Selectors,
}

impl DocCategory {
    /// Parse category name from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" | "connectors" => Some(Self::Operators),
            "types" | "type" | "literals" => Some(Self::Types),
            "selectors" | "selector" | "aliases" => Some(Self::Selectors),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"FIQL DOCUMENTATION

fiql compiles filter expressions such as name=='Max' into predicates over a
registered entity model, and can run them against JSON records.

DOCUMENTATION CATEGORIES

  syntax        Comparisons, grouping, and precedence
  operators     Comparison operators and logical connectors
  types         How arguments are read for each attribute type
  selectors     Nested paths, collections, the allow-list, and aliases

QUICK REFERENCE

  sel==value        Equal
  sel!=value        Not equal
  sel=gt=value      Greater than (=lt=, =ge=, =le=)
  a,b  a;b          And, or
  a.b  a:b          Nand, nor
  'text*'           Wildcard match on strings
  2L                Long literal

Run 'fiql doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::parse(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Types) => Ok(TYPES_DOC),
        Some(DocCategory::Selectors) => Ok(SELECTORS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Filter Expressions

COMPARISON
  selector OPERATOR argument

    Example:
      name=='Max'
      visits=ge=2
      owner.firstName!='Jeff'

COMBINING
  Comparisons are joined with connectors:

    name=='Chuck',owner.firstName=='Jeff'     both hold
    name=='Leo';owner.firstName=='Jeff'       either holds

PRECEDENCE
  ',' and '.' bind tighter than ';' and ':'. Connectors of the same
  precedence group to the left. Use parentheses to override:

    (name=='Max';name=='Leo'),visits.type==SCHEDULED

WHITESPACE
  Whitespace between tokens is ignored. Quote arguments that contain
  spaces: name=='Lucky Lou'

LIMITS
  A filter may chain or nest at most 512 levels deep.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Comparisons and Connectors

COMPARISON OPERATORS
  ==      equal
  !=      not equal
  =gt=    greater than
  =lt=    less than
  =ge=    greater than or equal
  =le=    less than or equal

  Ordering operators apply to numbers, strings, dates, and date-times.

  On a collection attribute:
    ==, !=      the collection contains / does not contain the argument
    =gt= ...    compares the number of elements

      nicknames=='Chucky'
      visits=ge=2

WILDCARDS
  On string attributes, '*' inside the argument matches any text and turns
  == and != into a pattern match:

    name=='*uck*'
    nicknames=='*ucky'

  With --always-wildcard every string == and != is a "contains" match.

CONNECTORS
  ,    and
  ;    or
  .    nand   a.b is and(not a, not b)
  :    nor    a:b is or(not a, not b)
"#;

const TYPES_DOC: &str = r#"TYPES - Reading Arguments

The declared type of the attribute decides how an argument is read.

  string      the text as written, quoted or not
  integer     32-bit whole number              visits.count==3
  long        64-bit whole number
  double      floating point number            weight=gt=2.5
  decimal     exact decimal                    price=le=19.99
  boolean     true or false                    vaccinated==true
  date        YYYY-MM-DD                       birthDate=gt=2012-08-31
  date-time   ISO-8601 instant                 visits.date==2013-01-04T09:15:00Z
  enum        a constant name, case-sensitive  visits.type==SCHEDULED

TYPE SUFFIX
  A trailing L (long) or D (double) fixes a number's type regardless of the
  attribute. The filter still compiles; a backend may reject the comparison
  when it runs:

    visits=ge=2L      compiles, fails when executed

DATES
  A date compared with a date-time attribute means the start of that day
  in UTC. A date-time compared with a date attribute is an error.
"#;

const SELECTORS_DOC: &str = r#"SELECTORS - Paths, Allow-List, and Aliases

NESTED PATHS
  Dots walk from one entity to another:

    owner.firstName
    visits.date

  Walking through a collection matches when any element matches.

ALLOW-LIST
  Only selectors listed with --allow (or in the configuration file's
  "allowed_selectors") may be used. Any other selector is rejected, even if
  the attribute exists.

ALIASES
  --alias born=birthDate lets queries say born=gt=2012-08-31. The
  allow-list must contain the alias ("born"), not the attribute it maps to.

CONFIGURATION FILE
  {
    "allowed_selectors": ["name", "born"],
    "selector_aliases": {"born": "birthDate"},
    "always_wildcard": false
  }
"#;
