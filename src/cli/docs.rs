//! Documentation content for pql CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Functions,
    Fields,
}

impl DocCategory {
    /// Parse category name from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax" => Some(Self::Syntax),
            "functions" | "function" | "calls" => Some(Self::Functions),
            "fields" | "field" | "arrays" | "schema" => Some(Self::Fields),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"PQL DOCUMENTATION

PQL filter expressions compile into aggregation pipeline conditions.

DOCUMENTATION CATEGORIES

  syntax            Literals, field paths, comparisons and boolean logic
  functions         exists(), regexMatch() and search()
  fields            Array fields, complex fields and schemas

QUICK REFERENCE

  hostname == "db01"                 Equality
  os.type == "Linux"                 Nested field
  a == 1 and (b == 2 or c == 3)      Boolean logic
  not a == 1                         Negation of a single comparison
  adapters == {"name": "eth0"}       Dict match
  serial == exists(true)             Existence
  hostname == regexMatch("^db")      Regular expression
  search("text")                     Full-text search

Run 'pql doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::parse(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        Some(DocCategory::Fields) => Ok(FIELDS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX

LITERALS
  "text"  'text'        Strings (escapes: \n \t \r \\ \' \")
  42  -7  3.5           Numbers
  true  True            Booleans
  null  None            Null
  [1, 2]                List
  {"k": "v"}            Dict (string keys)

FIELDS
  hostname              Top-level field
  os.type               Field of an embedded document
  "odd-name"            Quoted path on the left of a comparison

COMPARISONS
  ==                    Equality, the only comparator that compiles
  != < <= > >=          Parsed, rejected at compile time
  a == b == c           Chained comparisons are rejected

LOGIC
  and  or               Combine conditions; a run of one combinator is flat
  not                   Negates a single comparison only
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS

exists(bool)
  serial == exists(true)
  => {"serial": {"$exists": true}}

regexMatch(pattern[, options])
  hostname == regexMatch("^db", "i")
  Guards the field with a string type check, then matches.
  Options are passed to the backend as given.

search(text)
  search("needle")
  Top-level only. Exactly one string argument.
"#;

const FIELDS_DOC: &str = r#"FIELDS

ARRAY FIELDS (--array-field)
  Referenced as $$<last segment>, the per-element alias of the
  surrounding $map/$filter.

COMPLEX FIELDS (--complex-field)
  Fields holding sub-documents.

ARRAY AND COMPLEX
  Conditions are wrapped in an "any element matches" quantifier:
  {"$and": [{"$isArray": "$f"}, {"$anyElementTrue": {"$map": ...}}]}

SCHEMA (--schema FILE)
  JSON object of field path to type:
    {"hostname": "string", "ports": "list<int>", "os": "dict"}
  Types: generic string int bool list dict list<T> dict<T>
  Unknown fields are rejected with the declared paths as suggestions.
"#;
