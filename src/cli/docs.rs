//! Documentation content for the ccl CLI

use super::CliError;
use crate::functions::{Builtin, signature};

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Functions,
    Types,
    Scripts,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "functions" | "function" | "funcs" => Some(Self::Functions),
            "types" | "type" | "coercion" => Some(Self::Types),
            "scripts" | "script" | "statements" => Some(Self::Scripts),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"CCL DOCUMENTATION

CCL (Column Calculation Language) derives a new column of a dataset from a
formula over the other columns. The formula is evaluated once per row.

DOCUMENTATION CATEGORIES

  syntax            Column references, literals, and grouping
  operators         Arithmetic, concatenation, comparison, and logical operators
  functions         Built-in functions such as IF and ROUND
  types             Value types, nil handling, and coercion rules
  scripts           Assignments, NEW(...) columns, and multi-statement scripts

QUICK REFERENCE

  A, B, AA          Column by spreadsheet letter
  price             Column by name
  [Unit Price]      Column by name with spaces or symbols
  #0                Column by zero-based index
  'text' "text"     String literals
  10 < A < 20       Chained comparison

Run 'ccl doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<String, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC.to_string()),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC.to_string()),
        Some(DocCategory::Functions) => Ok(functions_doc()),
        Some(DocCategory::Types) => Ok(TYPES_DOC.to_string()),
        Some(DocCategory::Scripts) => Ok(SCRIPTS_DOC.to_string()),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Column References and Literals

COLUMN LETTERS
  A, B, ..., Z, AA, AB, ...
    Spreadsheet-style position. A is the first column.
    A letter sequence always refers to the position, even if some other
    column is named "A".

COLUMN NAMES
  price
    A bare identifier that is not a letter sequence is looked up by name.
  [Unit Price]
    Brackets allow any name that is not a valid identifier.

COLUMN INDEX
  #3
    Zero-based position.

  Unknown names fail before any row is evaluated.

LITERALS
  42  3.5  .5           Numbers
  'text'  "text"        Strings; the other quote type may appear inside
  true  false  nil      Keywords

GROUPING
  (A + B) * 2
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Lowest to Highest Precedence

  ||                    Logical OR (short-circuit)
  &&                    Logical AND (short-circuit)
  == != < <= > >=       Comparison
  &                     Text concatenation
  + -                   Addition, subtraction
  * /                   Multiplication, division
  -x                    Negation

CHAINED COMPARISON
  10 < A < 20
    Means (10 < A) && (A < 20), with A evaluated once.
  0 <= A <= 100
    Inclusive bounds.

LOGICAL OPERANDS
  && and || require boolean operands, typically comparisons.
"#;

const TYPES_DOC: &str = r#"TYPES - Values and Coercion

VALUES
  nil, boolean, number, text

ARITHMETIC (+ - * /)
  nil counts as 0            nil + 10  =>  10
  numeric text is a number   "5" * 2   =>  10
  other text is an error     "abc" + 1 =>  type error
  x / 0 yields infinity

CONCATENATION (&)
  Both sides are rendered as text; nil renders as <nil>.
    'Value: ' & nil  =>  "Value: <nil>"

EQUALITY (== !=)
  nil == nil is true; nil equals nothing else.
  Numbers and numeric text compare as numbers: "10" == 10 is true.
  Anything else compares by text.

ORDERING (< <= > >=)
  Any nil operand makes the comparison false, even nil < 5.
  Numbers and numeric text compare as numbers, anything else as text.
"#;

const SCRIPTS_DOC: &str = r#"SCRIPTS - Statements

EXPRESSION
  A * 2
    The value becomes the derived column (ccl eval --name NAME).

ASSIGNMENT
  B = A * 2
    Overwrites an existing column row by row.

NEW COLUMN
  NEW('total') = A + B
    Creates a column; later statements can read it by name.

MULTIPLE STATEMENTS
  Separate statements with ';' or newlines. Separators inside quotes or
  brackets do not split.

    NEW('label') = 'a;b'; B = label & '!'
"#;

fn functions_doc() -> String {
    let mut doc = String::from("FUNCTIONS - Built-ins (names are case-insensitive)\n\n");
    for builtin in [
        Builtin::If,
        Builtin::IfNil,
        Builtin::And,
        Builtin::Or,
        Builtin::Not,
        Builtin::IsNil,
        Builtin::Concat,
        Builtin::Abs,
        Builtin::Round,
        Builtin::Len,
        Builtin::Upper,
        Builtin::Lower,
    ] {
        doc.push_str(&format!("  {:<28}{}\n", signature(builtin), describe(builtin)));
    }
    doc.push_str("\nUnknown functions and wrong argument counts fail at evaluation.\n");
    doc
}

fn describe(builtin: Builtin) -> &'static str {
    match builtin {
        Builtin::If => "Evaluates only the selected branch",
        Builtin::IfNil => "value, or fallback when value is nil",
        Builtin::And => "True when every argument is true",
        Builtin::Or => "True when any argument is true",
        Builtin::Not => "Boolean negation",
        Builtin::IsNil => "True when the value is nil",
        Builtin::Concat => "Joins the text forms of all arguments",
        Builtin::Abs => "Absolute value",
        Builtin::Round => "Rounds half away from zero",
        Builtin::Len => "Character count of the text form",
        Builtin::Upper => "Upper-cased text form",
        Builtin::Lower => "Lower-cased text form",
    }
}
