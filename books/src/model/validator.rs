// Bookshelf
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Validation of untrusted book payloads.
//!
//! Candidate payloads go through an ordered list of rules, field by field, and validation stops
//! at the first violated rule so that its message can be reported back to the client.

use crate::model::BookFields;
use bookshelf_core::model::{ModelError, ModelResult};
use serde_json::{Map, Value};

/// Minimum number of characters in the title and the author of a book.
pub(crate) const MIN_FIELD_LENGTH: usize = 3;

/// A constraint on a single field of a candidate payload.
#[derive(Clone, Copy)]
enum Rule {
    /// The field must be present.
    Required,

    /// The field must be a string.
    String,

    /// The field must not be the empty string.
    NotEmpty,

    /// The field must have at least this many characters.
    MinLength(usize),
}

/// Names of the fields a book payload may carry, in evaluation order.
const FIELD_NAMES: [&str; 2] = ["title", "author"];

/// Rules applied to every field of a book, in evaluation order.
const FIELD_RULES: [Rule; 4] =
    [Rule::Required, Rule::String, Rule::NotEmpty, Rule::MinLength(MIN_FIELD_LENGTH)];

impl Rule {
    /// Returns the error describing a violation of this rule by the field `name`.
    fn violation(self, name: &str) -> ModelError {
        let message = match self {
            Rule::Required => format!("\"{}\" is required", name),
            Rule::String => format!("\"{}\" must be a string", name),
            Rule::NotEmpty => format!("\"{}\" is not allowed to be empty", name),
            Rule::MinLength(min) => {
                format!("\"{}\" length must be at least {} characters long", name, min)
            }
        };
        ModelError(message)
    }

    /// Checks whether `value`, the content of the field `name` if present, satisfies this rule.
    fn check(self, name: &str, value: Option<&Value>) -> ModelResult<()> {
        let ok = match (self, value) {
            (Rule::Required, value) => value.is_some(),
            (Rule::String, Some(value)) => value.is_string(),
            (Rule::NotEmpty, Some(Value::String(s))) => !s.is_empty(),
            (Rule::MinLength(min), Some(Value::String(s))) => s.chars().count() >= min,
            (_, _) => true,
        };
        if ok {
            Ok(())
        } else {
            Err(self.violation(name))
        }
    }
}

/// Validates the field `name` of `object` against all `FIELD_RULES` and returns its text.
fn validate_field(object: &Map<String, Value>, name: &str) -> ModelResult<String> {
    let value = object.get(name);
    for rule in FIELD_RULES {
        rule.check(name, value)?;
    }
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(Rule::String.violation(name)),
    }
}

/// Checks that `candidate` describes a valid book and returns its contents.
///
/// The title is checked before the author, and both are checked before looking for unknown keys,
/// which are rejected in the order in which they appear in `candidate`.  The error reports the
/// first violated rule only.
pub(crate) fn validate_book(candidate: &Value) -> ModelResult<BookFields> {
    let object = match candidate.as_object() {
        Some(object) => object,
        None => return Err(ModelError("\"value\" must be of type object".to_owned())),
    };

    let title = validate_field(object, FIELD_NAMES[0])?;
    let author = validate_field(object, FIELD_NAMES[1])?;

    if let Some(unknown) = object.keys().find(|key| !FIELD_NAMES.contains(&key.as_str())) {
        return Err(ModelError(format!("\"{}\" is not allowed", unknown)));
    }

    Ok(BookFields::new(title, author))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Validates `candidate` and expects it to fail with `exp_message`.
    fn do_error_test(exp_message: &str, candidate: Value) {
        match validate_book(&candidate) {
            Ok(fields) => panic!("{} should not have validated into {:?}", candidate, fields),
            Err(e) => assert_eq!(exp_message, e.0, "Unexpected error for {}", candidate),
        }
    }

    #[test]
    fn test_ok() {
        let fields = validate_book(&json!({"title": "Dune", "author": "Herbert"})).unwrap();
        assert_eq!(BookFields::new("Dune".to_owned(), "Herbert".to_owned()), fields);
    }

    #[test]
    fn test_ok_minimum_length() {
        let fields = validate_book(&json!({"title": "Abc", "author": "Xyz"})).unwrap();
        assert_eq!(BookFields::new("Abc".to_owned(), "Xyz".to_owned()), fields);
    }

    #[test]
    fn test_ok_keeps_input_verbatim() {
        let fields = validate_book(&json!({"title": "  The Title  ", "author": "A\tB"})).unwrap();
        assert_eq!("  The Title  ", fields.title());
        assert_eq!("A\tB", fields.author());
    }

    #[test]
    fn test_ok_length_counts_characters() {
        let fields = validate_book(&json!({"title": "Ñoñ", "author": "李小龍"})).unwrap();
        assert_eq!("Ñoñ", fields.title());
        assert_eq!("李小龍", fields.author());
    }

    #[test]
    fn test_length_counts_characters_not_code_units() {
        do_error_test(
            "\"title\" length must be at least 3 characters long",
            json!({"title": "\u{1F600}\u{1F600}", "author": "Herbert"}),
        );
        let fields =
            validate_book(&json!({"title": "\u{1F600}\u{1F600}\u{1F600}", "author": "Herbert"}))
                .unwrap();
        assert_eq!("\u{1F600}\u{1F600}\u{1F600}", fields.title());
    }

    #[test]
    fn test_unknown_keys() {
        do_error_test(
            "\"year\" is not allowed",
            json!({"title": "Dune", "author": "Herbert", "year": 1965}),
        );
        do_error_test(
            "\"id\" is not allowed",
            json!({"id": "x", "title": "Dune", "author": "Herbert", "year": 1965}),
        );
        do_error_test(
            "\"year\" is not allowed",
            json!({"title": "Dune", "year": 1965, "author": "Herbert", "id": "x"}),
        );
    }

    #[test]
    fn test_unknown_keys_checked_after_fields() {
        do_error_test("\"title\" is required", json!({"year": 1965, "author": "Herbert"}));
        do_error_test(
            "\"author\" length must be at least 3 characters long",
            json!({"year": 1965, "title": "Dune", "author": "He"}),
        );
    }

    #[test]
    fn test_not_an_object() {
        do_error_test("\"value\" must be of type object", json!(null));
        do_error_test("\"value\" must be of type object", json!("Dune"));
        do_error_test("\"value\" must be of type object", json!(["Dune", "Herbert"]));
    }

    #[test]
    fn test_title_rules() {
        do_error_test("\"title\" is required", json!({"author": "Herbert"}));
        do_error_test("\"title\" must be a string", json!({"title": null, "author": "Herbert"}));
        do_error_test("\"title\" must be a string", json!({"title": 123, "author": "Herbert"}));
        do_error_test(
            "\"title\" is not allowed to be empty",
            json!({"title": "", "author": "Herbert"}),
        );
        do_error_test(
            "\"title\" length must be at least 3 characters long",
            json!({"title": "Du", "author": "Herbert"}),
        );
    }

    #[test]
    fn test_author_rules() {
        do_error_test("\"author\" is required", json!({"title": "Dune"}));
        do_error_test("\"author\" must be a string", json!({"title": "Dune", "author": ["x"]}));
        do_error_test(
            "\"author\" is not allowed to be empty",
            json!({"title": "Dune", "author": ""}),
        );
        do_error_test(
            "\"author\" length must be at least 3 characters long",
            json!({"title": "Dune", "author": "He"}),
        );
    }

    #[test]
    fn test_first_violation_wins() {
        do_error_test("\"title\" is required", json!({}));
        do_error_test(
            "\"title\" length must be at least 3 characters long",
            json!({"title": "Du", "author": "He"}),
        );
        do_error_test("\"title\" must be a string", json!({"title": 1, "author": 2}));
    }
}
