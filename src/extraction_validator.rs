//! # Extraction Validator
//!
//! Turns raw text-generation output into an [`ExtractionCandidate`] or a
//! [`Rejection`]. The steps run in order and stop at the first failure:
//!
//! 1. locate the first balanced `{...}` span
//! 2. parse it as JSON
//! 3. check the required fields and their shapes
//! 4. cross-check ingredients against the instructions
//!
//! The validator is pure: it never touches the catalog or the store.
//!
//! The cross-check takes the last word of each ingredient name and looks for
//! it inside the instructions. It catches gross mismatches (ingredients from one
//! page, instructions from another) and nothing subtler; the threshold lives in
//! [`ValidatorConfig`].

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::amount_parser::parse_amount;
use crate::errors::Rejection;
use crate::extraction_config::ValidatorConfig;

/// One ingredient as extracted from model output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedIngredient {
    pub name: String,
    pub amount: f64,
}

/// Structured recipe that passed validation; lives for one extraction call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionCandidate {
    pub name: String,
    pub instructions: String,
    pub serving_quantity: u32,
    pub dish_type: String,
    pub ingredients: Vec<ExtractedIngredient>,
    /// Fraction of ingredients whose key word appears in the instructions
    pub match_ratio: f64,
}

/// Terminal state of a validation run
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(ExtractionCandidate),
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    pub fn into_result(self) -> Result<ExtractionCandidate, Rejection> {
        match self {
            Verdict::Accepted(candidate) => Ok(candidate),
            Verdict::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Find the first balanced `{...}` span in `raw`
///
/// Braces inside JSON string literals are ignored. An opening brace that never
/// closes is skipped in favour of the earliest one that does. The text is
/// scanned once.
///
/// ```rust
/// use menu_costing::extraction_validator::locate_json;
///
/// let raw = "Sure! Here it is: {\"name\": \"Soup {hot}\"} Enjoy.";
/// assert_eq!(locate_json(raw), Some("{\"name\": \"Soup {hot}\"}"));
/// assert_eq!(locate_json("no data here"), None);
/// ```
pub fn locate_json(raw: &str) -> Option<&str> {
    let mut open: Vec<usize> = Vec::new();
    let mut best: Option<(usize, usize)> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in raw.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            // quotes only matter inside an open span
            '"' if !open.is_empty() => in_string = true,
            '{' => open.push(index),
            '}' => {
                if let Some(start) = open.pop() {
                    let end = index + ch.len_utf8();
                    if best.map_or(true, |(earliest, _)| start < earliest) {
                        best = Some((start, end));
                    }
                    // the outermost open brace closed; nothing earlier is pending
                    if open.is_empty() {
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    best.map(|(start, end)| &raw[start..end])
}

/// Last whitespace-delimited word of an ingredient name, lowercased
pub fn key_token(ingredient_name: &str) -> Option<String> {
    ingredient_name
        .split_whitespace()
        .last()
        .map(|token| token.to_lowercase())
}

/// Fraction of ingredients whose key token occurs in the instructions
///
/// Returns the ratio and the names that did not match. An empty ingredient
/// list counts as fully consistent.
pub fn match_ratio(ingredients: &[ExtractedIngredient], instructions: &str) -> (f64, Vec<String>) {
    if ingredients.is_empty() {
        return (1.0, Vec::new());
    }

    let haystack = instructions.to_lowercase();
    let mut unmatched = Vec::new();
    for ingredient in ingredients {
        let found = key_token(&ingredient.name)
            .map(|token| haystack.contains(&token))
            .unwrap_or(false);
        if !found {
            unmatched.push(ingredient.name.clone());
        }
    }

    let matched = ingredients.len() - unmatched.len();
    (matched as f64 / ingredients.len() as f64, unmatched)
}

/// Validates raw model output against the recipe schema
#[derive(Debug, Clone, Default)]
pub struct ExtractionValidator {
    config: ValidatorConfig,
}

impl ExtractionValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Run every validation step over `raw`
    pub fn validate(&self, raw: &str) -> Verdict {
        match self.run(raw) {
            Ok(candidate) => {
                info!(
                    "Accepted extraction '{}' with {} ingredients (match ratio {:.2})",
                    candidate.name,
                    candidate.ingredients.len(),
                    candidate.match_ratio
                );
                Verdict::Accepted(candidate)
            }
            Err(rejection) => {
                warn!("Rejected extraction: {rejection}");
                Verdict::Rejected(rejection)
            }
        }
    }

    fn run(&self, raw: &str) -> Result<ExtractionCandidate, Rejection> {
        let span = locate_json(raw).ok_or(Rejection::NoStructuredData)?;
        debug!("Located {} bytes of structured data", span.len());

        let value: Value = serde_json::from_str(span)
            .map_err(|e| Rejection::MalformedData(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| Rejection::MalformedData("expected a JSON object".to_string()))?;

        let name = required_text(object, &["name"], "name")?;
        let instructions = required_instructions(object)?;
        let serving_quantity = required_servings(object)?;
        let dish_type = required_text(object, &["dishType", "dish_type"], "dishType")?;
        let ingredients = self.required_ingredients(object)?;

        let (ratio, unmatched) = match_ratio(&ingredients, &instructions);
        if ratio < self.config.match_threshold {
            return Err(Rejection::SemanticMismatch {
                match_ratio: ratio,
                threshold: self.config.match_threshold,
                unmatched,
            });
        }
        if !unmatched.is_empty() {
            debug!("Ingredients not mentioned in instructions: {}", unmatched.join(", "));
        }

        Ok(ExtractionCandidate {
            name,
            instructions,
            serving_quantity,
            dish_type,
            ingredients,
            match_ratio: ratio,
        })
    }

    fn required_ingredients(
        &self,
        object: &Map<String, Value>,
    ) -> Result<Vec<ExtractedIngredient>, Rejection> {
        let missing = || Rejection::MissingField("ingredients".to_string());
        let entries = field(object, &["ingredients"])
            .and_then(Value::as_array)
            .ok_or_else(missing)?;
        if entries.is_empty() && self.config.require_non_empty_ingredients {
            return Err(missing());
        }

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<ExtractedIngredient, Rejection> {
                let entry = entry.as_object().ok_or_else(|| {
                    Rejection::MissingField(format!("ingredients[{index}]"))
                })?;
                let name = required_text(
                    entry,
                    &["name"],
                    &format!("ingredients[{index}].name"),
                )?;
                let amount = entry
                    .get("amount")
                    .and_then(amount_value)
                    .ok_or_else(|| {
                        Rejection::MissingField(format!("ingredients[{index}].amount"))
                    })?;
                Ok(ExtractedIngredient { name, amount })
            })
            .collect()
    }
}

fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn required_text(
    object: &Map<String, Value>,
    keys: &[&str],
    label: &str,
) -> Result<String, Rejection> {
    field(object, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Rejection::MissingField(label.to_string()))
}

/// Instructions may be a single string or a list of step strings
fn required_instructions(object: &Map<String, Value>) -> Result<String, Rejection> {
    let missing = || Rejection::MissingField("instructions".to_string());
    let text = match field(object, &["instructions"]).ok_or_else(missing)? {
        Value::String(text) => text.trim().to_string(),
        Value::Array(steps) => steps
            .iter()
            .map(|step| step.as_str().map(str::trim).ok_or_else(missing))
            .collect::<Result<Vec<_>, _>>()?
            .join("\n"),
        _ => return Err(missing()),
    };
    if text.is_empty() {
        return Err(missing());
    }
    Ok(text)
}

/// Serving quantity must be a positive whole number, as a number or digit string
fn required_servings(object: &Map<String, Value>) -> Result<u32, Rejection> {
    let servings = match field(object, &["servingQuantity", "serving_quantity"]) {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|n| n.fract() == 0.0 && *n >= 0.0)
                    .map(|n| n as u64)
            }),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    servings
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| Rejection::MissingField("servingQuantity".to_string()))
}

fn amount_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite() && *n >= 0.0),
        Value::String(text) => parse_amount(text).ok(),
        _ => None,
    }
}
