//! Boundary validation for incoming orders.
//!
//! Requests arrive as loosely typed JSON. [`CreateOrderRequest::validate`]
//! checks every field, including its JSON type, and either produces a typed
//! [`OrderSpec`] or the full list of field errors, never just the first one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::{AppError, AppResult, FieldError};
use crate::menu::{
    CoffeeType, Flavor, MilkType, Size, MAX_EXTRA_SHOTS, MAX_FLAVORS, MAX_SPECIAL_INSTRUCTIONS,
};

/// Body of `POST /orders` as the client sent it.
///
/// Fields stay as raw JSON so a value of the wrong type is reported next to
/// every other problem instead of failing the whole body. `null` counts as
/// absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub size: Option<Value>,
    pub coffee_type: Option<Value>,
    pub flavors: Option<Value>,
    pub milk: Option<Value>,
    pub extra_shot: Option<Value>,
    pub special_instructions: Option<Value>,
}

/// An order whose options have all been checked against the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub size: Size,
    pub coffee_type: CoffeeType,
    pub flavors: Vec<Flavor>,
    pub milk: MilkType,
    pub extra_shot: u8,
    pub special_instructions: Option<String>,
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_str<'a>(
    field: &str,
    value: &'a Value,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    let text = value.as_str();
    if text.is_none() {
        errors.push(FieldError::new(
            field,
            format!("expected a string, got {}", kind(value)),
        ));
    }
    text
}

fn parse_choice<T>(
    field: &str,
    raw: Option<&Value>,
    allowed: &[T],
    errors: &mut Vec<FieldError>,
) -> Option<T>
where
    T: FromStr + ToString,
{
    let raw = match raw {
        Some(raw) => expect_str(field, raw, errors)?,
        None => {
            errors.push(FieldError::new(field, "field required"));
            return None;
        }
    };

    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("'{}' is not one of: {}", raw, join(allowed)),
            ));
            None
        }
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl CreateOrderRequest {
    pub fn validate(&self) -> AppResult<OrderSpec> {
        let mut errors = Vec::new();

        let size = parse_choice("size", self.size.as_ref(), &Size::ALL, &mut errors);
        let coffee_type = parse_choice(
            "coffee_type",
            self.coffee_type.as_ref(),
            &CoffeeType::ALL,
            &mut errors,
        );

        let milk = match &self.milk {
            Some(raw) => parse_choice("milk", Some(raw), &MilkType::ALL, &mut errors),
            None => Some(MilkType::default()),
        };

        let flavors = self.validate_flavors(&mut errors);
        let extra_shot = self.validate_extra_shot(&mut errors);
        let special_instructions = self.validate_special_instructions(&mut errors);

        match (size, coffee_type, milk, flavors, extra_shot, special_instructions) {
            (
                Some(size),
                Some(coffee_type),
                Some(milk),
                Some(flavors),
                Some(extra_shot),
                Some(special_instructions),
            ) if errors.is_empty() => Ok(OrderSpec {
                size,
                coffee_type,
                flavors,
                milk,
                extra_shot,
                special_instructions,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }

    fn validate_flavors(&self, errors: &mut Vec<FieldError>) -> Option<Vec<Flavor>> {
        let items = match &self.flavors {
            None => return Some(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                errors.push(FieldError::new(
                    "flavors",
                    format!("expected a list, got {}", kind(other)),
                ));
                return None;
            }
        };

        let before = errors.len();
        if items.len() > MAX_FLAVORS {
            errors.push(FieldError::new(
                "flavors",
                format!("maximum {} flavors allowed per coffee", MAX_FLAVORS),
            ));
        }

        let mut flavors = Vec::with_capacity(items.len());
        let mut seen = HashSet::new();
        for item in items {
            let Some(raw) = expect_str("flavors", item, errors) else {
                continue;
            };
            match raw.parse::<Flavor>() {
                Ok(flavor) if seen.insert(flavor) => flavors.push(flavor),
                Ok(_) => errors.push(FieldError::new(
                    "flavors",
                    format!("'{}' listed more than once", raw),
                )),
                Err(_) => errors.push(FieldError::new(
                    "flavors",
                    format!("'{}' is not one of: {}", raw, join(&Flavor::ALL)),
                )),
            }
        }

        (errors.len() == before).then_some(flavors)
    }

    fn validate_extra_shot(&self, errors: &mut Vec<FieldError>) -> Option<u8> {
        let value = match &self.extra_shot {
            Some(value) => value,
            None => return Some(0),
        };

        let message = match value.as_i64() {
            Some(n) if (0..=MAX_EXTRA_SHOTS).contains(&n) => return Some(n as u8),
            Some(n) if n < 0 => "extra shots cannot be negative".to_string(),
            Some(_) => format!("maximum {} extra shots allowed", MAX_EXTRA_SHOTS),
            // Integers beyond i64 only arrive as u64.
            None if value.is_u64() => format!("maximum {} extra shots allowed", MAX_EXTRA_SHOTS),
            None if value.is_number() => "must be a whole number".to_string(),
            None => format!("expected an integer, got {}", kind(value)),
        };
        errors.push(FieldError::new("extra_shot", message));
        None
    }

    fn validate_special_instructions(
        &self,
        errors: &mut Vec<FieldError>,
    ) -> Option<Option<String>> {
        let value = match &self.special_instructions {
            Some(value) => value,
            None => return Some(None),
        };

        let instructions = expect_str("special_instructions", value, errors)?;
        if instructions.chars().count() > MAX_SPECIAL_INSTRUCTIONS {
            errors.push(FieldError::new(
                "special_instructions",
                format!("must be at most {} characters", MAX_SPECIAL_INSTRUCTIONS),
            ));
            return None;
        }
        Some(Some(instructions.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    /// A medium hot coffee with `fields` layered on top.
    fn request(fields: Value) -> CreateOrderRequest {
        let mut body = json!({ "size": "medium", "coffee_type": "hot" });
        if let (Some(body), Value::Object(fields)) = (body.as_object_mut(), fields) {
            body.extend(fields);
        }
        serde_json::from_value(body).unwrap()
    }

    fn field_errors(result: AppResult<OrderSpec>) -> Vec<FieldError> {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn fields(result: AppResult<OrderSpec>) -> Vec<String> {
        field_errors(result).into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn minimal_request_uses_defaults() {
        let spec = request(json!({})).validate().unwrap();
        assert_eq!(spec.size, Size::Medium);
        assert_eq!(spec.coffee_type, CoffeeType::Hot);
        assert_eq!(spec.milk, MilkType::Whole);
        assert_eq!(spec.extra_shot, 0);
        assert!(spec.flavors.is_empty());
        assert!(spec.special_instructions.is_none());
    }

    #[test]
    fn nulls_count_as_absent() {
        let spec = request(json!({
            "flavors": null,
            "milk": null,
            "extra_shot": null,
            "special_instructions": null
        }))
        .validate()
        .unwrap();
        assert_eq!(spec.milk, MilkType::Whole);
        assert_eq!(spec.extra_shot, 0);
        assert!(spec.flavors.is_empty());
    }

    #[rstest]
    #[case(json!(["hazelnut", "vanilla", "caramel"]), true)]
    #[case(json!(["hazelnut", "vanilla", "caramel", "mocha"]), false)]
    fn flavor_count_is_capped_at_three(#[case] flavors: Value, #[case] accepted: bool) {
        let req = request(json!({ "flavors": flavors }));
        assert_eq!(req.validate().is_ok(), accepted);
    }

    #[test]
    fn duplicate_flavors_are_rejected() {
        let errors = field_errors(request(json!({ "flavors": ["mocha", "mocha"] })).validate());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "flavors");
    }

    #[rstest]
    #[case(json!(-1), false)]
    #[case(json!(0), true)]
    #[case(json!(5), true)]
    #[case(json!(6), false)]
    #[case(json!(2.5), false)]
    #[case(json!(1e30), false)]
    #[case(json!(u64::MAX), false)]
    #[case(json!("two"), false)]
    fn extra_shot_must_be_an_integer_within_range(
        #[case] extra_shot: Value,
        #[case] accepted: bool,
    ) {
        let req = request(json!({ "extra_shot": extra_shot }));
        assert_eq!(req.validate().is_ok(), accepted);
    }

    #[rstest]
    #[case(200, true)]
    #[case(201, false)]
    fn special_instructions_are_length_limited(#[case] length: usize, #[case] accepted: bool) {
        let req = request(json!({ "special_instructions": "é".repeat(length) }));
        assert_eq!(req.validate().is_ok(), accepted);
    }

    #[test]
    fn reports_every_violation_together() {
        let req = request(json!({
            "size": "extra-large",
            "coffee_type": "lukewarm",
            "flavors": ["hazelnut", "vanilla", "caramel", "mocha", "cinnamon"],
            "milk": "goat",
            "extra_shot": -1,
            "special_instructions": "x".repeat(300)
        }));

        let fields = fields(req.validate());
        for expected in [
            "size",
            "coffee_type",
            "milk",
            "flavors",
            "extra_shot",
            "special_instructions",
        ] {
            assert!(fields.iter().any(|f| f == expected), "missing {}", expected);
        }
    }

    #[test]
    fn wrong_types_are_reported_with_other_violations() {
        let req = request(json!({
            "size": 5,
            "coffee_type": "lukewarm",
            "flavors": "mocha",
            "milk": true,
            "extra_shot": "two",
            "special_instructions": ["extra hot"]
        }));

        let errors = field_errors(req.validate());
        assert_eq!(errors.len(), 6);
        assert_eq!(errors[0], FieldError::new("size", "expected a string, got number"));
        assert!(errors.contains(&FieldError::new("flavors", "expected a list, got string")));
        assert!(errors.contains(&FieldError::new(
            "extra_shot",
            "expected an integer, got string"
        )));
    }

    #[test]
    fn non_string_flavor_is_a_field_error() {
        let errors = field_errors(request(json!({ "flavors": ["mocha", 7] })).validate());
        assert_eq!(
            errors,
            vec![FieldError::new("flavors", "expected a string, got number")]
        );
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let errors = field_errors(CreateOrderRequest::default().validate());
        assert_eq!(
            errors,
            vec![
                FieldError::new("size", "field required"),
                FieldError::new("coffee_type", "field required"),
            ]
        );
    }
}
