use serde::{Deserialize, Serialize};

use super::domain::{FieldName, FormValues, NumericInput};
use super::messages::RuleKind;

/// Numeric bounds enforced on the listing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingLimits {
    pub min_total_floors: f64,
    pub max_total_floors: f64,
    pub min_floor: f64,
    pub min_square: f64,
    pub max_square: f64,
    pub min_living_square: f64,
    pub min_kitchen_square: f64,
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self {
            min_total_floors: 3.0,
            max_total_floors: 200.0,
            min_floor: 1.0,
            min_square: 0.0,
            max_square: 400.0,
            min_living_square: 0.0,
            min_kitchen_square: 0.0,
        }
    }
}

/// A single constraint on one field. Rules that need a number skip input
/// that is missing or malformed; `Required` and `Number` report those.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    Number,
    Min(f64),
    Max(f64),
    /// Upper bound read from another field of the same record.
    MaxOfField(FieldName),
    /// Value must be strictly greater than the sum of the listed fields.
    GreaterThanSum(Vec<FieldName>),
    OneOf(Vec<&'static str>),
    Accepted,
}

/// Failed rule together with the values its message template needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: RuleKind,
    pub params: Vec<(&'static str, String)>,
}

impl Violation {
    fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            params: Vec::new(),
        }
    }

    fn with_param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }
}

impl Rule {
    pub fn check(&self, values: &FormValues, field: FieldName) -> Option<Violation> {
        match self {
            Rule::Required => required(values, field),
            Rule::Number => number(values, field),
            Rule::Min(min) => at_least(values, field, *min),
            Rule::Max(max) => at_most(values, field, *max),
            Rule::MaxOfField(other) => at_most_field(values, field, *other),
            Rule::GreaterThanSum(operands) => exceeds_sum_of(values, field, operands),
            Rule::OneOf(options) => one_of(values, field, options),
            Rule::Accepted => accepted(values, field),
        }
    }
}

/// Ordered rules for one field; the first violation wins.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub field: FieldName,
    pub rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn new(field: FieldName) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn check(&self, values: &FormValues) -> Option<Violation> {
        let field = self.field;
        // Type errors dominate whatever order the rules were declared in.
        if field.is_numeric()
            && self.rules.contains(&Rule::Number)
            && values.number(field) == NumericInput::Invalid
        {
            return Some(Violation::new(RuleKind::Type));
        }

        self.rules.iter().find_map(|rule| rule.check(values, field))
    }
}

pub fn required(values: &FormValues, field: FieldName) -> Option<Violation> {
    values
        .raw(field)
        .trim()
        .is_empty()
        .then(|| Violation::new(RuleKind::Required))
}

pub fn number(values: &FormValues, field: FieldName) -> Option<Violation> {
    match values.number(field) {
        NumericInput::Invalid => Some(Violation::new(RuleKind::Type)),
        NumericInput::Missing | NumericInput::Value(_) => None,
    }
}

pub fn at_least(values: &FormValues, field: FieldName, min: f64) -> Option<Violation> {
    let value = values.number(field).value()?;
    (value < min).then(|| Violation::new(RuleKind::Min).with_param("min", min))
}

pub fn at_most(values: &FormValues, field: FieldName, max: f64) -> Option<Violation> {
    let value = values.number(field).value()?;
    (value > max).then(|| Violation::new(RuleKind::Max).with_param("max", max))
}

/// The bound is whatever `other` currently holds. When `other` is empty or
/// malformed the comparison cannot be made and that field reports its own error.
pub fn at_most_field(values: &FormValues, field: FieldName, other: FieldName) -> Option<Violation> {
    let value = values.number(field).value()?;
    let bound = values.number(other).value()?;
    (value > bound).then(|| {
        Violation::new(RuleKind::MaxOfField)
            .with_param("max", bound)
            .with_param("other", other)
    })
}

/// Operands that are missing or malformed count as zero, so a partially
/// filled record does not trip the check early.
pub fn exceeds_sum_of(
    values: &FormValues,
    field: FieldName,
    operands: &[FieldName],
) -> Option<Violation> {
    if operands.is_empty() {
        return None;
    }

    let subject = match values.number(field) {
        NumericInput::Value(value) => value,
        NumericInput::Invalid => return Some(Violation::new(RuleKind::Type)),
        NumericInput::Missing => return None,
    };

    let sum: f64 = operands
        .iter()
        .map(|operand| values.number(*operand).value().unwrap_or(0.0))
        .sum();

    if subject > sum {
        return None;
    }

    let names = operands
        .iter()
        .map(|operand| operand.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Some(
        Violation::new(RuleKind::GreaterThanSum)
            .with_param("fields", names)
            .with_param("sum", sum),
    )
}

pub fn one_of(values: &FormValues, field: FieldName, options: &[&str]) -> Option<Violation> {
    let raw = values.raw(field).trim();
    if raw.is_empty() || options.contains(&raw) {
        return None;
    }
    Some(Violation::new(RuleKind::OneOf).with_param("options", options.join(", ")))
}

pub fn accepted(values: &FormValues, field: FieldName) -> Option<Violation> {
    (values.raw(field) != "true").then(|| Violation::new(RuleKind::Consent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn areas(square: &str, living: &str, kitchen: &str) -> FormValues {
        FormValues {
            square: square.to_string(),
            living_square: living.to_string(),
            kitchen_square: kitchen.to_string(),
            ..FormValues::default()
        }
    }

    const OPERANDS: [FieldName; 2] = [FieldName::KitchenSquare, FieldName::LivingSquare];

    #[test]
    fn sum_check_is_strict() {
        assert!(exceeds_sum_of(&areas("50", "20", "20"), FieldName::Square, &OPERANDS).is_none());
        let violation = exceeds_sum_of(&areas("40", "20", "20"), FieldName::Square, &OPERANDS)
            .expect("equal sum is rejected");
        assert_eq!(violation.kind, RuleKind::GreaterThanSum);
        assert!(
            exceeds_sum_of(&areas("40.0000001", "20", "20"), FieldName::Square, &OPERANDS)
                .is_none()
        );
    }

    #[test]
    fn sum_check_treats_unusable_operands_as_zero() {
        assert!(exceeds_sum_of(&areas("10", "", "abc"), FieldName::Square, &OPERANDS).is_none());
        assert!(exceeds_sum_of(&areas("10", "9", ""), FieldName::Square, &OPERANDS).is_none());
        assert!(exceeds_sum_of(&areas("10", "10", ""), FieldName::Square, &OPERANDS).is_some());
    }

    #[test]
    fn sum_check_reports_type_error_for_non_numeric_subject() {
        let violation = exceeds_sum_of(&areas("много", "20", "20"), FieldName::Square, &OPERANDS)
            .expect("malformed subject is reported");
        assert_eq!(violation.kind, RuleKind::Type);
    }

    #[test]
    fn dependent_bound_defers_when_other_field_is_unusable() {
        let mut values = FormValues {
            floor: "11".to_string(),
            ..FormValues::default()
        };
        assert!(at_most_field(&values, FieldName::Floor, FieldName::TotalFloors).is_none());

        values.total_floors = "десять".to_string();
        assert!(at_most_field(&values, FieldName::Floor, FieldName::TotalFloors).is_none());

        values.total_floors = "10".to_string();
        let violation = at_most_field(&values, FieldName::Floor, FieldName::TotalFloors)
            .expect("floor above total is rejected");
        assert_eq!(violation.kind, RuleKind::MaxOfField);
        assert!(violation.params.contains(&("max", "10".to_string())));
    }

    #[test]
    fn schema_reports_type_error_before_range_rules() {
        let schema = FieldSchema::new(FieldName::TotalFloors)
            .rule(Rule::Min(3.0))
            .rule(Rule::Required)
            .rule(Rule::Number);
        let values = FormValues {
            total_floors: "2a".to_string(),
            ..FormValues::default()
        };
        let violation = schema.check(&values).expect("malformed input is reported");
        assert_eq!(violation.kind, RuleKind::Type);
    }
}
