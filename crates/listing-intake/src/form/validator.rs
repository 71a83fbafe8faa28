use serde::Serialize;
use std::collections::BTreeMap;

use super::domain::{FieldName, FormValues, ResidentialStatus};
use super::messages::MessageCatalog;
use super::rules::{FieldSchema, ListingLimits, Rule};

/// Field name to the single message currently shown for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap {
    errors: BTreeMap<FieldName, String>,
}

impl ErrorMap {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// Copy of the map restricted to the given fields.
    pub fn only<'a>(&self, fields: impl IntoIterator<Item = &'a FieldName>) -> ErrorMap {
        let errors = fields
            .into_iter()
            .filter_map(|field| {
                self.errors
                    .get(field)
                    .map(|message| (*field, message.clone()))
            })
            .collect();
        ErrorMap { errors }
    }

    pub(crate) fn insert(&mut self, field: FieldName, message: String) {
        self.errors.insert(field, message);
    }
}

/// Pure validator over a listing record. The caller decides how often to run it.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Vec<FieldSchema>,
    messages: MessageCatalog,
}

impl SchemaValidator {
    pub fn new(schema: Vec<FieldSchema>, messages: MessageCatalog) -> Self {
        Self { schema, messages }
    }

    /// Validator for the listing form with the given limits and wording.
    pub fn listing(limits: &ListingLimits, messages: MessageCatalog, require_consent: bool) -> Self {
        Self::new(listing_schema(limits, require_consent), messages)
    }

    pub fn schema(&self) -> &[FieldSchema] {
        &self.schema
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    pub fn validate(&self, values: &FormValues) -> ErrorMap {
        let mut errors = ErrorMap::default();
        for field_schema in &self.schema {
            if let Some(violation) = field_schema.check(values) {
                let message =
                    self.messages
                        .render(field_schema.field, violation.kind, &violation.params);
                errors.insert(field_schema.field, message);
            }
        }
        errors
    }

    /// Validate a single field. Cross-field rules still read the whole record.
    pub fn validate_field(&self, values: &FormValues, field: FieldName) -> Option<String> {
        self.schema
            .iter()
            .filter(|field_schema| field_schema.field == field)
            .find_map(|field_schema| {
                field_schema.check(values).map(|violation| {
                    self.messages
                        .render(field, violation.kind, &violation.params)
                })
            })
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::listing(&ListingLimits::default(), MessageCatalog::default(), true)
    }
}

pub fn listing_schema(limits: &ListingLimits, require_consent: bool) -> Vec<FieldSchema> {
    let options = ResidentialStatus::options()
        .into_iter()
        .map(ResidentialStatus::as_str)
        .collect();

    let mut schema = vec![
        FieldSchema::new(FieldName::IsResidential)
            .rule(Rule::Required)
            .rule(Rule::OneOf(options)),
        FieldSchema::new(FieldName::Name).rule(Rule::Required),
        FieldSchema::new(FieldName::Address).rule(Rule::Required),
        FieldSchema::new(FieldName::TotalFloors)
            .rule(Rule::Required)
            .rule(Rule::Number)
            .rule(Rule::Min(limits.min_total_floors))
            .rule(Rule::Max(limits.max_total_floors)),
        FieldSchema::new(FieldName::Floor)
            .rule(Rule::Required)
            .rule(Rule::Number)
            .rule(Rule::Min(limits.min_floor))
            .rule(Rule::MaxOfField(FieldName::TotalFloors)),
        FieldSchema::new(FieldName::Square)
            .rule(Rule::Required)
            .rule(Rule::Number)
            .rule(Rule::Min(limits.min_square))
            .rule(Rule::Max(limits.max_square))
            .rule(Rule::GreaterThanSum(vec![
                FieldName::KitchenSquare,
                FieldName::LivingSquare,
            ])),
        FieldSchema::new(FieldName::KitchenSquare)
            .rule(Rule::Required)
            .rule(Rule::Number)
            .rule(Rule::Min(limits.min_kitchen_square)),
        FieldSchema::new(FieldName::LivingSquare)
            .rule(Rule::Required)
            .rule(Rule::Number)
            .rule(Rule::Min(limits.min_living_square)),
    ];

    if require_consent {
        schema.push(FieldSchema::new(FieldName::IsProcessing).rule(Rule::Accepted));
    }

    schema
}
