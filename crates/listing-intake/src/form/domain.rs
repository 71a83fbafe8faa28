use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Fields collected by the listing form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    IsResidential,
    Name,
    Address,
    TotalFloors,
    Floor,
    Square,
    KitchenSquare,
    LivingSquare,
    IsProcessing,
}

impl FieldName {
    pub const fn all() -> [Self; 9] {
        [
            Self::IsResidential,
            Self::Name,
            Self::Address,
            Self::TotalFloors,
            Self::Floor,
            Self::Square,
            Self::KitchenSquare,
            Self::LivingSquare,
            Self::IsProcessing,
        ]
    }

    pub const fn numeric() -> [Self; 5] {
        [
            Self::TotalFloors,
            Self::Floor,
            Self::Square,
            Self::KitchenSquare,
            Self::LivingSquare,
        ]
    }

    /// Wire name used in request bodies and error maps.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IsResidential => "isResidential",
            Self::Name => "name",
            Self::Address => "address",
            Self::TotalFloors => "totalFloors",
            Self::Floor => "floor",
            Self::Square => "square",
            Self::KitchenSquare => "kitchenSquare",
            Self::LivingSquare => "livingSquare",
            Self::IsProcessing => "isProcessing",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|field| field.as_str() == value.trim())
    }

    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::TotalFloors | Self::Floor | Self::Square | Self::KitchenSquare | Self::LivingSquare
        )
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Residential classification of the listed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResidentialStatus {
    #[serde(rename = "жилое")]
    Residential,
    #[serde(rename = "нежилое")]
    NonResidential,
}

impl ResidentialStatus {
    pub const fn options() -> [Self; 2] {
        [Self::Residential, Self::NonResidential]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Residential => "жилое",
            Self::NonResidential => "нежилое",
        }
    }

    pub fn from_input(value: &str) -> Option<Self> {
        Self::options()
            .into_iter()
            .find(|status| status.as_str() == value.trim())
    }
}

/// Raw field values of one form instance, exactly as the user entered them.
///
/// Numeric fields keep their raw text so that partially typed or malformed
/// input can be reported as a field error instead of failing to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    #[serde(default, deserialize_with = "raw_input")]
    pub name: String,
    #[serde(default, deserialize_with = "raw_input")]
    pub address: String,
    #[serde(default, deserialize_with = "raw_input")]
    pub total_floors: String,
    #[serde(default, deserialize_with = "raw_input")]
    pub floor: String,
    #[serde(default, deserialize_with = "raw_input")]
    pub square: String,
    #[serde(default, deserialize_with = "raw_input")]
    pub living_square: String,
    #[serde(default, deserialize_with = "raw_input")]
    pub kitchen_square: String,
    #[serde(default, deserialize_with = "consent_input")]
    pub is_processing: bool,
    #[serde(default, deserialize_with = "raw_input")]
    pub is_residential: String,
}

impl FormValues {
    /// Raw text of a field. The consent flag reads as `"true"` or `"false"`.
    pub fn raw(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::Address => &self.address,
            FieldName::TotalFloors => &self.total_floors,
            FieldName::Floor => &self.floor,
            FieldName::Square => &self.square,
            FieldName::LivingSquare => &self.living_square,
            FieldName::KitchenSquare => &self.kitchen_square,
            FieldName::IsResidential => &self.is_residential,
            FieldName::IsProcessing => {
                if self.is_processing {
                    "true"
                } else {
                    "false"
                }
            }
        }
    }

    /// Replace the raw text of a field. The consent flag only takes values
    /// understood by [`parse_flag`]; anything else is refused and leaves it unchanged.
    pub fn set(
        &mut self,
        field: FieldName,
        value: impl Into<String>,
    ) -> Result<(), FieldValueError> {
        let value = value.into();
        match field {
            FieldName::Name => self.name = value,
            FieldName::Address => self.address = value,
            FieldName::TotalFloors => self.total_floors = value,
            FieldName::Floor => self.floor = value,
            FieldName::Square => self.square = value,
            FieldName::LivingSquare => self.living_square = value,
            FieldName::KitchenSquare => self.kitchen_square = value,
            FieldName::IsResidential => self.is_residential = value,
            FieldName::IsProcessing => {
                self.is_processing =
                    parse_flag(&value).ok_or(FieldValueError { field, input: value })?
            }
        }
        Ok(())
    }

    pub fn number(&self, field: FieldName) -> NumericInput {
        NumericInput::coerce(self.raw(field))
    }
}

/// Yes/no spellings accepted for boolean inputs.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a yes/no value for field '{field}'")]
pub struct FieldValueError {
    pub field: FieldName,
    pub input: String,
}

/// Result of coercing raw text into a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput {
    Missing,
    Invalid,
    Value(f64),
}

impl NumericInput {
    /// Whitespace is ignored, empty input is absent, and anything that is
    /// not a finite decimal number is invalid.
    pub fn coerce(raw: &str) -> Self {
        let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
        if compact.is_empty() {
            return Self::Missing;
        }

        // f64::from_str also accepts "inf" and "NaN" spellings.
        if !compact
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'))
        {
            return Self::Invalid;
        }

        match compact.parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Value(value),
            _ => Self::Invalid,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(value) => Some(value),
            Self::Missing | Self::Invalid => None,
        }
    }
}

/// Canonical request body: every numeric field carried as a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPayload {
    pub name: String,
    pub address: String,
    pub total_floors: f64,
    pub floor: f64,
    pub square: f64,
    pub living_square: f64,
    pub kitchen_square: f64,
    pub is_processing: bool,
    pub is_residential: ResidentialStatus,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadError {
    #[error("field '{field}' has no value")]
    Missing { field: FieldName },
    #[error("field '{field}' is not a number: '{input}'")]
    NotANumber { field: FieldName, input: String },
    #[error("unknown residential status '{input}'")]
    UnknownResidentialStatus { input: String },
}

impl TryFrom<&FormValues> for ListingPayload {
    type Error = PayloadError;

    fn try_from(values: &FormValues) -> Result<Self, Self::Error> {
        let number = |field: FieldName| match values.number(field) {
            NumericInput::Value(value) => Ok(value),
            NumericInput::Missing => Err(PayloadError::Missing { field }),
            NumericInput::Invalid => Err(PayloadError::NotANumber {
                field,
                input: values.raw(field).to_string(),
            }),
        };

        let is_residential = if values.is_residential.trim().is_empty() {
            return Err(PayloadError::Missing {
                field: FieldName::IsResidential,
            });
        } else {
            ResidentialStatus::from_input(&values.is_residential).ok_or_else(|| {
                PayloadError::UnknownResidentialStatus {
                    input: values.is_residential.clone(),
                }
            })?
        };

        Ok(Self {
            name: values.name.trim().to_string(),
            address: values.address.trim().to_string(),
            total_floors: number(FieldName::TotalFloors)?,
            floor: number(FieldName::Floor)?,
            square: number(FieldName::Square)?,
            living_square: number(FieldName::LivingSquare)?,
            kitchen_square: number(FieldName::KitchenSquare)?,
            is_processing: values.is_processing,
            is_residential,
        })
    }
}

/// Any JSON value loads; values of the wrong shape keep their text so the
/// validator reports them on their own field.
fn raw_input<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}

/// Unrecognised consent input loads as "not given" and surfaces through the consent rule.
fn consent_input<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(text)) => parse_flag(&text).unwrap_or(false),
        Some(Value::Number(number)) => parse_flag(&number.to_string()).unwrap_or(false),
        None | Some(_) => false,
    })
}
