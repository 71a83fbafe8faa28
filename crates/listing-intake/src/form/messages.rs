use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::domain::FieldName;

/// Kind of rule that produced a field error; keys the message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    Type,
    Min,
    Max,
    MaxOfField,
    GreaterThanSum,
    OneOf,
    Consent,
}

/// Message templates handed to the validator at construction time.
///
/// Templates may reference `{field}`, `{min}`, `{max}`, `{other}` and
/// `{fields}`; unknown placeholders are left as written. A per-field
/// message takes precedence over the template for its rule kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCatalog {
    templates: BTreeMap<RuleKind, String>,
    field_messages: BTreeMap<FieldName, BTreeMap<RuleKind, String>>,
}

impl MessageCatalog {
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
            field_messages: BTreeMap::new(),
        }
    }

    /// Wording used by the listing form.
    pub fn russian() -> Self {
        Self::empty()
            .with_template(RuleKind::Required, "Поле обязательно для заполнения")
            .with_template(RuleKind::Type, "Значение должно быть числом")
            .with_template(RuleKind::Min, "Значение не может быть меньше {min}")
            .with_template(RuleKind::Max, "Значение не может быть больше {max}")
            .with_template(RuleKind::MaxOfField, "Значение не может быть больше {max}")
            .with_template(
                RuleKind::GreaterThanSum,
                "Значение должно быть больше суммы полей {fields}",
            )
            .with_template(RuleKind::OneOf, "Выберите тип объекта")
            .with_template(RuleKind::Consent, "Необходимо согласие на обработку данных")
            .with_field_message(
                FieldName::TotalFloors,
                RuleKind::Type,
                "Количество этажей должно быть числом",
            )
            .with_field_message(FieldName::Floor, RuleKind::Type, "Этаж должен быть числом")
            .with_field_message(
                FieldName::Floor,
                RuleKind::MaxOfField,
                "Этаж не может быть больше количества этажей в доме",
            )
            .with_field_message(FieldName::Square, RuleKind::Type, "Площадь должна быть числом")
            .with_field_message(
                FieldName::Square,
                RuleKind::GreaterThanSum,
                "Общая площадь должна быть больше суммы жилой площади и площади кухни",
            )
            .with_field_message(
                FieldName::LivingSquare,
                RuleKind::Type,
                "Жилая площадь должна быть числом",
            )
            .with_field_message(
                FieldName::KitchenSquare,
                RuleKind::Type,
                "Площадь кухни должна быть числом",
            )
    }

    pub fn with_template(mut self, kind: RuleKind, template: impl Into<String>) -> Self {
        self.templates.insert(kind, template.into());
        self
    }

    pub fn with_field_message(
        mut self,
        field: FieldName,
        kind: RuleKind,
        template: impl Into<String>,
    ) -> Self {
        self.field_messages
            .entry(field)
            .or_default()
            .insert(kind, template.into());
        self
    }

    pub fn template(&self, field: FieldName, kind: RuleKind) -> Option<&str> {
        self.field_messages
            .get(&field)
            .and_then(|messages| messages.get(&kind))
            .or_else(|| self.templates.get(&kind))
            .map(String::as_str)
    }

    /// Render the message for `kind` on `field`, falling back to a bare
    /// description of the rule when the catalog has no entry.
    pub fn render(&self, field: FieldName, kind: RuleKind, params: &[(&str, String)]) -> String {
        let Some(template) = self.template(field, kind) else {
            return fallback(field, kind);
        };

        let mut message = template.replace("{field}", field.as_str());
        for (name, value) in params {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::russian()
    }
}

fn fallback(field: FieldName, kind: RuleKind) -> String {
    let rule = match kind {
        RuleKind::Required => "required",
        RuleKind::Type => "type",
        RuleKind::Min => "min",
        RuleKind::Max => "max",
        RuleKind::MaxOfField => "max_of_field",
        RuleKind::GreaterThanSum => "greater_than_sum",
        RuleKind::OneOf => "one_of",
        RuleKind::Consent => "consent",
    };
    format!("{field}: {rule}")
}

/// Wording of the notification shown after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeTexts {
    pub success_title: String,
    pub success_description: String,
    pub failure_title: String,
    pub failure_fallback: String,
    pub unknown_title: String,
    pub unknown_description: String,
}

impl Default for NoticeTexts {
    fn default() -> Self {
        Self {
            success_title: "Данные успешно отправлены!".to_string(),
            success_description: "Запись была добавлена в базу данных.".to_string(),
            failure_title: "Ошибка отправки данных".to_string(),
            failure_fallback: "Что-то пошло не так.".to_string(),
            unknown_title: "Неизвестная ошибка".to_string(),
            unknown_description: "Произошло что-то непредсказуемое.".to_string(),
        }
    }
}
