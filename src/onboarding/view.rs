//! Declarative view model of the active wizard step.
//!
//! Renderers consume a [`StepView`]; they never read the Draft directly.

use serde::Serialize;

use crate::clients::model::Tier;

use super::model::{Draft, DraftField, ValidationPolicy};
use super::state::OnboardingStep;

/// The field-level cue left by a failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: DraftField,
    pub reason: String,
}

/// Everything needed to draw one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub step: OnboardingStep,
    pub position: u8,
    pub total: u8,
    pub title: &'static str,
    pub body: ViewBody,
    pub can_retreat: bool,
    pub advance_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewBody {
    Form {
        fields: Vec<FormField>,
    },
    Locations {
        rows: Vec<LocationRow>,
        error: Option<FieldError>,
    },
    Review {
        sections: Vec<ReviewSection>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub field: DraftField,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
    /// Allowed values for a selection input; empty for free text.
    pub choices: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationRow {
    pub index: usize,
    pub name: String,
    pub address: Option<String>,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewSection {
    pub title: &'static str,
    pub entries: Vec<ReviewEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewEntry {
    pub label: String,
    pub value: String,
}

impl ReviewEntry {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl StepView {
    pub fn build(
        step: OnboardingStep,
        draft: &Draft,
        policy: ValidationPolicy,
        error: Option<&FieldError>,
        editing: bool,
    ) -> Self {
        let body = match step {
            OnboardingStep::Profile => form(
                draft,
                policy,
                error,
                &[DraftField::Name, DraftField::Timezone],
            ),
            OnboardingStep::Address => form(
                draft,
                policy,
                error,
                &[
                    DraftField::Street,
                    DraftField::City,
                    DraftField::State,
                    DraftField::Zip,
                    DraftField::Country,
                ],
            ),
            OnboardingStep::Plan => form(draft, policy, error, &[DraftField::Tier]),
            OnboardingStep::Locations => ViewBody::Locations {
                rows: location_rows(draft),
                error: error
                    .filter(|e| e.field.step() == OnboardingStep::Locations)
                    .cloned(),
            },
            OnboardingStep::Review => ViewBody::Review {
                sections: review_sections(draft),
            },
        };

        let advance_label = match (step.is_review(), editing) {
            (false, _) => "Next",
            (true, false) => "Create client",
            (true, true) => "Save changes",
        };

        Self {
            step,
            position: step.index(),
            total: OnboardingStep::COUNT,
            title: step.title(),
            body,
            can_retreat: step.prev().is_some(),
            advance_label,
        }
    }
}

fn form(
    draft: &Draft,
    policy: ValidationPolicy,
    error: Option<&FieldError>,
    fields: &[DraftField],
) -> ViewBody {
    let fields = fields
        .iter()
        .map(|&field| FormField {
            field,
            label: field.label(),
            value: draft.value_of(field),
            required: is_required(field, policy),
            choices: match field {
                DraftField::Tier => Tier::ALL.iter().map(Tier::to_string).collect(),
                _ => Vec::new(),
            },
            error: error
                .filter(|e| e.field == field)
                .map(|e| e.reason.clone()),
        })
        .collect();
    ViewBody::Form { fields }
}

fn is_required(field: DraftField, policy: ValidationPolicy) -> bool {
    match field {
        DraftField::Name => true,
        DraftField::Street | DraftField::City | DraftField::Country => {
            policy == ValidationPolicy::EveryStep
        }
        _ => false,
    }
}

fn location_rows(draft: &Draft) -> Vec<LocationRow> {
    draft
        .locations
        .iter()
        .enumerate()
        .map(|(index, l)| LocationRow {
            index,
            name: l.name.clone(),
            address: l.address.clone(),
            is_primary: l.is_primary,
        })
        .collect()
}

fn review_sections(draft: &Draft) -> Vec<ReviewSection> {
    let address = if draft.address.is_empty() {
        "(not set)".to_string()
    } else {
        draft.address.to_string()
    };

    let locations = draft
        .locations
        .iter()
        .map(|l| {
            let mut value = l.address.clone().unwrap_or_default();
            if l.is_primary {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str("(primary)");
            }
            ReviewEntry::new(l.name.clone(), value)
        })
        .collect();

    vec![
        ReviewSection {
            title: "Profile",
            entries: vec![
                ReviewEntry::new("Name", draft.name.trim()),
                ReviewEntry::new("Timezone", draft.timezone.trim()),
                ReviewEntry::new("Tier", draft.tier.to_string()),
            ],
        },
        ReviewSection {
            title: "Headquarters",
            entries: vec![ReviewEntry::new("Address", address)],
        },
        ReviewSection {
            title: "Locations",
            entries: locations,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::FieldEdit;

    #[test]
    fn profile_form_marks_error_field() {
        let error = FieldError {
            field: DraftField::Name,
            reason: "Client name is required".to_string(),
        };
        let view = StepView::build(
            OnboardingStep::Profile,
            &Draft::default(),
            ValidationPolicy::FirstStepOnly,
            Some(&error),
            false,
        );

        assert_eq!(view.position, 1);
        assert!(!view.can_retreat);
        assert_eq!(view.advance_label, "Next");
        let ViewBody::Form { fields } = view.body else {
            panic!("profile step should render a form");
        };
        assert_eq!(fields.len(), 2);
        assert!(fields[0].required);
        assert_eq!(fields[0].error.as_deref(), Some("Client name is required"));
        assert_eq!(fields[1].value, "UTC");
        assert!(fields[1].error.is_none());
    }

    #[test]
    fn plan_form_offers_tier_choices() {
        let view = StepView::build(
            OnboardingStep::Plan,
            &Draft::default(),
            ValidationPolicy::FirstStepOnly,
            None,
            false,
        );
        let ViewBody::Form { fields } = view.body else {
            panic!("plan step should render a form");
        };
        assert_eq!(fields[0].choices, ["Starter", "Growth", "Enterprise"]);
        assert_eq!(fields[0].value, "Starter");
    }

    #[test]
    fn address_fields_required_only_when_strict() {
        let lenient = StepView::build(
            OnboardingStep::Address,
            &Draft::default(),
            ValidationPolicy::FirstStepOnly,
            None,
            false,
        );
        let strict = StepView::build(
            OnboardingStep::Address,
            &Draft::default(),
            ValidationPolicy::EveryStep,
            None,
            false,
        );
        let required = |view: StepView| match view.body {
            ViewBody::Form { fields } => fields.iter().filter(|f| f.required).count(),
            _ => 0,
        };
        assert_eq!(required(lenient), 0);
        assert_eq!(required(strict), 3);
    }

    #[test]
    fn review_summarizes_draft() {
        let mut draft = Draft::default();
        draft.apply(FieldEdit::Name("Acme".to_string()));
        draft.apply(FieldEdit::Tier(Tier::Growth));
        draft.add_location("HQ", Some("1 Main St"), true).unwrap();
        draft.add_location("Depot", None, false).unwrap();

        let view = StepView::build(
            OnboardingStep::Review,
            &draft,
            ValidationPolicy::FirstStepOnly,
            None,
            true,
        );
        assert_eq!(view.advance_label, "Save changes");
        let ViewBody::Review { sections } = view.body else {
            panic!("review step should render a summary");
        };
        assert_eq!(sections[0].entries[0].value, "Acme");
        assert_eq!(sections[0].entries[2].value, "Growth");
        assert_eq!(sections[1].entries[0].value, "(not set)");
        assert_eq!(sections[2].entries[0].value, "1 Main St (primary)");
        assert_eq!(sections[2].entries[1].value, "");
    }

    #[test]
    fn view_serializes_with_kind_tag() {
        let view = StepView::build(
            OnboardingStep::Locations,
            &Draft::default(),
            ValidationPolicy::FirstStepOnly,
            None,
            false,
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["body"]["kind"], "locations");
        assert_eq!(json["step"], "locations");
    }
}
