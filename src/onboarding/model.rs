//! Draft client model built up across the onboarding steps.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::model::{Address, ClientDetails, ClientRecord, ClientStatus, Location, Tier};
use crate::error::OnboardingError;

use super::state::OnboardingStep;

/// An input of the wizard, used to address edits and report errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Name,
    Timezone,
    Street,
    City,
    State,
    Zip,
    Country,
    Tier,
    LocationName,
    Locations,
}

impl DraftField {
    /// The step whose form owns this field.
    pub fn step(&self) -> OnboardingStep {
        match self {
            Self::Name | Self::Timezone => OnboardingStep::Profile,
            Self::Street | Self::City | Self::State | Self::Zip | Self::Country => {
                OnboardingStep::Address
            }
            Self::Tier => OnboardingStep::Plan,
            Self::LocationName | Self::Locations => OnboardingStep::Locations,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Client name",
            Self::Timezone => "Timezone",
            Self::Street => "Street",
            Self::City => "City",
            Self::State => "State",
            Self::Zip => "ZIP",
            Self::Country => "Country",
            Self::Tier => "Tier",
            Self::LocationName => "Location name",
            Self::Locations => "Locations",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Timezone => "timezone",
            Self::Street => "street",
            Self::City => "city",
            Self::State => "state",
            Self::Zip => "zip",
            Self::Country => "country",
            Self::Tier => "tier",
            Self::LocationName => "location_name",
            Self::Locations => "locations",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "timezone" | "tz" => Ok(Self::Timezone),
            "street" => Ok(Self::Street),
            "city" => Ok(Self::City),
            "state" => Ok(Self::State),
            "zip" => Ok(Self::Zip),
            "country" => Ok(Self::Country),
            "tier" => Ok(Self::Tier),
            other => Err(format!("unknown field {other:?}")),
        }
    }
}

/// A single typed edit of a Draft scalar field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Name(String),
    Timezone(String),
    Street(String),
    City(String),
    State(String),
    Zip(String),
    Country(String),
    Tier(Tier),
}

impl FieldEdit {
    pub fn field(&self) -> DraftField {
        match self {
            Self::Name(_) => DraftField::Name,
            Self::Timezone(_) => DraftField::Timezone,
            Self::Street(_) => DraftField::Street,
            Self::City(_) => DraftField::City,
            Self::State(_) => DraftField::State,
            Self::Zip(_) => DraftField::Zip,
            Self::Country(_) => DraftField::Country,
            Self::Tier(_) => DraftField::Tier,
        }
    }

    /// Build an edit from a field and its raw text value.
    pub fn parse(field: DraftField, value: &str) -> Result<Self, String> {
        let text = value.to_string();
        match field {
            DraftField::Name => Ok(Self::Name(text)),
            DraftField::Timezone => Ok(Self::Timezone(text)),
            DraftField::Street => Ok(Self::Street(text)),
            DraftField::City => Ok(Self::City(text)),
            DraftField::State => Ok(Self::State(text)),
            DraftField::Zip => Ok(Self::Zip(text)),
            DraftField::Country => Ok(Self::Country(text)),
            DraftField::Tier => value.parse().map(Self::Tier),
            DraftField::LocationName | DraftField::Locations => {
                Err(format!("{field} is edited with add-location/remove-location"))
            }
        }
    }
}

/// Which steps enforce their validation gate on `advance`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Only the profile step is gated (client name required).
    #[default]
    FirstStepOnly,
    /// Address and locations steps are gated too.
    EveryStep,
}

impl ValidationPolicy {
    pub fn gates(&self, step: OnboardingStep) -> bool {
        match self {
            Self::FirstStepOnly => step == OnboardingStep::Profile,
            Self::EveryStep => true,
        }
    }
}

/// The in-progress client record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub timezone: String,
    pub address: Address,
    pub tier: Tier,
    /// Insertion order is display order.
    pub locations: Vec<Location>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            name: String::new(),
            timezone: "UTC".to_string(),
            address: Address::default(),
            tier: Tier::default(),
            locations: Vec::new(),
        }
    }
}

impl Draft {
    /// Seed a draft from an existing client (edit flow).
    pub fn from_record(record: &ClientRecord) -> Self {
        Self {
            name: record.name.clone(),
            timezone: record.timezone.clone(),
            address: record.details.hq_address.clone(),
            tier: record.tier,
            locations: record.locations.clone(),
        }
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(v) => self.name = v,
            FieldEdit::Timezone(v) => self.timezone = v,
            FieldEdit::Street(v) => self.address.street = v,
            FieldEdit::City(v) => self.address.city = v,
            FieldEdit::State(v) => self.address.state = v,
            FieldEdit::Zip(v) => self.address.zip = v,
            FieldEdit::Country(v) => self.address.country = v,
            FieldEdit::Tier(t) => self.tier = t,
        }
    }

    /// Current text value of a scalar field.
    pub fn value_of(&self, field: DraftField) -> String {
        match field {
            DraftField::Name => self.name.clone(),
            DraftField::Timezone => self.timezone.clone(),
            DraftField::Street => self.address.street.clone(),
            DraftField::City => self.address.city.clone(),
            DraftField::State => self.address.state.clone(),
            DraftField::Zip => self.address.zip.clone(),
            DraftField::Country => self.address.country.clone(),
            DraftField::Tier => self.tier.to_string(),
            DraftField::LocationName => String::new(),
            DraftField::Locations => self.locations.len().to_string(),
        }
    }

    /// Append a location, returning its index.
    ///
    /// A primary location clears the flag on every existing one first, so at
    /// most one location is ever primary.
    pub fn add_location(
        &mut self,
        name: &str,
        address: Option<&str>,
        is_primary: bool,
    ) -> Result<usize, OnboardingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OnboardingError::Validation {
                step: OnboardingStep::Locations,
                field: DraftField::LocationName,
                reason: "location name is required".to_string(),
            });
        }

        if is_primary {
            for location in &mut self.locations {
                location.is_primary = false;
            }
        }

        let address = address
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from);
        self.locations.push(Location::new(name, address, is_primary));
        Ok(self.locations.len() - 1)
    }

    /// Remove the location at `index`. Out of bounds is a no-op.
    pub fn remove_location(&mut self, index: usize) -> Option<Location> {
        (index < self.locations.len()).then(|| self.locations.remove(index))
    }

    /// Run the gate of `step` under `policy`.
    pub fn validate_step(
        &self,
        step: OnboardingStep,
        policy: ValidationPolicy,
    ) -> Result<(), OnboardingError> {
        if !policy.gates(step) {
            return Ok(());
        }

        let required: Vec<(DraftField, &str)> = match step {
            OnboardingStep::Profile => vec![(DraftField::Name, self.name.as_str())],
            OnboardingStep::Address => vec![
                (DraftField::Street, self.address.street.as_str()),
                (DraftField::City, self.address.city.as_str()),
                (DraftField::Country, self.address.country.as_str()),
            ],
            OnboardingStep::Locations if self.locations.is_empty() => {
                return Err(OnboardingError::Validation {
                    step,
                    field: DraftField::Locations,
                    reason: "add at least one location".to_string(),
                });
            }
            OnboardingStep::Plan | OnboardingStep::Locations | OnboardingStep::Review => Vec::new(),
        };

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(OnboardingError::Validation {
                step,
                field: *field,
                reason: format!("{} is required", field.label()),
            }),
            None => Ok(()),
        }
    }

    /// Assemble the client record committed for this draft.
    pub fn to_record(&self, id: String, created_at: DateTime<Utc>) -> ClientRecord {
        ClientRecord {
            id,
            name: self.name.trim().to_string(),
            tier: self.tier,
            timezone: self.timezone.trim().to_string(),
            status: ClientStatus::Active,
            locations: self.locations.clone(),
            details: ClientDetails {
                hq_address: self.address.clone(),
                billing: self.address.clone(),
            },
            created_at: Some(created_at),
        }
    }
}
