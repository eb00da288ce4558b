//! Four-section wound-care form with per-section validation.

use chrono::{NaiveDate, TimeDelta};
use thiserror::Error;
use tracing::debug;

use super::field_rules::{check_field, parse_or_zero};
use crate::domain::catalog;
use crate::domain::entities::{PatientId, TissueComposition, UserId, WoundDimensions, WoundId};
use crate::domain::errors::ValidationErrors;
use crate::domain::ports::NewWoundCare;

/// Number of wizard sections.
pub const SECTION_COUNT: usize = 4;

/// Form-level message when the tissue percentages overflow.
pub const TISSUE_OVER_LIMIT: &str = "Tissue percentages cannot add up to more than 100%.";

/// Ordered wizard sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Size,
    Tissue,
    Surroundings,
    CareDetails,
}

impl Section {
    pub const ALL: [Self; SECTION_COUNT] =
        [Self::Size, Self::Tissue, Self::Surroundings, Self::CareDetails];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Size => "Wound size",
            Self::Tissue => "Tissue",
            Self::Surroundings => "Surroundings",
            Self::CareDetails => "Care details",
        }
    }

    /// Fields shown in this section, in display order.
    #[must_use]
    pub const fn fields(self) -> &'static [CareField] {
        use CareField::{
            Borders, CareNotes, CleaningSolution, Debridement, Depth, Edema, ExudateAmount,
            ExudateType, Granulation, Height, Necrotic, NextCareDate, PrimaryCategory,
            PrimaryDressing, SecondaryCategory, SecondaryDressing, SkinProtection, Slough,
            SurroundingSkin, Width, WoundPain,
        };
        match self {
            Self::Size => &[Width, Height, Depth],
            Self::Tissue => &[Granulation, Slough, Necrotic],
            Self::Surroundings => &[Borders, SurroundingSkin, Edema, ExudateAmount, ExudateType],
            Self::CareDetails => &[
                PrimaryCategory,
                PrimaryDressing,
                SecondaryCategory,
                SecondaryDressing,
                Debridement,
                NextCareDate,
                WoundPain,
                SkinProtection,
                CleaningSolution,
                CareNotes,
            ],
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::Size => Some(Self::Tissue),
            Self::Tissue => Some(Self::Surroundings),
            Self::Surroundings => Some(Self::CareDetails),
            Self::CareDetails => None,
        }
    }

    const fn previous(self) -> Option<Self> {
        match self {
            Self::Size => None,
            Self::Tissue => Some(Self::Size),
            Self::Surroundings => Some(Self::Tissue),
            Self::CareDetails => Some(Self::Surroundings),
        }
    }
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Choice,
    Text,
    Toggle,
    Date,
}

/// Every input of the wound-care form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CareField {
    Width,
    Height,
    Depth,
    Granulation,
    Slough,
    Necrotic,
    Borders,
    SurroundingSkin,
    Edema,
    ExudateAmount,
    ExudateType,
    PrimaryCategory,
    PrimaryDressing,
    SecondaryCategory,
    SecondaryDressing,
    Debridement,
    NextCareDate,
    WoundPain,
    SkinProtection,
    CleaningSolution,
    CareNotes,
}

impl CareField {
    const COUNT: usize = 21;

    /// Key used for inline errors; matches the payload field name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::Depth => "depth",
            Self::Granulation => "granulation_tissue",
            Self::Slough => "slough",
            Self::Necrotic => "necrotic_tissue",
            Self::Borders => "borders",
            Self::SurroundingSkin => "surrounding_skin",
            Self::Edema => "edema",
            Self::ExudateAmount => "exudate_amount",
            Self::ExudateType => "exudate_type",
            Self::PrimaryCategory => "primary_category",
            Self::PrimaryDressing => "primary_dressing",
            Self::SecondaryCategory => "secondary_category",
            Self::SecondaryDressing => "secondary_dressing",
            Self::Debridement => "debridement",
            Self::NextCareDate => "next_care_date",
            Self::WoundPain => "wound_pain",
            Self::SkinProtection => "skin_protection",
            Self::CleaningSolution => "wound_cleaning_solution",
            Self::CareNotes => "care_notes",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Width => "Width (cm)",
            Self::Height => "Height (cm)",
            Self::Depth => "Depth (cm)",
            Self::Granulation => "Granulation tissue (%)",
            Self::Slough => "Slough (%)",
            Self::Necrotic => "Necrotic tissue (%)",
            Self::Borders => "Borders",
            Self::SurroundingSkin => "Surrounding skin",
            Self::Edema => "Edema",
            Self::ExudateAmount => "Exudate amount",
            Self::ExudateType => "Exudate type",
            Self::PrimaryCategory => "Primary dressing category",
            Self::PrimaryDressing => "Primary dressing",
            Self::SecondaryCategory => "Secondary dressing category",
            Self::SecondaryDressing => "Secondary dressing",
            Self::Debridement => "Debridement performed",
            Self::NextCareDate => "Next care date",
            Self::WoundPain => "Pain",
            Self::SkinProtection => "Skin protection",
            Self::CleaningSolution => "Cleaning solution",
            Self::CareNotes => "Notes",
        }
    }

    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Width
            | Self::Height
            | Self::Depth
            | Self::Granulation
            | Self::Slough
            | Self::Necrotic => FieldKind::Numeric,
            Self::Borders
            | Self::SurroundingSkin
            | Self::Edema
            | Self::ExudateAmount
            | Self::ExudateType
            | Self::PrimaryCategory
            | Self::PrimaryDressing
            | Self::SecondaryCategory
            | Self::SecondaryDressing => FieldKind::Choice,
            Self::Debridement => FieldKind::Toggle,
            Self::NextCareDate => FieldKind::Date,
            Self::WoundPain | Self::SkinProtection | Self::CleaningSolution | Self::CareNotes => {
                FieldKind::Text
            }
        }
    }

    #[must_use]
    pub fn section(self) -> Section {
        Section::ALL
            .into_iter()
            .find(|section| section.fields().contains(&self))
            .unwrap_or(Section::CareDetails)
    }

    const fn is_tissue(self) -> bool {
        matches!(self, Self::Granulation | Self::Slough | Self::Necrotic)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Why an edit was refused. The field keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditRejected {
    #[error("{0} belongs to another section")]
    NotEditable(&'static str),

    #[error("a tissue percentage cannot exceed 100")]
    OverLimit,

    #[error("'{value}' is not an option for {field}")]
    UnknownOption { field: &'static str, value: String },

    #[error("{0} is not edited as text")]
    WrongKind(&'static str),
}

/// Wizard state for logging one wound-care observation.
#[derive(Debug, Clone)]
pub struct WoundCareWizard {
    patient: PatientId,
    wound: WoundId,
    care_date: NaiveDate,
    current: Section,
    values: [String; CareField::COUNT],
    debridement: bool,
    next_care_date: NaiveDate,
    errors: ValidationErrors,
}

impl WoundCareWizard {
    /// Starts on the first section with the care and next-care dates set to `today`.
    #[must_use]
    pub fn new(patient: PatientId, wound: WoundId, today: NaiveDate) -> Self {
        Self {
            patient,
            wound,
            care_date: today,
            current: Section::Size,
            values: Default::default(),
            debridement: false,
            next_care_date: today,
            errors: ValidationErrors::new(),
        }
    }

    #[must_use]
    pub const fn current(&self) -> Section {
        self.current
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        matches!(self.current, Section::CareDetails)
    }

    /// Completed fraction shown by the progress bar: `(current + 1) / 4`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let ratio = (self.current.index() + 1) as f64 / SECTION_COUNT as f64;
        ratio
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Shows a message from the backend as the form-level error.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.errors.set_form(message);
    }

    #[must_use]
    pub const fn patient(&self) -> PatientId {
        self.patient
    }

    #[must_use]
    pub const fn wound(&self) -> WoundId {
        self.wound
    }

    /// Raw text of a numeric, choice or text field.
    #[must_use]
    pub fn value(&self, field: CareField) -> &str {
        &self.values[field.slot()]
    }

    #[must_use]
    pub const fn debridement(&self) -> bool {
        self.debridement
    }

    #[must_use]
    pub const fn next_care_date(&self) -> NaiveDate {
        self.next_care_date
    }

    /// Value formatted for display, whatever the field kind.
    #[must_use]
    pub fn display_value(&self, field: CareField) -> String {
        match field.kind() {
            FieldKind::Toggle => if self.debridement { "Yes" } else { "No" }.to_string(),
            FieldKind::Date => self.next_care_date.format("%Y-%m-%d").to_string(),
            _ => self.value(field).to_string(),
        }
    }

    /// Options offered by a choice field. Specific dressings depend on the chosen category.
    #[must_use]
    pub fn options(&self, field: CareField) -> Vec<&'static str> {
        match field {
            CareField::Borders => catalog::BORDERS.to_vec(),
            CareField::SurroundingSkin => catalog::SURROUNDING_SKIN.to_vec(),
            CareField::Edema => catalog::EDEMA.to_vec(),
            CareField::ExudateAmount => catalog::EXUDATE_AMOUNT.to_vec(),
            CareField::ExudateType => catalog::EXUDATE_TYPE.to_vec(),
            CareField::PrimaryCategory | CareField::SecondaryCategory => {
                catalog::dressing_categories().collect()
            }
            CareField::PrimaryDressing => self.dressings_for(CareField::PrimaryCategory),
            CareField::SecondaryDressing => self.dressings_for(CareField::SecondaryCategory),
            _ => Vec::new(),
        }
    }

    fn dressings_for(&self, category: CareField) -> Vec<&'static str> {
        catalog::dressings_in(self.value(category))
            .map(<[&str]>::to_vec)
            .unwrap_or_default()
    }

    fn ensure_editable(&self, field: CareField) -> Result<(), EditRejected> {
        if field.section() == self.current {
            Ok(())
        } else {
            Err(EditRejected::NotEditable(field.key()))
        }
    }

    /// Replaces the text of a field in the current section.
    ///
    /// # Errors
    /// Rejects fields outside the current section, tissue values above 100,
    /// choices not offered by [`options`](Self::options), and toggle/date fields.
    pub fn set_value(&mut self, field: CareField, value: impl Into<String>) -> Result<(), EditRejected> {
        self.ensure_editable(field)?;
        let value = value.into();

        match field.kind() {
            FieldKind::Toggle | FieldKind::Date => return Err(EditRejected::WrongKind(field.key())),
            FieldKind::Numeric if field.is_tissue() => {
                if parse_or_zero(&value) > TissueComposition::MAX_TOTAL {
                    return Err(EditRejected::OverLimit);
                }
            }
            FieldKind::Choice if !value.is_empty() && !self.options(field).contains(&value.as_str()) => {
                return Err(EditRejected::UnknownOption {
                    field: field.key(),
                    value,
                });
            }
            _ => {}
        }

        let changed_category = matches!(
            field,
            CareField::PrimaryCategory | CareField::SecondaryCategory
        ) && self.values[field.slot()] != value;

        self.values[field.slot()] = value;

        if changed_category {
            let specific = if field == CareField::PrimaryCategory {
                CareField::PrimaryDressing
            } else {
                CareField::SecondaryDressing
            };
            self.values[specific.slot()].clear();
        }
        Ok(())
    }

    /// Moves a choice field to its next (or previous) option, wrapping around.
    ///
    /// # Errors
    /// Same as [`set_value`](Self::set_value); also fails when nothing can be chosen.
    pub fn cycle_option(&mut self, field: CareField, forward: bool) -> Result<(), EditRejected> {
        self.ensure_editable(field)?;
        let options = self.options(field);
        if options.is_empty() {
            return Err(EditRejected::UnknownOption {
                field: field.key(),
                value: String::new(),
            });
        }
        let position = options.iter().position(|o| *o == self.value(field));
        let index = match (position, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        self.set_value(field, options[index])
    }

    /// Flips the debridement flag.
    ///
    /// # Errors
    /// Fails outside the care details section.
    pub fn toggle_debridement(&mut self) -> Result<(), EditRejected> {
        self.ensure_editable(CareField::Debridement)?;
        self.debridement = !self.debridement;
        Ok(())
    }

    /// Moves the next care date by `days`.
    ///
    /// # Errors
    /// Fails outside the care details section.
    pub fn shift_next_care_date(&mut self, days: i64) -> Result<(), EditRejected> {
        self.ensure_editable(CareField::NextCareDate)?;
        if let Some(date) = self
            .next_care_date
            .checked_add_signed(TimeDelta::days(days))
        {
            self.next_care_date = date;
        }
        Ok(())
    }

    /// Checks the required and numeric fields of one section, updating inline errors.
    pub fn validate_section(&mut self, section: Section) -> bool {
        self.errors.clear_form();
        let mut valid = true;
        match section {
            Section::Size | Section::Tissue => {
                for field in section.fields() {
                    valid &= check_field(&mut self.errors, field.key(), &self.values[field.slot()], true);
                }
                if section == Section::Tissue {
                    let total: f64 = section
                        .fields()
                        .iter()
                        .map(|field| parse_or_zero(self.value(*field)))
                        .sum();
                    if total > TissueComposition::MAX_TOTAL {
                        self.errors.set_form(TISSUE_OVER_LIMIT);
                        valid = false;
                    }
                }
            }
            Section::Surroundings => {
                for field in section.fields() {
                    valid &= check_field(&mut self.errors, field.key(), &self.values[field.slot()], false);
                }
            }
            Section::CareDetails => {}
        }
        debug!(section = ?section, valid, "Section validated");
        valid
    }

    /// Advances when the current section is valid. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        if !self.validate_section(self.current) {
            return false;
        }
        match self.current.next() {
            Some(section) => {
                self.current = section;
                true
            }
            None => false,
        }
    }

    /// Goes back one section without validating. Returns whether it moved.
    pub fn previous(&mut self) -> bool {
        match self.current.previous() {
            Some(section) => {
                self.errors.clear_form();
                self.current = section;
                true
            }
            None => false,
        }
    }

    /// Builds the payload after validating the current (last) section only.
    ///
    /// # Errors
    /// Returns the inline errors if the section fails, or a form error when
    /// called before reaching the last section.
    pub fn submit(&mut self, author: UserId) -> Result<NewWoundCare, ValidationErrors> {
        if !self.validate_section(self.current) {
            return Err(self.errors.clone());
        }
        if !self.is_last() {
            let mut errors = self.errors.clone();
            errors.set_form("Complete every section before saving.");
            return Err(errors);
        }

        let number = |field: CareField| parse_or_zero(self.value(field));
        let text = |field: CareField| self.value(field).trim().to_string();
        let optional = |field: CareField| Some(text(field)).filter(|v| !v.is_empty());

        Ok(NewWoundCare {
            wound: self.wound,
            patient: self.patient,
            care_date: self.care_date,
            dimensions: WoundDimensions {
                width: number(CareField::Width),
                height: number(CareField::Height),
                depth: number(CareField::Depth),
            },
            tissue: TissueComposition {
                granulation: number(CareField::Granulation),
                slough: number(CareField::Slough),
                necrotic: number(CareField::Necrotic),
            },
            borders: text(CareField::Borders),
            surrounding_skin: text(CareField::SurroundingSkin),
            edema: text(CareField::Edema),
            exudate_amount: text(CareField::ExudateAmount),
            exudate_type: text(CareField::ExudateType),
            debridement: self.debridement,
            primary_dressing: optional(CareField::PrimaryDressing),
            secondary_dressing: optional(CareField::SecondaryDressing),
            next_care_date: Some(self.next_care_date),
            care_notes: text(CareField::CareNotes),
            wound_pain: text(CareField::WoundPain),
            skin_protection: text(CareField::SkinProtection),
            cleaning_solution: text(CareField::CleaningSolution),
            created_by: author,
            updated_by: author,
        })
    }
}
