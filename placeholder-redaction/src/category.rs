//! Entity categories: "what kind of sensitive value is this?"
//!
//! A category names the kind of entity a detector flagged and becomes the
//! first half of every placeholder token (`[PERSON_A]`). The built-in set is
//! closed; anything else is carried as a validated [`CustomTag`].

use std::{fmt, str::FromStr};

use crate::error::CategoryError;

/// The kind of a detected entity.
///
/// Ordering is declaration order for built-ins, with custom tags last and
/// ordered by name. Audit output relies on this for stable key order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum EntityCategory {
    /// A person's name.
    Person,
    /// An email address.
    Email,
    /// A calendar date.
    Date,
    /// A place: city, country, address, facility.
    Location,
    /// A monetary amount.
    Money,
    /// A phone number.
    Phone,
    /// A government or account identifier.
    Id,
    /// An organization.
    Org,
    /// A host-defined category.
    Custom(CustomTag),
}

impl EntityCategory {
    /// Every built-in category, in ordinal order.
    pub const BUILT_IN: [EntityCategory; 8] = [
        EntityCategory::Person,
        EntityCategory::Email,
        EntityCategory::Date,
        EntityCategory::Location,
        EntityCategory::Money,
        EntityCategory::Phone,
        EntityCategory::Id,
        EntityCategory::Org,
    ];

    /// Creates a custom category from an uppercase tag.
    pub fn custom(tag: impl Into<String>) -> Result<Self, CategoryError> {
        CustomTag::new(tag).map(EntityCategory::Custom)
    }

    /// Resolves the exact tag used inside placeholder tokens.
    ///
    /// This is the strict inverse of [`EntityCategory::as_str`]: no case
    /// folding and no aliases. Built-in names resolve to built-ins; any other
    /// valid tag becomes [`EntityCategory::Custom`].
    pub fn from_tag(tag: &str) -> Result<Self, CategoryError> {
        match built_in(tag) {
            Some(category) => Ok(category),
            None => CustomTag::validated(tag).map(EntityCategory::Custom),
        }
    }

    /// Normalizes a detector label into a category.
    ///
    /// Labels are trimmed and upper-cased, spaces and hyphens become `_`, and
    /// common NER aliases are folded into built-ins (`GPE`/`LOC` into
    /// `LOCATION`, `ORGANIZATION` into `ORG`, `PER` into `PERSON`).
    pub fn from_label(label: &str) -> Result<Self, CategoryError> {
        let normalized: String = label
            .trim()
            .chars()
            .map(|ch| match ch {
                ' ' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();

        match normalized.as_str() {
            "GPE" | "LOC" => Ok(EntityCategory::Location),
            "ORGANIZATION" => Ok(EntityCategory::Org),
            "PER" => Ok(EntityCategory::Person),
            _ => Self::from_tag(&normalized),
        }
    }

    /// The uppercase tag rendered into placeholder tokens.
    pub fn as_str(&self) -> &str {
        match self {
            EntityCategory::Person => "PERSON",
            EntityCategory::Email => "EMAIL",
            EntityCategory::Date => "DATE",
            EntityCategory::Location => "LOCATION",
            EntityCategory::Money => "MONEY",
            EntityCategory::Phone => "PHONE",
            EntityCategory::Id => "ID",
            EntityCategory::Org => "ORG",
            EntityCategory::Custom(tag) => tag.as_str(),
        }
    }

    /// Returns `true` for categories outside the built-in set.
    pub fn is_custom(&self) -> bool {
        matches!(self, EntityCategory::Custom(_))
    }
}

fn built_in(tag: &str) -> Option<EntityCategory> {
    EntityCategory::BUILT_IN
        .into_iter()
        .find(|category| category.as_str() == tag)
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

impl TryFrom<String> for EntityCategory {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value)
    }
}

impl From<EntityCategory> for String {
    fn from(value: EntityCategory) -> Self {
        value.as_str().to_owned()
    }
}

/// A validated tag for a host-defined category.
///
/// Tags are uppercase ASCII segments joined by single underscores, starting
/// with a letter: `[A-Z][A-Z0-9]*(_[A-Z0-9]+)*`. A tag may not equal a
/// built-in name, so two categories can never render the same token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomTag(String);

impl CustomTag {
    /// Validates `tag` as written; no case folding.
    pub fn new(tag: impl Into<String>) -> Result<Self, CategoryError> {
        let tag = tag.into();
        if built_in(&tag).is_some() {
            return Err(CategoryError::Reserved(tag));
        }
        Self::validated(&tag)
    }

    fn validated(tag: &str) -> Result<Self, CategoryError> {
        if tag.is_empty() {
            return Err(CategoryError::Empty);
        }
        if !is_valid_tag(tag) {
            return Err(CategoryError::InvalidTag(tag.to_owned()));
        }
        Ok(Self(tag.to_owned()))
    }

    /// The tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_tag(tag: &str) -> bool {
    if !tag.starts_with(|ch: char| ch.is_ascii_uppercase()) {
        return false;
    }
    tag.split('_').all(|segment| {
        !segment.is_empty()
            && segment
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    })
}

impl fmt::Display for CustomTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
