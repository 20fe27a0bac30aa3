use super::CatalogError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A single library holding (book, magazine, film, ...).
///
/// Serialized shape (API responses and the persisted store) is identical:
/// optional fields serialize as `null`, never as missing keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Assigned by the repository on creation; immutable; unique.
    pub id: u64,
    pub title: String,
    /// Open set: "book", "magazine", "film", "other", ...
    pub item_type: String,
    pub author_or_director: Option<String>,
    pub is_available: bool,
    /// Must be `None` whenever `is_available` is true.
    pub expected_available_date: Option<NaiveDate>,
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, CatalogError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CatalogError::InvalidDate(raw.to_string()))
}

/// Re-establish the availability/date rule on a merged record.
///
/// Precedence: an explicit `is_available: true` wins over a
/// simultaneously supplied date; otherwise a supplied date implies the
/// item is not available; otherwise an available item never keeps a date.
fn apply_availability_rule(
    item: &mut CatalogItem,
    availability_set_true: bool,
    date_supplied: bool,
) {
    if availability_set_true {
        item.expected_available_date = None;
        return;
    }
    if date_supplied && item.expected_available_date.is_some() {
        item.is_available = false;
        return;
    }
    if item.is_available {
        item.expected_available_date = None;
    }
}

/// Fields accepted when creating an item.
///
/// Required fields are `Option` here so that a missing field surfaces as a
/// domain validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub author_or_director: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
    /// ISO date string; validated by the repository, not by serde.
    #[serde(default)]
    pub expected_available_date: Option<String>,
}

impl NewItem {
    /// Validate the fields and build the item to insert under `id`.
    pub fn into_item(self, id: u64) -> Result<CatalogItem, CatalogError> {
        let title = self
            .title
            .filter(|t| !t.is_empty())
            .ok_or(CatalogError::TitleRequired)?;
        let item_type = self
            .item_type
            .filter(|t| !t.is_empty())
            .ok_or(CatalogError::ItemTypeRequired)?;
        let expected_available_date = self
            .expected_available_date
            .as_deref()
            .map(parse_iso_date)
            .transpose()?;

        let mut item = CatalogItem {
            id,
            title,
            item_type,
            author_or_director: self.author_or_director,
            is_available: self.is_available.unwrap_or(true),
            expected_available_date,
        };
        let date_supplied = item.expected_available_date.is_some();
        apply_availability_rule(&mut item, self.is_available == Some(true), date_supplied);
        Ok(item)
    }
}

/// One field of a patch body: absent, explicit `null`, or a replacement
/// value.
///
/// Deserializing through `Option` keeps `null` and a missing key
/// distinct; a missing key becomes [`FieldPatch::Keep`] via
/// `#[serde(default)]` on the containing struct field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldPatch<T> {
    /// Field absent from the body, keep the stored value.
    #[default]
    Keep,
    /// Field explicitly `null`, clear the stored value.
    Clear,
    /// Field present, replace the stored value.
    Set(T),
}

impl<'de, T> Deserialize<'de> for FieldPatch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Clear, Self::Set))
    }
}

/// Typed partial update. Absent fields are left untouched; for the
/// nullable fields an explicit `null` clears the stored value. Unknown
/// body fields are ignored at the boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub author_or_director: FieldPatch<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
    /// ISO date string; explicit `null` clears the date.
    #[serde(default)]
    pub expected_available_date: FieldPatch<String>,
}

impl ItemPatch {
    /// Merge the present fields into a copy of `item`, validate, and
    /// re-apply the availability/date rule.
    pub fn apply_to(&self, item: &CatalogItem) -> Result<CatalogItem, CatalogError> {
        let mut updated = item.clone();

        if let Some(title) = &self.title {
            if title.is_empty() {
                return Err(CatalogError::TitleRequired);
            }
            updated.title = title.clone();
        }
        if let Some(item_type) = &self.item_type {
            if item_type.is_empty() {
                return Err(CatalogError::ItemTypeRequired);
            }
            updated.item_type = item_type.clone();
        }
        match &self.author_or_director {
            FieldPatch::Keep => {}
            FieldPatch::Clear => updated.author_or_director = None,
            FieldPatch::Set(author) => updated.author_or_director = Some(author.clone()),
        }
        if let Some(available) = self.is_available {
            updated.is_available = available;
        }

        let mut date_supplied = false;
        match &self.expected_available_date {
            FieldPatch::Keep => {}
            FieldPatch::Clear => updated.expected_available_date = None,
            FieldPatch::Set(raw) => {
                updated.expected_available_date = Some(parse_iso_date(raw)?);
                date_supplied = true;
            }
        }

        apply_availability_rule(&mut updated, self.is_available == Some(true), date_supplied);
        Ok(updated)
    }
}

/// Listing filters. A present `exact_title` switches the repository into
/// search mode, which overrides the other filters.
#[derive(Debug, Clone, Default)]
pub struct ItemFilters {
    pub exact_title: Option<String>,
    pub item_type: Option<String>,
    pub available: Option<bool>,
}

impl ItemFilters {
    /// Whether `item` passes the `item_type`/`available` filters.
    /// The type comparison is case-insensitive.
    #[must_use]
    pub fn matches(&self, item: &CatalogItem) -> bool {
        let type_ok = self
            .item_type
            .as_deref()
            .is_none_or(|t| item.item_type.eq_ignore_ascii_case(t));
        let available_ok = self.available.is_none_or(|a| item.is_available == a);
        type_ok && available_ok
    }
}
