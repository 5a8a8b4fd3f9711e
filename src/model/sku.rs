// src/model/sku.rs

use serde::Serialize;
use std::fmt;

/// Identity of an orderable medicine. Two SKUs are equal iff all three
/// fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Sku {
    pub name: String,
    pub form: String,
    pub dosage: u32,
}

impl Sku {
    pub fn new(name: impl Into<String>, form: impl Into<String>, dosage: u32) -> Self {
        Self {
            name: name.into(),
            form: form.into(),
            dosage,
        }
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}mg", self.name, self.form, self.dosage)
    }
}

/// Dense index of a SKU inside its [`Catalog`](crate::model::catalog::Catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SkuId(pub u32);

impl SkuId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SkuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SkuId({})", self.0)
    }
}

/// One field of a [`SkuMatcher`]: either pinned to a value or left open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec<T> {
    Any,
    Exactly(T),
}

impl<T: fmt::Display> fmt::Display for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSpec::Any => write!(f, "*"),
            FieldSpec::Exactly(v) => write!(f, "{v}"),
        }
    }
}

/// A possibly-partial SKU reference used by customer orders.
///
/// Never used as a storage key; it is resolved against the catalog first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuMatcher {
    pub name: String,
    pub form: FieldSpec<String>,
    pub dosage: FieldSpec<u32>,
}

impl SkuMatcher {
    /// Matches SKUs by name only.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            form: FieldSpec::Any,
            dosage: FieldSpec::Any,
        }
    }

    /// Matches exactly one SKU.
    pub fn exact(sku: &Sku) -> Self {
        Self {
            name: sku.name.clone(),
            form: FieldSpec::Exactly(sku.form.clone()),
            dosage: FieldSpec::Exactly(sku.dosage),
        }
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = FieldSpec::Exactly(form.into());
        self
    }

    pub fn with_dosage(mut self, dosage: u32) -> Self {
        self.dosage = FieldSpec::Exactly(dosage);
        self
    }

    /// Names must agree; every pinned field must agree; open fields are ignored.
    pub fn matches(&self, sku: &Sku) -> bool {
        if self.name != sku.name {
            return false;
        }
        match (&self.form, &self.dosage) {
            (FieldSpec::Any, FieldSpec::Any) => true,
            (FieldSpec::Any, FieldSpec::Exactly(dosage)) => sku.dosage == *dosage,
            (FieldSpec::Exactly(form), FieldSpec::Any) => sku.form == *form,
            (FieldSpec::Exactly(form), FieldSpec::Exactly(dosage)) => {
                sku.form == *form && sku.dosage == *dosage
            }
        }
    }
}

impl fmt::Display for SkuMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.form, self.dosage)
    }
}

/// One physical item on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockUnit {
    pub sku: SkuId,
    /// Days left before the unit is worthless. Drops by exactly 1 per day.
    pub shelf_life: i32,
    pub produced_on: u32,
}

impl StockUnit {
    pub fn new(sku: SkuId, shelf_life: i32, produced_on: u32) -> Self {
        Self {
            sku,
            shelf_life,
            produced_on,
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.shelf_life <= 0
    }
}

/// Pricing tier of the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    /// Full price.
    Regular,
    /// Near-expiry stock sold at a reduced price.
    Discounted,
}
