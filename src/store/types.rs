use serde::{Deserialize, Serialize};

/// A catalog entry. Owned by the document store and read-only to the search core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Store identity, used to drop duplicates across precedence tiers.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub category: String,
    pub brand: String,
    pub product_type: String,
    pub sku: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

/// Searchable text fields of a [`Product`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Category,
    Brand,
    Sku,
    ProductType,
    Description,
}

impl Field {
    pub fn value<'a>(&self, product: &'a Product) -> &'a str {
        match self {
            Field::Title => &product.title,
            Field::Category => &product.category,
            Field::Brand => &product.brand,
            Field::Sku => &product.sku,
            Field::ProductType => &product.product_type,
            Field::Description => &product.description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Prefix,
    Contains,
}

/// Case-insensitive, literal predicate over product fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Match {
        field: Field,
        mode: MatchMode,
        /// Stored lowercased.
        value: String,
    },
    Any(Vec<Filter>),
}

impl Filter {
    pub fn exact(field: Field, value: &str) -> Self {
        Self::matching(field, MatchMode::Exact, value)
    }

    pub fn prefix(field: Field, value: &str) -> Self {
        Self::matching(field, MatchMode::Prefix, value)
    }

    pub fn contains(field: Field, value: &str) -> Self {
        Self::matching(field, MatchMode::Contains, value)
    }

    fn matching(field: Field, mode: MatchMode, value: &str) -> Self {
        Filter::Match {
            field,
            mode,
            value: value.to_lowercase(),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::All => true,
            Filter::Match { field, mode, value } => {
                let candidate = field.value(product).to_lowercase();
                match mode {
                    MatchMode::Exact => candidate == *value,
                    MatchMode::Prefix => candidate.starts_with(value.as_str()),
                    MatchMode::Contains => candidate.contains(value.as_str()),
                }
            }
            Filter::Any(filters) => filters.iter().any(|f| f.matches(product)),
        }
    }
}

/// Skip/limit/sort options for `find`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub skip: usize,
    /// `None` returns every remaining match.
    pub limit: Option<usize>,
    /// Ascending, case-insensitive; natural (insertion) order when unset.
    pub sort_by: Option<Field>,
}

impl FindOptions {
    pub fn page(skip: usize, limit: usize) -> Self {
        Self {
            skip,
            limit: Some(limit),
            sort_by: None,
        }
    }

    pub fn limit(limit: usize) -> Self {
        Self::page(0, limit)
    }

    pub fn sorted_by(mut self, field: Field) -> Self {
        self.sort_by = Some(field);
        self
    }
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
