//! Precedence tiers.
//!
//! Relevance without an inverted index: a fixed list of store predicates,
//! strongest first. The engine walks them lazily and stops once it holds
//! enough results, so a tier's filter is only built when it is reached.

use crate::store::types::{Field, Filter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    ExactTitle,
    TitlePrefix,
    TitleContains,
    ExactCategory,
    CategoryContains,
    ExactBrand,
    BrandContains,
    ExactSku,
    SkuContains,
    ExactProductType,
    ProductTypeContains,
    /// Substring match on any field, description included.
    AnyField,
}

impl Tier {
    pub const PRECEDENCE: [Tier; 12] = [
        Tier::ExactTitle,
        Tier::TitlePrefix,
        Tier::TitleContains,
        Tier::ExactCategory,
        Tier::CategoryContains,
        Tier::ExactBrand,
        Tier::BrandContains,
        Tier::ExactSku,
        Tier::SkuContains,
        Tier::ExactProductType,
        Tier::ProductTypeContains,
        Tier::AnyField,
    ];

    pub fn filter(self, query: &str) -> Filter {
        match self {
            Tier::ExactTitle => Filter::exact(Field::Title, query),
            Tier::TitlePrefix => Filter::prefix(Field::Title, query),
            Tier::TitleContains => Filter::contains(Field::Title, query),
            Tier::ExactCategory => Filter::exact(Field::Category, query),
            Tier::CategoryContains => Filter::contains(Field::Category, query),
            Tier::ExactBrand => Filter::exact(Field::Brand, query),
            Tier::BrandContains => Filter::contains(Field::Brand, query),
            Tier::ExactSku => Filter::exact(Field::Sku, query),
            Tier::SkuContains => Filter::contains(Field::Sku, query),
            Tier::ExactProductType => Filter::exact(Field::ProductType, query),
            Tier::ProductTypeContains => Filter::contains(Field::ProductType, query),
            Tier::AnyField => Filter::Any(
                [
                    Field::Title,
                    Field::Category,
                    Field::Brand,
                    Field::Sku,
                    Field::ProductType,
                    Field::Description,
                ]
                .into_iter()
                .map(|field| Filter::contains(field, query))
                .collect(),
            ),
        }
    }
}

/// Single predicate used for long queries: substring on title or sku.
pub fn long_query_filter(query: &str) -> Filter {
    Filter::Any(vec![
        Filter::contains(Field::Title, query),
        Filter::contains(Field::Sku, query),
    ])
}
