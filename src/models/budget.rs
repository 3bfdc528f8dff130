use rust_decimal::Decimal;

use super::CategoryName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetLimit {
    pub(crate) category: CategoryName,
    pub(crate) monthly_limit: Decimal,
}

impl BudgetLimit {
    /// Limits written on first initialization of a budget registry.
    pub(crate) fn defaults() -> Vec<Self> {
        [
            ("Groceries", Decimal::from(300)),
            ("Entertainment", Decimal::from(100)),
            ("Utilities", Decimal::from(200)),
        ]
        .into_iter()
        .filter_map(|(name, limit)| {
            CategoryName::parse(name).ok().map(|category| Self {
                category,
                monthly_limit: limit,
            })
        })
        .collect()
    }
}
