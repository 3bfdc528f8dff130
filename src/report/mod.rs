use rust_decimal::Decimal;

use crate::aggregate::{self, CategoryBucket};
use crate::models::{Transaction, YearMonth};

/// Totals for one month, handed to whatever delivers the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthlyReport {
    pub(crate) month: YearMonth,
    pub(crate) total: Decimal,
    /// Largest category first; ties by name.
    pub(crate) breakdown: Vec<CategoryBucket>,
    pub(crate) transaction_count: usize,
}

impl MonthlyReport {
    pub(crate) fn build(month: YearMonth, txns: &[Transaction]) -> Self {
        let in_month = aggregate::filter_month(txns, month);
        let mut breakdown: Vec<CategoryBucket> = aggregate::by_category(&in_month)
            .into_iter()
            .map(|(category, total)| CategoryBucket { category, total })
            .collect();
        breakdown.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

        Self {
            month,
            total: aggregate::grand_total(&in_month),
            breakdown,
            transaction_count: in_month.len(),
        }
    }

    pub(crate) fn subject(&self) -> String {
        format!("Expense Report for {}", self.month)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    pub(crate) fn to_text(&self) -> String {
        let mut out = format!(
            "{}\n{}\nTotal spent: {}\n",
            self.subject(),
            "─".repeat(40),
            format_amount(self.total)
        );
        if !self.breakdown.is_empty() {
            out.push_str("\nCategory Breakdown:\n");
            for bucket in &self.breakdown {
                out.push_str(&format!(
                    "  {:<24} {}\n",
                    bucket.category.as_str(),
                    format_amount(bucket.total)
                ));
            }
        }
        out
    }

    pub(crate) fn to_html(&self) -> String {
        let items: String = self
            .breakdown
            .iter()
            .map(|bucket| {
                format!(
                    "<li>{}: {}</li>\n",
                    escape_html(bucket.category.as_str()),
                    format_amount(bucket.total)
                )
            })
            .collect();
        format!(
            "<html>\n<body>\n<h1>{}</h1>\n<p>Total spent: <b>{}</b></p>\n<h3>Category Breakdown:</h3>\n<ul>\n{items}</ul>\n</body>\n</html>\n",
            escape_html(&self.subject()),
            format_amount(self.total)
        )
    }
}

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs().round_dp(2);
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val.round_dp(2) < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests;
