use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::aggregate;
use crate::budget::BudgetStatus;
use crate::config::Config;
use crate::input::{self, ExpenseInput};
use crate::models::{CategoryName, YearMonth};
use crate::report::format_amount;
use crate::store;
use crate::tracker::Tracker;

const BAR_WIDTH: usize = 30;

pub(crate) fn as_cli(args: &[String], tracker: &mut Tracker, config: &Config) -> Result<()> {
    let Some(command) = args.get(1) else {
        return cli_summary(&[], tracker);
    };
    let rest = &args[2..];
    match command.as_str() {
        "add" | "a" => cli_add(rest, tracker),
        "list" | "ls" => cli_list(rest, tracker),
        "summary" | "s" => cli_summary(rest, tracker),
        "chart" => cli_chart(rest, tracker),
        "budgets" => cli_budgets(tracker),
        "set-budget" => cli_set_budget(rest, tracker),
        "check" => cli_check(rest, tracker),
        "forecast" => cli_forecast(tracker),
        "predict" => cli_predict(tracker),
        "report" => cli_report(rest, tracker),
        "export" => cli_export(rest, tracker),
        "watch" => super::as_watch(config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendwise {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("spendwise: local personal expense tracker");
    println!();
    println!("Usage: spendwise [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Print the overall summary");
    println!("  add <amount> <category>         Record an expense and check its budget");
    println!("    --date <YYYY-MM-DD>           Expense date (default: today)");
    println!("    --desc <text>                 Description");
    println!("  list                            List transactions");
    println!("    --month <YYYY-MM>             Only this month");
    println!("  summary [YYYY-MM]               Monthly totals and category breakdown");
    println!("  chart <YYYY-MM>                 Category shares and daily trend for a month");
    println!("  budgets                         Budget limits and this month's spend");
    println!("  set-budget <category> <limit>   Create or change a monthly limit");
    println!("  check <category> <amount>       Would this expense exceed the budget?");
    println!("    --date <YYYY-MM-DD>           Month to check (default: today)");
    println!("  forecast                        Fit the monthly trend and predict next month");
    println!("  predict                         Print only next month's predicted spend");
    println!("  report <YYYY-MM>                Print the monthly report");
    println!("    --html                        HTML instead of text");
    println!("    --out <path>                  Write to a file");
    println!("  export [path]                   Export transactions to CSV");
    println!("    --month <YYYY-MM>             Only this month");
    println!("  watch                           Deliver reports to the outbox at each month end");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
    println!();
    println!("Environment: SPENDWISE_DATA_DIR, SPENDWISE_BACKEND (sqlite|files),");
    println!("             SPENDWISE_OUTBOX, SPENDWISE_LOG");
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither flags nor the values of `value_flags`.
fn positionals<'a>(args: &'a [String], value_flags: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if value_flags.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn month_flag(args: &[String]) -> Result<Option<YearMonth>> {
    flag(args, "--month")
        .map(input::parse_month)
        .transpose()
        .map_err(Into::into)
}

fn cli_add(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let words = positionals(args, &["--date", "--desc"]);
    if words.len() < 2 {
        anyhow::bail!("Usage: spendwise add <amount> <category> [--date YYYY-MM-DD] [--desc text]");
    }
    let category = words[1..].join(" ");
    let expense = ExpenseInput {
        date: flag(args, "--date"),
        category: &category,
        amount: words[0],
        description: flag(args, "--desc").unwrap_or(""),
    };

    let recorded = tracker.add_expense(&expense, today())?;
    let txn = &recorded.transaction;
    println!(
        "✓ Expense #{} added: {} {} on {}",
        txn.id,
        format_amount(txn.amount),
        txn.category,
        txn.date
    );

    match recorded.budget {
        Ok(status @ BudgetStatus::OverBudget {
            limit,
            spent_this_month,
            pending_amount,
        }) => {
            println!(
                "⚠ Warning: this expense exceeds your {} budget ({})!",
                txn.category,
                format_amount(limit)
            );
            println!(
                "  Already spent: {}, this expense: {}, total: {} ({} over)",
                format_amount(spent_this_month),
                format_amount(pending_amount),
                format_amount(spent_this_month + pending_amount),
                format_amount(status.remaining().unwrap_or_default().abs())
            );
        }
        Ok(status @ BudgetStatus::WithinBudget { limit, .. }) => {
            println!(
                "  {} budget: {} left of {}",
                txn.category,
                format_amount(status.remaining().unwrap_or_default()),
                format_amount(limit)
            );
        }
        Ok(BudgetStatus::NoLimitConfigured) => {}
        Err(e) => eprintln!("Budget check failed (expense was still recorded): {e}"),
    }
    Ok(())
}

fn cli_list(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let txns = match month_flag(args)? {
        Some(month) => tracker.month_transactions(month)?,
        None => tracker.transactions()?,
    };
    if txns.is_empty() {
        println!("No expenses found");
        return Ok(());
    }

    println!(
        "{:<5} {:<10} {:<18} {:>12}  Description",
        "ID", "Date", "Category", "Amount"
    );
    println!("{}", "─".repeat(70));
    for txn in &txns {
        println!(
            "{:<5} {:<10} {:<18} {:>12}  {}",
            txn.id,
            txn.date,
            txn.category.as_str(),
            format_amount(txn.amount),
            txn.description
        );
    }
    println!("{}", "─".repeat(70));
    println!(
        "{} transactions, total {}",
        txns.len(),
        format_amount(aggregate::grand_total(&txns))
    );
    Ok(())
}

fn cli_summary(args: &[String], tracker: &mut Tracker) -> Result<()> {
    if let Some(raw) = positionals(args, &[]).first() {
        let month = input::parse_month(raw)?;
        print!("{}", tracker.monthly_report(month)?.to_text());
        return Ok(());
    }

    let months = tracker.monthly_totals()?;
    if months.is_empty() {
        println!("No expenses found");
        return Ok(());
    }

    println!("Monthly Expenses:");
    for bucket in &months {
        println!("  {}  {:>14}", bucket.month, format_amount(bucket.total));
    }
    println!();
    println!("Category Breakdown:");
    for (category, total) in tracker.category_totals()? {
        println!("  {:<24} {:>14}", category.as_str(), format_amount(total));
    }
    println!();
    let total: Decimal = months.iter().map(|b| b.total).sum();
    println!("Total: {}", format_amount(total));
    Ok(())
}

fn cli_chart(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let Some(raw) = positionals(args, &[]).first().copied() else {
        anyhow::bail!("Usage: spendwise chart <YYYY-MM>");
    };
    let month = input::parse_month(raw)?;
    let report = tracker.monthly_report(month)?;
    if report.is_empty() {
        println!("No expenses found for {month}");
        return Ok(());
    }

    println!("Expense Distribution ({month})");
    for bucket in &report.breakdown {
        let share = percent_of(bucket.total, report.total);
        println!(
            "  {:<18} {:<width$} {:>5}%",
            bucket.category.as_str(),
            bar(bucket.total, report.total),
            share,
            width = BAR_WIDTH
        );
    }

    println!();
    println!("Daily Spending Trend ({month})");
    let days = aggregate::by_day(&tracker.month_transactions(month)?);
    let peak = days.iter().map(|d| d.total).max().unwrap_or_default();
    for day in &days {
        println!(
            "  {}  {:<width$} {}",
            day.date,
            bar(day.total, peak),
            format_amount(day.total),
            width = BAR_WIDTH
        );
    }
    Ok(())
}

/// Share of `total` in percent, one decimal place. Zero when `total` is zero.
fn percent_of(part: Decimal, total: Decimal) -> Decimal {
    part.checked_div(total)
        .map(|ratio| (ratio * Decimal::ONE_HUNDRED).round_dp(1))
        .unwrap_or_default()
}

fn bar(value: Decimal, max: Decimal) -> String {
    if max <= Decimal::ZERO {
        return String::new();
    }
    let len = (value / max * Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_WIDTH);
    "█".repeat(len)
}

fn cli_budgets(tracker: &mut Tracker) -> Result<()> {
    let budgets = tracker.budgets()?;
    if budgets.is_empty() {
        println!("No budgets configured");
        return Ok(());
    }
    let as_of = today();
    println!("Budgets for {}", YearMonth::from_date(as_of));
    println!(
        "{:<20} {:>12} {:>12} {:>12}",
        "Category", "Limit", "Spent", "Left"
    );
    println!("{}", "─".repeat(60));
    for category in budgets.keys() {
        let status = tracker.check_budget(category, Decimal::ZERO, as_of)?;
        if let BudgetStatus::WithinBudget {
            limit,
            spent_this_month,
            ..
        }
        | BudgetStatus::OverBudget {
            limit,
            spent_this_month,
            ..
        } = status
        {
            let marker = if status.is_over() { "  ⚠" } else { "" };
            println!(
                "{:<20} {:>12} {:>12} {:>12}{marker}",
                category.as_str(),
                format_amount(limit),
                format_amount(spent_this_month),
                format_amount(status.remaining().unwrap_or_default()),
            );
        }
    }
    Ok(())
}

fn cli_set_budget(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let words = positionals(args, &[]);
    let Some((limit, name)) = words.split_last() else {
        anyhow::bail!("Usage: spendwise set-budget <category> <limit>");
    };
    if name.is_empty() {
        anyhow::bail!("Usage: spendwise set-budget <category> <limit>");
    }
    let category = CategoryName::parse(&name.join(" "))?;
    let limit = input::parse_limit(limit)?;
    tracker.set_budget(&category, limit)?;
    println!("✓ {category} budget set to {} per month", format_amount(limit));
    Ok(())
}

fn cli_check(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let words = positionals(args, &["--date"]);
    if words.len() < 2 {
        anyhow::bail!("Usage: spendwise check <category> <amount> [--date YYYY-MM-DD]");
    }
    let (amount, name) = words
        .split_last()
        .context("Usage: spendwise check <category> <amount>")?;
    let category = CategoryName::parse(&name.join(" "))?;
    let amount = input::parse_amount(amount)?;
    let as_of = input::parse_date(flag(args, "--date"), today())?;

    match tracker.check_budget(&category, amount, as_of)? {
        BudgetStatus::NoLimitConfigured => println!("No budget configured for {category}"),
        status @ BudgetStatus::WithinBudget {
            limit,
            spent_this_month,
            ..
        } => println!(
            "Within budget: {} of {} spent in {}, {} would leave {}",
            format_amount(spent_this_month),
            format_amount(limit),
            YearMonth::from_date(as_of),
            format_amount(amount),
            format_amount(status.remaining().unwrap_or_default())
        ),
        BudgetStatus::OverBudget {
            limit,
            spent_this_month,
            pending_amount,
        } => println!(
            "⚠ Over budget: {} already spent + {} > {} limit for {category}",
            format_amount(spent_this_month),
            format_amount(pending_amount),
            format_amount(limit)
        ),
    }
    Ok(())
}

fn cli_forecast(tracker: &mut Tracker) -> Result<()> {
    let forecast = tracker.forecast()?;
    println!("{:<6} {:<8} {:>14} {:>14}", "Index", "Month", "Actual", "Trend");
    println!("{}", "─".repeat(46));
    for (i, point) in forecast.points.iter().enumerate() {
        println!(
            "{:<6} {:<8} {:>14} {:>14}",
            i,
            point.month.to_string(),
            format_amount(point.total),
            format_amount(forecast.value_at(i))
        );
    }
    println!("{}", "─".repeat(46));
    println!(
        "Trend: {} per month (intercept {})",
        format_amount(forecast.slope),
        format_amount(forecast.intercept)
    );
    println!(
        "Predicted expenses for {} (index {}): {}",
        forecast.next_month,
        forecast.next_index,
        format_amount(forecast.predicted)
    );
    if forecast.predicted < Decimal::ZERO {
        println!("Note: the trend is falling fast enough to predict below zero.");
    }
    Ok(())
}

fn cli_predict(tracker: &mut Tracker) -> Result<()> {
    let predicted = tracker.predict_next_month()?;
    println!("Predicted expenses for next month: {}", format_amount(predicted));
    Ok(())
}

fn cli_report(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let Some(raw) = positionals(args, &["--out"]).first().copied() else {
        anyhow::bail!("Usage: spendwise report <YYYY-MM> [--html] [--out path]");
    };
    let month = input::parse_month(raw)?;
    let report = tracker.monthly_report(month)?;
    let body = if args.iter().any(|a| a == "--html") {
        report.to_html()
    } else {
        report.to_text()
    };

    match flag(args, "--out") {
        Some(path) => {
            let path = shellexpand(path);
            std::fs::write(&path, body)
                .with_context(|| format!("Failed to write report: {path}"))?;
            println!("✓ Report for {month} written to {path}");
        }
        None => print!("{body}"),
    }
    Ok(())
}

fn cli_export(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let month = month_flag(args)?;
    let txns = match month {
        Some(m) => tracker.month_transactions(m)?,
        None => tracker.transactions()?,
    };

    let output_path = positionals(args, &["--month"])
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            match month {
                Some(m) => format!("{home}/spendwise-export-{m}.csv"),
                None => format!("{home}/spendwise-export.csv"),
            }
        });

    let file = std::fs::File::create(&output_path)
        .with_context(|| format!("Failed to create {output_path}"))?;
    let count = store::write_ledger_csv(file, &txns)?;
    if count == 0 {
        println!("No transactions to export (wrote header only to {output_path})");
    } else {
        println!("Exported {count} transactions to {output_path}");
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
