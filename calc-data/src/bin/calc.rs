use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use calc_core::{MaritalStatus, RateTables};
use calc_core::calculations::{
    BracketTaxCalculator, LoanCalculator, LoanTerms, SalaryBreakdown, SalaryCalculator,
    compute_state_contribution,
};
use calc_data::input::{
    ensure_range, format_amount, parse_amount, parse_count, parse_loan_category,
    parse_marital_status,
};
use calc_data::logging::init_logging;
use calc_data::{BracketLoader, Catalog, Locale, load_rate_tables};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Run the calculator engines from the command line.
///
/// Amounts are read in the notation of `--locale` (`1,234.56` for en,
/// `1.234,56` for tr). Without `--rates` the built-in 2026 tables are used.
#[derive(Parser, Debug)]
#[command(name = "calc")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML rate table file
    #[arg(short, long, global = true)]
    rates: Option<PathBuf>,

    /// CSV income tax bracket file; replaces the brackets in the rate table
    #[arg(short, long, global = true)]
    brackets: Option<PathBuf>,

    /// TOML calculator catalog (needed by `related`)
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Number notation for amounts
    #[arg(short, long, global = true, value_enum, default_value_t = Locale::En)]
    locale: Locale,

    /// Log filter when RUST_LOG is unset (e.g. "warn", "calc_core=debug")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Progressive income tax on an annual income
    Tax {
        #[arg(long)]
        income: String,
    },
    /// Gross-to-net payroll for one month
    Salary {
        #[arg(long)]
        gross: String,
        #[command(flatten)]
        household: Household,
    },
    /// Gross salary needed for a target net
    GrossUp {
        #[arg(long)]
        net: String,
        #[command(flatten)]
        household: Household,
    },
    /// Twelve months of payroll with a cumulative tax base
    Payroll {
        #[arg(long)]
        gross: String,
        #[command(flatten)]
        household: Household,
    },
    /// Loan payment, total cost and surcharges
    Loan {
        #[arg(long)]
        principal: String,
        /// Annual nominal rate in percent
        #[arg(long)]
        rate: String,
        /// Term in months
        #[arg(long)]
        term: String,
        #[arg(long, default_value = "consumer")]
        category: String,
        /// Print the month-by-month schedule
        #[arg(long, default_value_t = false)]
        schedule: bool,
    },
    /// Voluntary pension state contribution
    Pension {
        #[arg(long)]
        monthly: String,
        #[arg(long, default_value = "12")]
        months: String,
    },
    /// Related calculators for a catalog entry
    Related {
        #[arg(long)]
        id: String,
        #[arg(long, default_value_t = 5)]
        max: usize,
    },
}

#[derive(clap::Args, Debug)]
struct Household {
    #[arg(long, default_value = "single")]
    marital: String,
    #[arg(long, default_value = "0")]
    dependents: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log_level.as_deref())?;

    let tables = load_tables(&args)?;
    let locale = args.locale;

    match &args.command {
        Command::Tax { income } => {
            let income = ensure_range(
                "income",
                parse_amount("income", income, locale)?,
                Decimal::ZERO,
                Decimal::MAX,
            )?;
            let result = BracketTaxCalculator::new(&tables.income_tax_brackets)
                .calculate(income)
                .context("Failed to compute income tax")?;

            for line in &result.breakdown {
                println!(
                    "{:>6}%  {:>18}  {:>16}",
                    line.bracket.rate * Decimal::ONE_HUNDRED,
                    format_amount(line.taxable_amount, locale),
                    format_amount(line.tax, locale)
                );
            }
            println!("Total tax:      {}", format_amount(result.total_tax, locale));
            println!("Effective rate: {}%", result.effective_rate_percent);
        }
        Command::Salary { gross, household } => {
            let gross = parse_gross(gross, locale)?;
            let (marital, dependents) = parse_household(household)?;
            let month = SalaryCalculator::new(&tables)
                .compute_net_salary(gross, marital, dependents)
                .context("Failed to compute net salary")?;
            print_salary(&month, locale);
        }
        Command::GrossUp { net, household } => {
            let net = parse_gross(net, locale)?;
            let (marital, dependents) = parse_household(household)?;
            let calculator = SalaryCalculator::new(&tables);
            let gross = calculator
                .gross_up(net, marital, dependents)
                .context("Failed to gross up salary")?;
            let month = calculator.compute_net_salary(gross, marital, dependents)?;
            print_salary(&month, locale);
        }
        Command::Payroll { gross, household } => {
            let gross = parse_gross(gross, locale)?;
            let (marital, dependents) = parse_household(household)?;
            let year = SalaryCalculator::new(&tables)
                .compute_annual_payroll(gross, marital, dependents)
                .context("Failed to compute annual payroll")?;

            for (index, month) in year.months.iter().enumerate() {
                println!(
                    "{:>2}  income tax {:>14}  net {:>14}",
                    index + 1,
                    format_amount(month.deductions.income_tax, locale),
                    format_amount(month.net, locale)
                );
            }
            println!("Total net:           {}", format_amount(year.total_net, locale));
            println!("Total income tax:    {}", format_amount(year.total_income_tax, locale));
            println!("Total employer cost: {}", format_amount(year.total_employer_cost, locale));
        }
        Command::Loan {
            principal,
            rate,
            term,
            category,
            schedule,
        } => {
            let terms = LoanTerms {
                principal: parse_amount("principal", principal, locale)?,
                nominal_rate_percent: ensure_range(
                    "rate",
                    parse_amount("rate", rate, locale)?,
                    Decimal::ZERO,
                    Decimal::ONE_THOUSAND,
                )?,
                term_months: parse_count("term", term)?,
                category: parse_loan_category("category", category)?,
            };
            if terms.principal <= Decimal::ZERO {
                bail!("principal must be positive");
            }

            let calculator = LoanCalculator::new(&tables.loan_surcharges);
            let (cost, rows) = calculator
                .compute_with_schedule(&terms)
                .context("Failed to compute loan cost")?;

            if *schedule {
                for row in &rows {
                    println!(
                        "{:>4}  {:>14}  {:>14}  {:>14}  {:>16}",
                        row.month,
                        format_amount(row.payment, locale),
                        format_amount(row.principal, locale),
                        format_amount(row.interest, locale),
                        format_amount(row.balance, locale)
                    );
                }
            }
            println!("Effective rate:  {}%", cost.effective_rate_percent);
            println!("Monthly payment: {}", format_amount(cost.monthly_payment, locale));
            println!("Total payment:   {}", format_amount(cost.total_payment, locale));
            println!("Total interest:  {}", format_amount(cost.total_interest, locale));
            for surcharge in &cost.surcharges {
                println!("  {:<16} {}", surcharge.name, format_amount(surcharge.amount, locale));
            }
            println!("Upfront fees:    {}", format_amount(cost.upfront_fees, locale));
            println!("Total cost:      {}", format_amount(cost.total_cost, locale));
        }
        Command::Pension { monthly, months } => {
            let monthly = parse_amount("monthly", monthly, locale)?;
            let months = parse_count("months", months)?;
            let result = compute_state_contribution(monthly, months, &tables.pension)
                .context("Failed to compute state contribution")?;

            println!("Contributions:      {}", format_amount(result.total_contributions, locale));
            println!("State contribution: {}", format_amount(result.state_contribution, locale));
            if result.capped {
                println!("(limited by the yearly cap)");
            }
        }
        Command::Related { id, max } => {
            let Some(path) = &args.catalog else {
                bail!("`related` needs --catalog");
            };
            let catalog = Catalog::load(path)
                .with_context(|| format!("Failed to load catalog: {}", path.display()))?;
            for calculator in catalog.related(id, *max)? {
                println!("{}\t{}", calculator.id, calculator.name);
            }
        }
    }

    Ok(())
}

fn load_tables(args: &Args) -> Result<RateTables> {
    let mut tables = match &args.rates {
        Some(path) => load_rate_tables(path)
            .with_context(|| format!("Failed to load rate tables: {}", path.display()))?,
        None => RateTables::default_2026(),
    };

    if let Some(path) = &args.brackets {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = BracketLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        tables.income_tax_brackets = BracketLoader::brackets_for_year(&records, tables.year)
            .with_context(|| format!("No usable {} brackets in {}", tables.year, path.display()))?;
    }

    Ok(tables)
}

fn parse_gross(
    s: &str,
    locale: Locale,
) -> Result<Decimal> {
    Ok(ensure_range(
        "gross",
        parse_amount("gross", s, locale)?,
        Decimal::ZERO,
        Decimal::MAX,
    )?)
}

fn parse_household(household: &Household) -> Result<(MaritalStatus, u32)> {
    let marital = parse_marital_status("marital", &household.marital)?;
    let dependents = parse_count("dependents", &household.dependents)?;
    Ok((marital, dependents))
}

fn print_salary(
    month: &SalaryBreakdown,
    locale: Locale,
) {
    let d = &month.deductions;
    println!("Gross:                  {}", format_amount(month.gross, locale));
    println!("Social security:        {}", format_amount(d.social_security, locale));
    println!("Unemployment:           {}", format_amount(d.unemployment, locale));
    println!("Income tax:             {}", format_amount(d.income_tax, locale));
    println!("Stamp tax:              {}", format_amount(d.stamp_tax, locale));
    println!("Minimum wage exemption: {}", format_amount(month.minimum_wage_exemption, locale));
    println!("Tax credit:             {}", format_amount(month.tax_credit, locale));
    println!("Net:                    {}", format_amount(month.net, locale));
    println!("Employer cost:          {}", format_amount(month.employer_cost, locale));
}
