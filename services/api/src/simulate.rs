use clap::Args;
use fincoach::error::AppError;
use fincoach::finance::profile::ProfileFigures;
use fincoach::finance::scenarios::{project, Projection, ScenarioOverrides};
use std::fmt::{self, Write};
use std::io;

#[derive(Args, Debug, Default)]
pub(crate) struct SimulateArgs {
    /// Monthly salary
    #[arg(long, default_value_t = 0.0)]
    pub(crate) salary: f64,
    /// Monthly freelance income
    #[arg(long, default_value_t = 0.0)]
    pub(crate) freelance: f64,
    /// Monthly rent
    #[arg(long, default_value_t = 0.0)]
    pub(crate) rent: f64,
    /// Monthly utilities
    #[arg(long, default_value_t = 0.0)]
    pub(crate) utilities: f64,
    /// Monthly groceries
    #[arg(long, default_value_t = 0.0)]
    pub(crate) groceries: f64,
    /// Monthly subscriptions
    #[arg(long, default_value_t = 0.0)]
    pub(crate) subscriptions: f64,
    /// Other monthly spending
    #[arg(long, default_value_t = 0.0)]
    pub(crate) miscellaneous: f64,
    /// Current emergency fund balance
    #[arg(long, default_value_t = 0.0)]
    pub(crate) emergency_fund: f64,
    /// Other liquid savings
    #[arg(long, default_value_t = 0.0)]
    pub(crate) other_savings: f64,
    /// Current monthly SIP contribution
    #[arg(long, default_value_t = 0.0)]
    pub(crate) sip: f64,
    /// What-if monthly rent
    #[arg(long)]
    pub(crate) new_rent: Option<f64>,
    /// What-if annual salary after a job switch
    #[arg(long)]
    pub(crate) job_switch_salary: Option<f64>,
    /// What-if monthly SIP contribution
    #[arg(long)]
    pub(crate) sip_investment: Option<f64>,
    /// What-if yearly expense growth in percent
    #[arg(long)]
    pub(crate) expense_growth_rate: Option<f64>,
    /// Projection horizon in years (defaults to 10)
    #[arg(long)]
    pub(crate) years: Option<u32>,
    /// One-off expense paid up front in the what-if plan
    #[arg(long)]
    pub(crate) one_time_expense: Option<f64>,
    /// Print the projection as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

impl SimulateArgs {
    fn figures(&self) -> ProfileFigures {
        ProfileFigures {
            monthly_salary: self.salary,
            freelance_income: self.freelance,
            rent: self.rent,
            utilities: self.utilities,
            groceries: self.groceries,
            subscriptions: self.subscriptions,
            miscellaneous: self.miscellaneous,
            emergency_fund: self.emergency_fund,
            other_savings: self.other_savings,
            sip_monthly: self.sip,
            ..ProfileFigures::default()
        }
    }

    fn overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            new_rent: self.new_rent,
            job_switch_salary: self.job_switch_salary,
            sip_investment: self.sip_investment,
            expense_growth_rate: self.expense_growth_rate,
            projection_timeframe: self.years,
            one_time_expense: self.one_time_expense,
        }
    }
}

pub(crate) fn run_simulation(args: SimulateArgs) -> Result<(), AppError> {
    let overrides = args.overrides();
    overrides.validate().map_err(AppError::Validation)?;
    let figures = args.figures();
    for (flag, value) in [
        ("salary", figures.monthly_salary),
        ("freelance", figures.freelance_income),
        ("rent", figures.rent),
        ("utilities", figures.utilities),
        ("groceries", figures.groceries),
        ("subscriptions", figures.subscriptions),
        ("miscellaneous", figures.miscellaneous),
        ("emergency-fund", figures.emergency_fund),
        ("other-savings", figures.other_savings),
        ("sip", figures.sip_monthly),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::validation(format!(
                "--{flag} must be a non-negative amount"
            )));
        }
    }

    let projection = project(&figures, &overrides).map_err(AppError::Validation)?;
    if args.json {
        let rendered =
            serde_json::to_string_pretty(&projection).map_err(|err| AppError::Io(err.into()))?;
        println!("{rendered}");
    } else {
        let table =
            render_projection(&projection).map_err(|err| AppError::Io(io::Error::other(err)))?;
        print!("{table}");
    }
    Ok(())
}

pub(crate) fn render_projection(projection: &Projection) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let series = &projection.projection_data;
    writeln!(out, "Net worth projection over {} years", series.timeframe_years)?;
    writeln!(
        out,
        "Current plan: start {:.0}, saving {:.0}/month, investing {:.0}/month",
        projection.current_plan.initial_net_worth,
        projection.current_plan.monthly_savings,
        projection.current_plan.monthly_investments
    )?;
    writeln!(
        out,
        "What-if plan: start {:.0}, saving {:.0}/month, investing {:.0}/month",
        projection.what_if_scenario.initial_net_worth,
        projection.what_if_scenario.monthly_savings,
        projection.what_if_scenario.monthly_investments
    )?;

    writeln!(out, "\n{:>4} {:>16} {:>16}", "Year", "Current", "What-if")?;
    for (current, what_if) in series
        .current_projection
        .iter()
        .zip(&series.what_if_projection)
    {
        writeln!(
            out,
            "{:>4} {:>16} {:>16}",
            current.year, current.net_worth, what_if.net_worth
        )?;
    }

    let gain = match projection.summary.percentage_gain {
        Some(pct) => format!("{pct:.1}%"),
        None => "n/a".to_string(),
    };
    writeln!(
        out,
        "\nDifference: {} ({gain})",
        projection.summary.net_worth_difference
    )?;
    Ok(out)
}
