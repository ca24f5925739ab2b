use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::debug;

use bond_calc_core::fixed_income::bond::{self, BondInput};
use bond_calc_core::fixed_income::periods::CouponFrequency;
use bond_calc_core::fixed_income::schedule::{Clock, FixedClock, SystemClock};

use crate::input;

/// Coupon frequency as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Annual,
    SemiAnnual,
}

impl From<FrequencyArg> for CouponFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Annual => CouponFrequency::Annual,
            FrequencyArg::SemiAnnual => CouponFrequency::SemiAnnual,
        }
    }
}

/// Where the bond comes from: a JSON file, individual flags, or stdin
#[derive(Args)]
pub struct BondSourceArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Face (par) value
    #[arg(long)]
    pub face_value: Option<Decimal>,

    /// Annual coupon rate in percent (8 = 8%)
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,

    /// Market price
    #[arg(long)]
    pub market_price: Option<Decimal>,

    /// Years to maturity
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Coupon frequency
    #[arg(long, value_enum)]
    pub frequency: Option<FrequencyArg>,

    /// Schedule base date (YYYY-MM-DD or RFC 3339); defaults to now
    #[arg(long)]
    pub base_date: Option<String>,
}

/// Arguments for full bond analysis
#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub source: BondSourceArgs,
}

/// Arguments for the coupon schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub source: BondSourceArgs,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bond_input = read_bond_input(&args.source)?;
    let clock = resolve_clock(&args.source)?;
    let result = bond::calculate_bond_with_clock(&bond_input, &clock)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bond_input = read_bond_input(&args.source)?;
    let clock = resolve_clock(&args.source)?;

    let rows = bond::bond_schedule(&bond_input, clock.now())?;

    Ok(json!({ "results": rows }))
}

// ---------------------------------------------------------------------------
// Input resolution
// ---------------------------------------------------------------------------

fn read_bond_input(args: &BondSourceArgs) -> Result<BondInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        debug!(path = %path, "reading bond input from file");
        return input::file::read_json(path);
    }
    if let Some(bond_input) = bond_from_flags(args)? {
        return Ok(bond_input);
    }
    if let Some(bond_input) = input::stdin::read_stdin::<BondInput>()? {
        debug!("read bond input from stdin");
        return Ok(bond_input);
    }
    Err("--input <file.json>, the bond flags (--face-value --coupon-rate --market-price \
         --years --frequency), or stdin required for bond analysis"
        .into())
}

/// Build the input from flags. `Ok(None)` when no bond flag was given.
fn bond_from_flags(args: &BondSourceArgs) -> Result<Option<BondInput>, Box<dyn std::error::Error>> {
    let flags = [
        ("--face-value", args.face_value.is_some()),
        ("--coupon-rate", args.coupon_rate.is_some()),
        ("--market-price", args.market_price.is_some()),
        ("--years", args.years.is_some()),
        ("--frequency", args.frequency.is_some()),
    ];
    if flags.iter().all(|(_, given)| !given) {
        return Ok(None);
    }

    match (
        args.face_value,
        args.coupon_rate,
        args.market_price,
        args.years,
        args.frequency,
    ) {
        (Some(face_value), Some(rate), Some(market_price), Some(years), Some(frequency)) => {
            Ok(Some(BondInput {
                face_value,
                annual_coupon_rate_pct: rate,
                market_price,
                years_to_maturity: years,
                coupon_frequency: frequency.into(),
            }))
        }
        _ => {
            let missing: Vec<&str> = flags
                .iter()
                .filter(|(_, given)| !given)
                .map(|(name, _)| *name)
                .collect();
            Err(format!("Missing bond flags: {}", missing.join(", ")).into())
        }
    }
}

fn resolve_clock(args: &BondSourceArgs) -> Result<FixedClock, Box<dyn std::error::Error>> {
    let base = match args.base_date {
        Some(ref raw) => parse_base_date(raw)?,
        None => SystemClock.now(),
    };
    Ok(FixedClock(base))
}

/// Accepts an RFC 3339 timestamp or a plain date (midnight UTC).
fn parse_base_date(raw: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            format!("Invalid --base-date '{}': expected YYYY-MM-DD or RFC 3339", raw).into()
        })
}
