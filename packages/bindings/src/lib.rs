use chrono::{DateTime, Utc};
use napi::Result as NapiResult;
use napi_derive::napi;

use bond_calc_core::fixed_income::bond::{self, BondInput};
use bond_calc_core::fixed_income::schedule::FixedClock;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_input(input_json: &str) -> NapiResult<BondInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn parse_base_date(base_date: &str) -> NapiResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(base_date)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| to_napi_error(format!("Invalid base date '{base_date}': {e}")))
}

// ---------------------------------------------------------------------------
// Bond analysis
// ---------------------------------------------------------------------------

/// Full analysis with the schedule dated from now.
#[napi]
pub fn calculate_bond(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = bond::calculate_bond(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Full analysis with the schedule dated from an RFC 3339 base date.
#[napi]
pub fn calculate_bond_at(input_json: String, base_date: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let clock = FixedClock(parse_base_date(&base_date)?);
    let output = bond::calculate_bond_with_clock(&input, &clock).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Coupon schedule rows only.
#[napi]
pub fn bond_schedule(input_json: String, base_date: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let base = parse_base_date(&base_date)?;

    let rows = bond::bond_schedule(&input, base).map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}
