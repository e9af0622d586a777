use dailystreak_core::Config;
use serde::Serialize;

use super::{print_json, CommandResult};

#[derive(Serialize)]
struct TierRow<'a> {
    name: &'a str,
    range: String,
    quote: &'a str,
}

pub fn run() -> CommandResult {
    let catalog = Config::load()?.tier_catalog();
    let rows: Vec<_> = catalog
        .tiers()
        .iter()
        .map(|tier| TierRow {
            name: &tier.name,
            range: tier.range_label(),
            quote: &tier.quote,
        })
        .collect();
    print_json(&rows)
}
