use std::path::Path;

use synergyhub_core::{build_graph, Config, SynergyFilter};

use super::{load_synergies, print_json, CommandResult};

pub fn run(query: Option<String>, data: Option<&Path>) -> CommandResult {
    let config = Config::load_or_default();
    let synergies = load_synergies(data, &config)?;
    let graph = build_graph(&synergies);

    match query {
        Some(query) => {
            let filter = SynergyFilter::new().with_query(query);
            print_json(&filter.filter_graph(&graph, &synergies))
        }
        None => print_json(&graph),
    }
}
