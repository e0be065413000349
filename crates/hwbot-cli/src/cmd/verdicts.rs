use super::load_config;
use crate::output::{print_json, print_table};
use std::path::Path;

pub fn run(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if json {
        return print_json(&config.verdicts);
    }

    let rows: Vec<Vec<String>> = config
        .verdicts
        .iter()
        .map(|(code, text)| vec![code.to_string(), text.to_string()])
        .collect();
    print_table(&["STATUS", "VERDICT"], &rows);
    Ok(())
}
