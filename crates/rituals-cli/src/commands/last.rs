use rituals_core::{read_last, Config, Result, Ritual};

/// Print the most recent record of `ritual` as JSON, or nothing when the log
/// is empty, missing or ends in a damaged line.
pub fn run(ritual: Ritual) -> Result<()> {
    let config = Config::load_or_default();
    if let Some(record) = read_last(&config.log_path(ritual)) {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}
