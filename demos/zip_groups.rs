//! Group people by zip code and keep the zip codes shared by more than one person.
//!
//! Run with: cargo run --example zip_groups

use anyhow::Result;
use ironstream::collectors::{grouping_by, mapping, to_set};
use ironstream::report::{ConsoleSink, report_entries};
use ironstream::*;
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Person {
    zip: u32,
    name: String,
}

fn person(zip: u32, name: &str) -> Person {
    Person {
        zip,
        name: name.to_string(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let people = from_vec(vec![
        person(1, "Andrii"),
        person(1, "Ivan"),
        person(2, "Petro"),
        person(2, "Olga"),
        person(3, "Kiril"),
    ]);

    let by_zip = people.collect(grouping_by(
        |p: &Person| p.zip,
        mapping(|p: Person| p.name, to_set()),
    ))?;

    let shared: BTreeMap<u32, Vec<String>> = from_map(by_zip)
        .filter(|(_, names): &(u32, std::collections::HashSet<String>)| names.len() > 1)
        .map(|(zip, names): &(u32, std::collections::HashSet<String>)| {
            let mut names: Vec<String> = names.iter().cloned().collect();
            names.sort();
            (*zip, names)
        })
        .to_vec()?
        .into_iter()
        .collect();

    report_entries(&mut ConsoleSink::stdout(), shared)?;
    Ok(())
}
