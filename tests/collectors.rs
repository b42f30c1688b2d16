use anyhow::Result;
use ironstream::collectors::*;
use ironstream::testing::*;
use ironstream::*;
use std::collections::{HashMap, HashSet};

#[test]
fn counting_equals_input_length() -> Result<()> {
    for n in [0usize, 1, 7, 1000] {
        let data: Vec<usize> = (0..n).collect();
        assert_eq!(from_vec(data).collect(counting())?, n as u64);
    }
    Ok(())
}

#[test]
fn joining_edge_cases() -> Result<()> {
    let empty: Vec<String> = Vec::new();
    assert_eq!(from_vec(empty).collect(joining(", "))?, "");
    assert_eq!(from_vec(vec!["a"]).collect(joining(", "))?, "a");
    assert_eq!(from_vec(vec!["a", "b", "c"]).collect(joining(", "))?, "a, b, c");
    assert_eq!(
        from_vec(vec!["x", "y"]).collect(joining_with("|", "<", ">"))?,
        "<x|y>"
    );
    assert_eq!(from_vec(Vec::<&str>::new()).collect(joining_with("|", "<", ">"))?, "<>");
    Ok(())
}

#[test]
fn zip_groups_with_more_than_one_resident() -> Result<()> {
    let by_zip: HashMap<u32, HashSet<String>> = from_vec(persons())
        .collect(grouping_by(|p: &Person| p.zip, mapping(|p: Person| p.name, to_set())))?;
    assert_eq!(by_zip.len(), 3);

    let crowded: HashMap<u32, HashSet<String>> = from_map(by_zip)
        .filter(|(_, names): &(u32, HashSet<String>)| names.len() > 1)
        .to_vec()?
        .into_iter()
        .collect();

    let expected = HashMap::from([
        (1, HashSet::from(["Andrii", "Ivan"].map(String::from))),
        (2, HashSet::from(["Petro", "Olga"].map(String::from))),
    ]);
    assert_maps_equal(&crowded, &expected);
    Ok(())
}

#[test]
fn grouping_finishes_each_key() -> Result<()> {
    let lengths = from_vec(names())
        .collect(grouping_by(|n: &String| n.len(), joining("+")))?;
    assert_eq!(lengths[&4], "Ivan+Olga");
    assert_eq!(lengths[&5], "Petro+Kiril");
    assert_eq!(lengths[&6], "Andrii");
    Ok(())
}

#[test]
fn list_set_and_sum() -> Result<()> {
    let p = from_vec(vec![3, 1, 3, 2]);
    assert_eq!(p.collect(to_list())?, vec![3, 1, 3, 2]);
    assert_eq!(p.collect(to_set())?, HashSet::from([1, 2, 3]));
    assert_eq!(p.collect(summing())?, 9);
    Ok(())
}

#[test]
fn custom_collector_from_functions() -> Result<()> {
    // Running (min, max) pair.
    let bounds = collector_of(
        || None::<(i64, i64)>,
        |acc: &mut Option<(i64, i64)>, x: i64| {
            *acc = Some(match *acc {
                Some((lo, hi)) => (lo.min(x), hi.max(x)),
                None => (x, x),
            })
        },
        |acc: &mut Option<(i64, i64)>, other: Option<(i64, i64)>| {
            if let Some((lo, hi)) = other {
                *acc = Some(match *acc {
                    Some((a, b)) => (a.min(lo), b.max(hi)),
                    None => (lo, hi),
                })
            }
        },
        |acc: Option<(i64, i64)>| acc,
        MergeLaw::Commutative,
    );
    assert_eq!(from_vec(vec![4, -2, 9, 0]).collect(bounds)?, Some((-2, 9)));
    Ok(())
}

#[test]
fn reducing_collector_matches_reduce() -> Result<()> {
    let p = range(1..6);
    let via_collector = p.collect(reducing(|a: i64, b: i64| a * b, MergeLaw::Commutative))?;
    assert_eq!(via_collector, p.reduce(|a, b| a * b)?);
    assert_eq!(via_collector, Some(120));
    Ok(())
}
