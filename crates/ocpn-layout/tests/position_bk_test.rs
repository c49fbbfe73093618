use ocpn_layout::config::Alignment;
use ocpn_layout::layout::Adjacency;
use ocpn_layout::model::{Hop, Layering};
use ocpn_layout::position::bk::{self, Xs};
use ocpn_layout::position::conflicts::Conflicts;
use std::collections::BTreeMap;

fn layering(layers: &[&[&str]]) -> Layering {
    layers
        .iter()
        .map(|l| l.iter().map(|v| v.to_string()).collect())
        .collect()
}

fn uppers(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Vec<String> {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(v, u)| (v.to_string(), u.to_string()))
        .collect();
    move |v: &str| {
        pairs
            .iter()
            .filter(|(w, _)| w == v)
            .map(|(_, u)| u.clone())
            .collect()
    }
}

fn xs(pairs: &[(&str, f64)]) -> Xs {
    pairs.iter().map(|(v, x)| (v.to_string(), *x)).collect()
}

fn root_of<'a>(blocks: &'a bk::BlockAlignment, v: &str) -> &'a str {
    blocks.root[v].as_str()
}

#[test]
fn vertical_alignment_aligns_with_a_single_neighbor() {
    let g = layering(&[&["a"], &["b"]]);
    let blocks = bk::vertical_alignment(&g, &Conflicts::new(), uppers(&[("b", "a")]));
    assert_eq!(root_of(&blocks, "a"), "a");
    assert_eq!(root_of(&blocks, "b"), "a");
    assert_eq!(blocks.align["a"], "b");
    assert_eq!(blocks.align["b"], "a");
}

#[test]
fn vertical_alignment_skips_conflicting_hops() {
    let g = layering(&[&["a"], &["b"]]);
    let mut conflicts = Conflicts::new();
    conflicts.insert("b", "a");
    let blocks = bk::vertical_alignment(&g, &conflicts, uppers(&[("b", "a")]));
    assert_eq!(root_of(&blocks, "b"), "b");
}

#[test]
fn vertical_alignment_uses_the_median_neighbor() {
    let g = layering(&[&["a", "b", "c"], &["d"]]);
    let blocks = bk::vertical_alignment(
        &g,
        &Conflicts::new(),
        uppers(&[("d", "a"), ("d", "b"), ("d", "c")]),
    );
    assert_eq!(root_of(&blocks, "d"), "b");
}

#[test]
fn vertical_alignment_prefers_the_left_median() {
    let g = layering(&[&["a", "b"], &["c"]]);
    let blocks = bk::vertical_alignment(&g, &Conflicts::new(), uppers(&[("c", "b"), ("c", "a")]));
    assert_eq!(root_of(&blocks, "c"), "a");
}

#[test]
fn vertical_alignment_does_not_cross_an_earlier_alignment() {
    let g = layering(&[&["a", "b"], &["c", "d"]]);
    let blocks = bk::vertical_alignment(&g, &Conflicts::new(), uppers(&[("c", "b"), ("d", "a")]));
    assert_eq!(root_of(&blocks, "c"), "b");
    assert_eq!(root_of(&blocks, "d"), "d");
}

#[test]
fn horizontal_compaction_shares_block_coordinates() {
    let g = layering(&[&["a", "b"], &["c"]]);
    let root = [("a", "a"), ("b", "b"), ("c", "a")]
        .into_iter()
        .map(|(v, r)| (v.to_string(), r.to_string()))
        .collect();
    let xs = bk::horizontal_compaction(&g, &root, |_, _| 10.0);
    assert_eq!(xs["a"], 0.0);
    assert_eq!(xs["b"], 10.0);
    assert_eq!(xs["c"], 0.0);
}

#[test]
fn horizontal_compaction_pulls_blocks_towards_their_right_neighbors() {
    let g = layering(&[&["a", "b", "c"], &["d", "e"]]);
    let root = [("a", "a"), ("b", "b"), ("c", "c"), ("d", "d"), ("e", "c")]
        .into_iter()
        .map(|(v, r)| (v.to_string(), r.to_string()))
        .collect();
    let xs = bk::horizontal_compaction(&g, &root, |_, _| 10.0);
    assert_eq!(
        [xs["a"], xs["b"], xs["c"], xs["d"], xs["e"]],
        [0.0, 10.0, 20.0, 10.0, 20.0]
    );
}

#[test]
fn find_smallest_width_alignment_accounts_for_extents_and_ties() {
    let mut xss: BTreeMap<Alignment, Xs> = BTreeMap::new();
    xss.insert(Alignment::Ul, xs(&[("a", 0.0), ("b", 50.0)]));
    xss.insert(Alignment::Ur, xs(&[("a", 0.0), ("b", 20.0)]));
    xss.insert(Alignment::Dl, xs(&[("a", 10.0), ("b", 30.0)]));
    xss.insert(Alignment::Dr, xs(&[("a", 0.0), ("b", 5.0)]));
    assert_eq!(
        bk::find_smallest_width_alignment(&xss, |_| 10.0),
        Some(Alignment::Dr)
    );

    // `b` alone spans 40, so ur, dl and dr tie and the earliest one wins.
    let extent = |v: &str| if v == "b" { 40.0 } else { 0.0 };
    assert_eq!(
        bk::find_smallest_width_alignment(&xss, extent),
        Some(Alignment::Ur)
    );
}

#[test]
fn align_coordinates_uses_min_for_left_and_max_for_right() {
    let mut xss: BTreeMap<Alignment, Xs> = BTreeMap::new();
    xss.insert(Alignment::Ul, xs(&[("a", 0.0), ("b", 20.0)]));
    xss.insert(Alignment::Ur, xs(&[("a", 30.0), ("b", 60.0)]));
    xss.insert(Alignment::Dl, xs(&[("a", 5.0), ("b", 15.0)]));

    bk::align_coordinates(&mut xss, Alignment::Ul);

    assert_eq!(xss[&Alignment::Ul], xs(&[("a", 0.0), ("b", 20.0)]));
    assert_eq!(xss[&Alignment::Ur], xs(&[("a", -10.0), ("b", 20.0)]));
    assert_eq!(xss[&Alignment::Dl], xs(&[("a", 0.0), ("b", 10.0)]));
}

#[test]
fn balance_takes_the_median_or_the_pinned_alignment() {
    let mut xss: BTreeMap<Alignment, Xs> = BTreeMap::new();
    xss.insert(Alignment::Ul, xs(&[("a", 0.0)]));
    xss.insert(Alignment::Ur, xs(&[("a", 10.0)]));
    xss.insert(Alignment::Dl, xs(&[("a", 20.0)]));
    xss.insert(Alignment::Dr, xs(&[("a", 40.0)]));

    assert_eq!(bk::balance(&xss, None)["a"], 15.0);
    assert_eq!(bk::balance(&xss, Some(Alignment::Dr))["a"], 40.0);
}

#[test]
fn position_x_separates_neighbors_by_extent_and_gap() {
    let g = layering(&[&["a", "b"]]);
    let adjacency = Adjacency::from_hops(&[]);
    let xs = bk::position_x(&g, &adjacency, &Conflicts::new(), |_| 10.0, 20.0, None);
    assert_eq!(xs["a"], 0.0);
    assert_eq!(xs["b"], 30.0);
}

#[test]
fn position_x_straightens_a_chain() {
    let g = layering(&[&["a", "x"], &["b"], &["c"]]);
    let hops: Vec<Hop> = [("a", "b"), ("b", "c")]
        .into_iter()
        .map(|(u, l)| Hop {
            upper: u.to_string(),
            lower: l.to_string(),
            arc: format!("{u}{l}"),
        })
        .collect();
    let adjacency = Adjacency::from_hops(&hops);
    let xs = bk::position_x(&g, &adjacency, &Conflicts::new(), |_| 0.0, 10.0, None);
    assert_eq!(xs["b"], xs["a"]);
    assert_eq!(xs["c"], xs["a"]);
    assert!(xs["x"] - xs["a"] >= 10.0);
}
