use crate::layout::Adjacency;
use crate::model::Layering;
use rustc_hash::FxHashMap as HashMap;

/// Number of hop crossings over all consecutive layer pairs.
pub fn cross_count(layering: &Layering, adjacency: &Adjacency) -> usize {
    layering
        .windows(2)
        .map(|pair| two_layer_cross_count(adjacency, &pair[0], &pair[1]))
        .sum()
}

fn two_layer_cross_count(adjacency: &Adjacency, north: &[String], south: &[String]) -> usize {
    if south.is_empty() {
        return 0;
    }

    let south_pos: HashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut south_entries: Vec<usize> = Vec::new();
    for v in north {
        let mut entries: Vec<usize> = adjacency
            .lowers(v)
            .iter()
            .filter_map(|w| south_pos.get(w.as_str()).copied())
            .collect();
        entries.sort_unstable();
        south_entries.extend(entries);
    }

    // Accumulator tree over south positions (Barth, Jünger & Mutzel).
    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<usize> = vec![0; tree_size];

    let mut cc: usize = 0;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum: usize = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}
