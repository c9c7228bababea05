use std::collections::BTreeMap;

use crate::geometry::{Coordinate, OrderedCoordinate};

/// Merges a collection of linestrings into maximal chains: lines are
/// joined at endpoints where exactly two line ends meet. Junctions of
/// three or more ends are preserved.
#[must_use]
pub fn merge_lines(lines: Vec<Vec<Coordinate>>) -> Vec<Vec<Coordinate>> {
    let lines: Vec<Vec<Coordinate>> = lines.into_iter().filter(|l| l.len() >= 2).collect();

    // endpoint -> incident line ends (line index, end is the start?)
    let mut ends: BTreeMap<OrderedCoordinate, Vec<(usize, bool)>> = BTreeMap::new();
    for (i, l) in lines.iter().enumerate() {
        ends.entry(OrderedCoordinate(l[0])).or_default().push((i, true));
        ends.entry(OrderedCoordinate(l[l.len() - 1]))
            .or_default()
            .push((i, false));
    }

    let mut used = vec![false; lines.len()];
    let mut result = Vec::new();

    for i in 0..lines.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut chain = lines[i].clone();

        // grow at the tail, then flip and grow the other way
        for _ in 0..2 {
            loop {
                let tail = OrderedCoordinate(chain[chain.len() - 1]);
                let Some(cands) = ends.get(&tail) else { break };
                if cands.len() != 2 {
                    break;
                }
                let Some(&(j, at_start)) = cands.iter().find(|(j, _)| !used[*j]) else {
                    break;
                };
                used[j] = true;
                if at_start {
                    chain.extend(lines[j].iter().skip(1));
                } else {
                    chain.extend(lines[j].iter().rev().skip(1));
                }
            }
            chain.reverse();
        }
        result.push(chain);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn two_lines_sharing_an_endpoint_merge() {
        let merged = merge_lines(vec![
            vec![c(0.0, 0.0), c(1.0, 0.0)],
            vec![c(1.0, 0.0), c(2.0, 0.0)],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0], vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)]);
    }

    #[test]
    fn opposing_directions_still_merge() {
        let merged = merge_lines(vec![
            vec![c(1.0, 0.0), c(0.0, 0.0)],
            vec![c(1.0, 0.0), c(2.0, 0.0)],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].len(), 3);
    }

    #[test]
    fn junction_of_three_is_not_merged_through() {
        let merged = merge_lines(vec![
            vec![c(0.0, 0.0), c(1.0, 0.0)],
            vec![c(1.0, 0.0), c(2.0, 0.0)],
            vec![c(1.0, 0.0), c(1.0, 1.0)],
        ]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn disjoint_lines_stay_separate() {
        let merged = merge_lines(vec![
            vec![c(0.0, 0.0), c(1.0, 0.0)],
            vec![c(5.0, 0.0), c(6.0, 0.0)],
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn chain_of_three_merges_fully() {
        let merged = merge_lines(vec![
            vec![c(1.0, 0.0), c(2.0, 0.0)],
            vec![c(0.0, 0.0), c(1.0, 0.0)],
            vec![c(2.0, 0.0), c(3.0, 1.0)],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].len(), 4);
    }
}
