//! Traversal query parser using Pest

use super::ast::TraversalQuery;
use crate::graph::NodeId;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "query/traversal.pest"]
struct QueryParser;

/// Parse a traversal query string into a typed request.
///
/// Keywords are case-insensitive. Input matching none of the recognized
/// forms — including ids that do not fit in `u64` — yields
/// [`TraversalQuery::Unknown`] rather than an error; the caller treats it
/// as a no-op request.
pub fn parse_traversal(input: &str) -> TraversalQuery {
    let mut pairs = match QueryParser::parse(Rule::query, input.trim()) {
        Ok(pairs) => pairs,
        Err(_) => return TraversalQuery::Unknown,
    };

    let query = match pairs.next() {
        Some(pair) => pair,
        None => return TraversalQuery::Unknown,
    };
    let pair = match query.into_inner().next() {
        Some(pair) => pair,
        None => return TraversalQuery::Unknown,
    };

    match pair.as_rule() {
        Rule::bfs => {
            let mut ids = pair.into_inner();
            match parse_node_id(ids.next()) {
                Some(start) => TraversalQuery::Bfs { start },
                None => TraversalQuery::Unknown,
            }
        }
        Rule::dfs => {
            let mut ids = pair.into_inner();
            match parse_node_id(ids.next()) {
                Some(start) => TraversalQuery::Dfs { start },
                None => TraversalQuery::Unknown,
            }
        }
        Rule::shortest_path => {
            let mut ids = pair.into_inner();
            match (parse_node_id(ids.next()), parse_node_id(ids.next())) {
                (Some(from), Some(to)) => TraversalQuery::ShortestPath { from, to },
                _ => TraversalQuery::Unknown,
            }
        }
        _ => TraversalQuery::Unknown,
    }
}

fn parse_node_id(pair: Option<pest::iterators::Pair<Rule>>) -> Option<NodeId> {
    pair?.as_str().parse::<u64>().ok().map(NodeId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bfs() {
        assert_eq!(
            parse_traversal("BFS FROM 3"),
            TraversalQuery::Bfs { start: NodeId::new(3) }
        );
    }

    #[test]
    fn test_parse_dfs_case_insensitive() {
        assert_eq!(
            parse_traversal("dfs from 12"),
            TraversalQuery::Dfs { start: NodeId::new(12) }
        );
    }

    #[test]
    fn test_parse_shortest_path() {
        assert_eq!(
            parse_traversal("Shortest Path From 1 To 9"),
            TraversalQuery::ShortestPath {
                from: NodeId::new(1),
                to: NodeId::new(9),
            }
        );
    }

    #[test]
    fn test_unrecognized_input_is_unknown() {
        assert!(parse_traversal("").is_unknown());
        assert!(parse_traversal("BFS").is_unknown());
        assert!(parse_traversal("BFS FROM").is_unknown());
        assert!(parse_traversal("BFS FROM abc").is_unknown());
        assert!(parse_traversal("SHORTEST PATH FROM 1").is_unknown());
        assert!(parse_traversal("WALK FROM 1").is_unknown());
        assert!(parse_traversal("BFS FROM 1 EXTRA").is_unknown());
    }

    #[test]
    fn test_overflowing_id_is_unknown() {
        assert!(parse_traversal("BFS FROM 99999999999999999999999").is_unknown());
    }
}
