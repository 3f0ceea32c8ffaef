//! Command dispatch for the interactive shell
//!
//! Whitespace-tokenized commands with case-insensitive keywords. Value
//! literals auto-detect their type (boolean keywords, then integer, then
//! float, else text). Traversal commands are routed through the query
//! mini-language parser.

use anyhow::{anyhow, bail, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use std::fmt::Write as _;
use weftdb::algo::{bfs, dfs, dijkstra, UNREACHABLE};
use weftdb::graph::{EdgeId, Graph, NodeId, PropertyMap, PropertyValue};
use weftdb::persistence;
use weftdb::query::{parse_traversal, TraversalQuery};

/// What the loop should do after one command.
pub enum Outcome {
    Message(String),
    Exit,
}

pub fn help_text() -> &'static str {
    "--- WeftDB Command-Line Interface ---\n\
     Available Commands:\n\
     \x20 CREATE NODE\n\
     \x20 CREATE EDGE FROM <from_id> TO <to_id> LABEL <label> [WEIGHT <weight>]\n\
     \x20 CREATE INDEX ON <property_key>\n\
     \x20 SET PROPERTY ON NODE <id> KEY <key> VALUE <value>\n\
     \x20 SET PROPERTY ON EDGE <id> KEY <key> VALUE <value>\n\
     \x20 GET NODE <id>\n\
     \x20 GET EDGE <id>\n\
     \x20 REMOVE NODE <id>\n\
     \x20 REMOVE EDGE <id>\n\
     \x20 FIND NODES <property_key> <value>\n\
     \x20 PRINT GRAPH\n\
     \x20 SAVE <filename>\n\
     \x20 LOAD <filename>\n\
     \x20 -- Traversal Queries --\n\
     \x20 BFS FROM <start_node_id>\n\
     \x20 DFS FROM <start_node_id>\n\
     \x20 SHORTEST PATH FROM <start_node_id> TO <end_node_id>\n\
     \x20 -- Other --\n\
     \x20 HELP\n\
     \x20 EXIT\n\
     ---------------------------------------"
}

/// Execute one command line against the graph.
pub fn execute(graph: &mut Graph, line: &str) -> Result<Outcome> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(command) = tokens.first() else {
        return Ok(Outcome::Message(String::new()));
    };

    match command.to_ascii_uppercase().as_str() {
        "CREATE" => create(graph, &tokens),
        "SET" => set_property(graph, &tokens),
        "GET" => get(graph, &tokens),
        "REMOVE" => remove(graph, &tokens),
        "FIND" => find(graph, &tokens),
        "PRINT" => print_graph(graph, &tokens),
        "SAVE" => save(graph, &tokens),
        "LOAD" => load(graph, &tokens),
        "BFS" | "DFS" | "SHORTEST" => traversal(graph, line),
        "HELP" => Ok(Outcome::Message(help_text().to_string())),
        "EXIT" => Ok(Outcome::Exit),
        other => bail!("unknown command: {other}. Type HELP for a list of commands."),
    }
}

fn create(graph: &mut Graph, tokens: &[&str]) -> Result<Outcome> {
    match keyword(tokens, 1)?.as_str() {
        "NODE" => {
            let id = graph.create_node();
            Ok(Outcome::Message(format!("Created node with ID: {id}")))
        }
        "EDGE" => {
            expect_keyword(tokens, 2, "FROM")?;
            let from = node_id(tokens, 3)?;
            expect_keyword(tokens, 4, "TO")?;
            let to = node_id(tokens, 5)?;
            expect_keyword(tokens, 6, "LABEL")?;
            let label = *tokens
                .get(7)
                .ok_or_else(|| anyhow!("CREATE EDGE is missing its label"))?;
            let weight = match tokens.get(8) {
                Some(token) if token.eq_ignore_ascii_case("WEIGHT") => tokens
                    .get(9)
                    .ok_or_else(|| anyhow!("WEIGHT is missing its value"))?
                    .parse::<i64>()
                    .map_err(|_| anyhow!("WEIGHT expects an integer"))?,
                Some(other) => bail!("unexpected token: {other}"),
                None => weftdb::graph::DEFAULT_EDGE_WEIGHT,
            };
            let id = graph.create_edge_weighted(from, to, label, weight)?;
            Ok(Outcome::Message(format!(
                "Created edge with ID: {id} from {from} to {to}"
            )))
        }
        "INDEX" => {
            expect_keyword(tokens, 2, "ON")?;
            let key = *tokens
                .get(3)
                .ok_or_else(|| anyhow!("CREATE INDEX is missing its property key"))?;
            graph.create_index(key);
            Ok(Outcome::Message(format!("Created index on property: {key}")))
        }
        other => bail!("unknown CREATE type: {other}. Use NODE, EDGE, or INDEX."),
    }
}

fn set_property(graph: &mut Graph, tokens: &[&str]) -> Result<Outcome> {
    expect_keyword(tokens, 1, "PROPERTY")?;
    expect_keyword(tokens, 2, "ON")?;
    let kind = keyword(tokens, 3)?;
    let raw_id = id_value(tokens, 4)?;
    expect_keyword(tokens, 5, "KEY")?;
    let key = *tokens
        .get(6)
        .ok_or_else(|| anyhow!("SET PROPERTY is missing its key"))?;
    expect_keyword(tokens, 7, "VALUE")?;
    let raw_value = *tokens
        .get(8)
        .ok_or_else(|| anyhow!("SET PROPERTY is missing its value"))?;
    let value = PropertyValue::parse_literal(raw_value);

    match kind.as_str() {
        "NODE" => {
            let id = NodeId::new(raw_id);
            let node = graph
                .get_node(id)
                .ok_or_else(|| anyhow!("node {id} not found"))?;
            node.set_property(key, value, graph.indexes());
            Ok(Outcome::Message(format!("Property set on node {id}")))
        }
        "EDGE" => {
            let id = EdgeId::new(raw_id);
            let edge = graph
                .get_edge(id)
                .ok_or_else(|| anyhow!("edge {id} not found"))?;
            edge.set_property(key, value, graph.indexes());
            Ok(Outcome::Message(format!("Property set on edge {id}")))
        }
        other => bail!("unknown SET type: {other}. Use NODE or EDGE."),
    }
}

fn get(graph: &Graph, tokens: &[&str]) -> Result<Outcome> {
    let kind = keyword(tokens, 1)?;
    let raw_id = id_value(tokens, 2)?;
    match kind.as_str() {
        "NODE" => {
            let id = NodeId::new(raw_id);
            let node = graph
                .get_node(id)
                .ok_or_else(|| anyhow!("node {id} not found"))?;
            let mut out = format!("Node ID: {id}");
            write_properties(&mut out, &node.properties());
            Ok(Outcome::Message(out))
        }
        "EDGE" => {
            let id = EdgeId::new(raw_id);
            let edge = graph
                .get_edge(id)
                .ok_or_else(|| anyhow!("edge {id} not found"))?;
            let mut out = format!(
                "Edge ID: {id}\n  From: {}\n  To: {}\n  Label: {}\n  Weight: {}",
                edge.from(),
                edge.to(),
                edge.label(),
                edge.weight()
            );
            write_properties(&mut out, &edge.properties());
            Ok(Outcome::Message(out))
        }
        other => bail!("unknown GET type: {other}. Use NODE or EDGE."),
    }
}

fn remove(graph: &mut Graph, tokens: &[&str]) -> Result<Outcome> {
    let kind = keyword(tokens, 1)?;
    let raw_id = id_value(tokens, 2)?;
    match kind.as_str() {
        "NODE" => {
            let id = NodeId::new(raw_id);
            if graph.remove_node(id) {
                Ok(Outcome::Message(format!("Removed node {id}")))
            } else {
                bail!("node {id} not found")
            }
        }
        "EDGE" => {
            let id = EdgeId::new(raw_id);
            if graph.remove_edge(id) {
                Ok(Outcome::Message(format!("Removed edge {id}")))
            } else {
                bail!("edge {id} not found")
            }
        }
        other => bail!("unknown REMOVE type: {other}. Use NODE or EDGE."),
    }
}

fn find(graph: &Graph, tokens: &[&str]) -> Result<Outcome> {
    expect_keyword(tokens, 1, "NODES")?;
    let key = *tokens
        .get(2)
        .ok_or_else(|| anyhow!("FIND NODES is missing its property key"))?;
    let raw_value = *tokens
        .get(3)
        .ok_or_else(|| anyhow!("FIND NODES is missing its value"))?;
    let value = PropertyValue::parse_literal(raw_value);

    let mut ids = graph.find_nodes(key, &value);
    ids.sort();
    let rendered: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    Ok(Outcome::Message(format!(
        "Found {} node(s): {}",
        ids.len(),
        rendered.join(" ")
    )))
}

fn print_graph(graph: &Graph, tokens: &[&str]) -> Result<Outcome> {
    expect_keyword(tokens, 1, "GRAPH")?;

    let mut nodes = Table::new();
    nodes.load_preset(UTF8_FULL);
    nodes.set_header(vec!["Node", "Properties"]);
    let mut node_ids = graph.node_ids();
    node_ids.sort();
    for id in node_ids {
        if let Some(node) = graph.get_node(id) {
            nodes.add_row(vec![id.to_string(), render_properties(&node.properties())]);
        }
    }

    let mut edges = Table::new();
    edges.load_preset(UTF8_FULL);
    edges.set_header(vec!["Edge", "From", "To", "Label", "Weight", "Properties"]);
    let mut edge_ids = graph.edge_ids();
    edge_ids.sort();
    for id in edge_ids {
        if let Some(edge) = graph.get_edge(id) {
            edges.add_row(vec![
                id.to_string(),
                edge.from().to_string(),
                edge.to().to_string(),
                edge.label().to_string(),
                edge.weight().to_string(),
                render_properties(&edge.properties()),
            ]);
        }
    }

    Ok(Outcome::Message(format!(
        "Nodes ({}):\n{nodes}\nEdges ({}):\n{edges}",
        graph.node_count(),
        graph.edge_count()
    )))
}

fn save(graph: &Graph, tokens: &[&str]) -> Result<Outcome> {
    let path = *tokens
        .get(1)
        .ok_or_else(|| anyhow!("SAVE is missing its filename"))?;
    persistence::save(graph, path)?;
    Ok(Outcome::Message(format!("Graph saved to {path}")))
}

fn load(graph: &mut Graph, tokens: &[&str]) -> Result<Outcome> {
    let path = *tokens
        .get(1)
        .ok_or_else(|| anyhow!("LOAD is missing its filename"))?;
    *graph = persistence::load(path)?;
    Ok(Outcome::Message(format!("Graph loaded from {path}")))
}

fn traversal(graph: &Graph, line: &str) -> Result<Outcome> {
    match parse_traversal(line) {
        TraversalQuery::Bfs { start } => {
            let visited = render_ids(&bfs(graph, start));
            Ok(Outcome::Message(format!("BFS Result: {visited}")))
        }
        TraversalQuery::Dfs { start } => {
            let visited = render_ids(&dfs(graph, start));
            Ok(Outcome::Message(format!("DFS Result: {visited}")))
        }
        TraversalQuery::ShortestPath { from, to } => {
            let distances = dijkstra(graph, from);
            match distances.get(&to) {
                Some(&d) if d != UNREACHABLE => Ok(Outcome::Message(format!(
                    "Shortest distance from {from} to {to} is: {d}"
                ))),
                _ => Ok(Outcome::Message(format!("{to} is unreachable from {from}"))),
            }
        }
        TraversalQuery::Unknown => bail!("unknown or malformed traversal query"),
    }
}

fn keyword(tokens: &[&str], index: usize) -> Result<String> {
    tokens
        .get(index)
        .map(|token| token.to_ascii_uppercase())
        .ok_or_else(|| anyhow!("incomplete command. Type HELP for usage."))
}

fn expect_keyword(tokens: &[&str], index: usize, expected: &str) -> Result<()> {
    let found = keyword(tokens, index)?;
    if found != expected {
        bail!("expected {expected}, found {found}");
    }
    Ok(())
}

fn node_id(tokens: &[&str], index: usize) -> Result<NodeId> {
    Ok(NodeId::new(id_value(tokens, index)?))
}

fn id_value(tokens: &[&str], index: usize) -> Result<u64> {
    tokens
        .get(index)
        .ok_or_else(|| anyhow!("incomplete command. Type HELP for usage."))?
        .parse::<u64>()
        .map_err(|_| anyhow!("expected a numeric id"))
}

fn render_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_properties(properties: &PropertyMap) -> String {
    if properties.is_empty() {
        return "-".to_string();
    }
    let mut entries: Vec<(&String, &PropertyValue)> = properties.iter().collect();
    entries.sort_by_key(|(key, _)| key.as_str());
    entries
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_properties(out: &mut String, properties: &PropertyMap) {
    if properties.is_empty() {
        let _ = write!(out, "\n    Properties: None");
        return;
    }
    let _ = write!(out, "\n    Properties:");
    let mut entries: Vec<(&String, &PropertyValue)> = properties.iter().collect();
    entries.sort_by_key(|(key, _)| key.as_str());
    for (key, value) in entries {
        let _ = write!(out, "\n      - {key}: {value}");
    }
}
