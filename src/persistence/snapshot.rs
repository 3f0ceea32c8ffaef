//! Binary graph snapshots
//!
//! Little-endian, count-prefixed layout:
//!
//! ```text
//! node_count:u64
//!   per node:  id:u64, prop_count:u64,
//!              { key_len:u64, key_bytes, type_tag:u8, payload }*
//! edge_count:u64
//!   per edge:  id:u64, from:u64, to:u64, label_len:u64, label_bytes,
//!              weight:i64, prop_count:u64, { property encoding }*
//! ```
//!
//! Type tags: 0 = i64, 1 = f64, 2 = text (`len:u64` + bytes), 3 = bool
//! (one byte). Loading restores ids exactly through the graph's
//! id-preserving entry points, which re-seed both counters past the
//! maximum restored id.

use crate::graph::{EdgeId, Graph, GraphError, NodeId, PropertyValue};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Snapshot save/load errors. I/O failure is unrecoverable for the call
/// and propagates; nothing here retries.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("unknown property type tag {0}")]
    UnknownTypeTag(u8),

    #[error("snapshot text is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("snapshot is inconsistent: {0}")]
    Corrupt(#[from] GraphError),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

mod tags {
    pub const INTEGER: u8 = 0;
    pub const FLOAT: u8 = 1;
    pub const TEXT: u8 = 2;
    pub const BOOLEAN: u8 = 3;
}

/// Write the whole graph to `path`.
///
/// Entities are snapshotted one at a time; a save concurrent with
/// mutation captures some interleaving of states, consistent with the
/// store's no-composite-atomicity contract. No lock is held across I/O.
pub fn save(graph: &Graph, path: impl AsRef<Path>) -> SnapshotResult<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);

    let mut node_ids = graph.node_ids();
    node_ids.sort();
    write_u64(&mut out, node_ids.len() as u64)?;
    for id in &node_ids {
        let node = match graph.get_node(*id) {
            Some(node) => node,
            None => continue,
        };
        write_u64(&mut out, id.as_u64())?;
        write_properties(&mut out, &node.properties())?;
    }

    let mut edge_ids = graph.edge_ids();
    edge_ids.sort();
    write_u64(&mut out, edge_ids.len() as u64)?;
    for id in &edge_ids {
        let edge = match graph.get_edge(*id) {
            Some(edge) => edge,
            None => continue,
        };
        write_u64(&mut out, id.as_u64())?;
        write_u64(&mut out, edge.from().as_u64())?;
        write_u64(&mut out, edge.to().as_u64())?;
        write_string(&mut out, edge.label())?;
        write_i64(&mut out, edge.weight())?;
        write_properties(&mut out, &edge.properties())?;
    }

    out.flush()?;
    info!(path = %path.display(), nodes = node_ids.len(), edges = edge_ids.len(), "saved snapshot");
    Ok(())
}

/// Read a snapshot into a fresh graph.
///
/// Ids come back exactly as saved; creating entities on the loaded graph
/// afterwards can never collide with a restored id.
pub fn load(path: impl AsRef<Path>) -> SnapshotResult<Graph> {
    let path = path.as_ref();
    let mut input = BufReader::new(File::open(path)?);
    let graph = Graph::new();

    let node_count = read_u64(&mut input)?;
    for _ in 0..node_count {
        let id = NodeId::new(read_u64(&mut input)?);
        let node = graph.restore_node(id)?;
        let prop_count = read_u64(&mut input)?;
        for _ in 0..prop_count {
            let key = read_string(&mut input)?;
            let value = read_value(&mut input)?;
            node.set_property(key, value, graph.indexes());
        }
    }

    let edge_count = read_u64(&mut input)?;
    for _ in 0..edge_count {
        let id = EdgeId::new(read_u64(&mut input)?);
        let from = NodeId::new(read_u64(&mut input)?);
        let to = NodeId::new(read_u64(&mut input)?);
        let label = read_string(&mut input)?;
        let weight = read_i64(&mut input)?;
        let edge = graph.restore_edge(id, from, to, label, weight)?;
        let prop_count = read_u64(&mut input)?;
        for _ in 0..prop_count {
            let key = read_string(&mut input)?;
            let value = read_value(&mut input)?;
            edge.set_property(key, value, graph.indexes());
        }
    }

    info!(path = %path.display(), nodes = node_count, edges = edge_count, "loaded snapshot");
    Ok(graph)
}

fn write_properties<W: Write>(
    out: &mut W,
    properties: &crate::graph::PropertyMap,
) -> SnapshotResult<()> {
    write_u64(out, properties.len() as u64)?;
    for (key, value) in properties {
        write_string(out, key)?;
        write_value(out, value)?;
    }
    Ok(())
}

fn write_value<W: Write>(out: &mut W, value: &PropertyValue) -> io::Result<()> {
    match value {
        PropertyValue::Integer(i) => {
            out.write_all(&[tags::INTEGER])?;
            write_i64(out, *i)
        }
        PropertyValue::Float(f) => {
            out.write_all(&[tags::FLOAT])?;
            out.write_all(&f.to_le_bytes())
        }
        PropertyValue::Text(s) => {
            out.write_all(&[tags::TEXT])?;
            write_string(out, s)
        }
        PropertyValue::Boolean(b) => {
            out.write_all(&[tags::BOOLEAN])?;
            out.write_all(&[u8::from(*b)])
        }
    }
}

fn read_value<R: Read>(input: &mut R) -> SnapshotResult<PropertyValue> {
    let tag = read_u8(input)?;
    match tag {
        tags::INTEGER => Ok(PropertyValue::Integer(read_i64(input)?)),
        tags::FLOAT => {
            let mut buf = [0u8; 8];
            input.read_exact(&mut buf)?;
            Ok(PropertyValue::Float(f64::from_le_bytes(buf)))
        }
        tags::TEXT => Ok(PropertyValue::Text(read_string(input)?)),
        tags::BOOLEAN => Ok(PropertyValue::Boolean(read_u8(input)? != 0)),
        other => Err(SnapshotError::UnknownTypeTag(other)),
    }
}

fn write_string<W: Write>(out: &mut W, s: &str) -> io::Result<()> {
    write_u64(out, s.len() as u64)?;
    out.write_all(s.as_bytes())
}

fn read_string<R: Read>(input: &mut R) -> SnapshotResult<String> {
    let len = read_u64(input)? as usize;
    let mut buf = vec![0u8; len];
    input.read_exact(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

fn write_u64<W: Write>(out: &mut W, v: u64) -> io::Result<()> {
    out.write_all(&v.to_le_bytes())
}

fn write_i64<W: Write>(out: &mut W, v: i64) -> io::Result<()> {
    out.write_all(&v.to_le_bytes())
}

fn read_u64<R: Read>(input: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_i64<R: Read>(input: &mut R) -> io::Result<i64> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

fn read_u8<R: Read>(input: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    input.read_exact(&mut buf)?;
    Ok(buf[0])
}
