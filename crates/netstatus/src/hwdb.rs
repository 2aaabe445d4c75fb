//! Reader for the compiled systemd hardware database (`hwdb.bin`).
//!
//! The database is a prefix trie of modalias patterns. Every node carries a
//! prefix string, a sorted table of children keyed by the next character
//! and a table of `(key, value)` properties. Patterns may contain the glob
//! characters `*`, `?` and `[`; once one is reached the rest of the
//! subtree is matched with fnmatch semantics instead of by trie descent.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use zerocopy::little_endian::{U16, U32, U64};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use crate::netlink::error::{Error, Result};

/// File signature.
const HWDB_SIG: &[u8; 8] = b"KSLPHHRH";

/// Locations searched for the database, in order.
pub const HWDB_PATHS: &[&str] = &[
    "/etc/systemd/hwdb/hwdb.bin",
    "/etc/udev/hwdb.bin",
    "/usr/lib/systemd/hwdb/hwdb.bin",
    "/lib/systemd/hwdb/hwdb.bin",
    "/lib/udev/hwdb.bin",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// File header (struct trie_header_f).
#[repr(C)]
#[derive(Debug, FromBytes, Immutable, KnownLayout, Unaligned)]
struct TrieHeader {
    signature: [u8; 8],
    tool_version: U64,
    file_size: U64,
    header_size: U64,
    node_size: U64,
    child_entry_size: U64,
    value_entry_size: U64,
    nodes_root_off: U64,
    nodes_len: U64,
    strings_len: U64,
}

/// Trie node (struct trie_node_f).
#[repr(C)]
#[derive(Debug, FromBytes, Immutable, KnownLayout, Unaligned)]
struct TrieNode {
    prefix_off: U64,
    children_count: u8,
    padding: [u8; 7],
    values_count: U64,
}

/// Child table entry (struct trie_child_entry_f).
#[repr(C)]
#[derive(Debug, FromBytes, Immutable, KnownLayout, Unaligned)]
struct TrieChildEntry {
    c: u8,
    padding: [u8; 7],
    child_off: U64,
}

/// Value table entry (struct trie_value_entry_f).
#[repr(C)]
#[derive(Debug, FromBytes, Immutable, KnownLayout, Unaligned)]
struct TrieValueEntry {
    key_off: U64,
    value_off: U64,
}

/// Extended value table entry with source position (struct trie_value_entry2_f).
#[repr(C)]
#[derive(Debug, FromBytes, Immutable, KnownLayout, Unaligned)]
struct TrieValueEntry2 {
    key_off: U64,
    value_off: U64,
    filename_off: U64,
    line_number: U32,
    file_priority: U16,
    padding: U16,
}

/// Property lookup by modalias.
pub trait HardwareDatabase {
    /// Look up property `key` for `modalias`.
    fn get(&self, modalias: &str, key: &str) -> Option<String>;
}

#[derive(Debug)]
struct Property {
    value: String,
    file_priority: u16,
    line_number: u32,
}

/// A loaded hardware database.
#[derive(Debug)]
pub struct Hwdb {
    data: Vec<u8>,
    path: Option<PathBuf>,
    node_size: usize,
    child_entry_size: usize,
    value_entry_size: usize,
    root: usize,
}

impl Hwdb {
    /// Load the database from `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mut hwdb = Self::from_bytes(data)?;
        hwdb.path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "loaded hardware database");
        Ok(hwdb)
    }

    /// Load the first database found in `paths`, each prefixed with `root`.
    pub fn open_first(root: &Path, paths: &[&str]) -> Option<Self> {
        for path in paths {
            let path = root.join(path.trim_start_matches('/'));
            match Self::open(&path) {
                Ok(hwdb) => return Some(hwdb),
                Err(e) if e.is_not_found() => continue,
                Err(e) => {
                    tracing::debug!(path = %path.display(), "skipping hardware database: {}", e);
                }
            }
        }
        None
    }

    /// Validate and wrap an in-memory database image.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let (header, _) = TrieHeader::ref_from_prefix(&data)
            .map_err(|_| Error::Hwdb("file too short for header".into()))?;

        if &header.signature != HWDB_SIG {
            return Err(Error::Hwdb("invalid signature".into()));
        }
        if header.file_size.get() != data.len() as u64 {
            return Err(Error::Hwdb(format!(
                "file size mismatch: header says {}, file has {}",
                header.file_size.get(),
                data.len()
            )));
        }

        // Entry sizes and the root offset must fit inside the image
        let size = |v: &U64, min: usize, what: &str| -> Result<usize> {
            usize::try_from(v.get())
                .ok()
                .filter(|&s| s >= min && s <= data.len())
                .ok_or_else(|| Error::Hwdb(format!("invalid {}: {}", what, v.get())))
        };
        let _ = size(&header.header_size, size_of::<TrieHeader>(), "header size")?;
        let node_size = size(&header.node_size, size_of::<TrieNode>(), "node size")?;
        let child_entry_size = size(
            &header.child_entry_size,
            size_of::<TrieChildEntry>(),
            "child entry size",
        )?;
        let value_entry_size = size(
            &header.value_entry_size,
            size_of::<TrieValueEntry>(),
            "value entry size",
        )?;
        let root = size(&header.nodes_root_off, 0, "root offset")?;

        tracing::trace!(
            tool_version = header.tool_version.get(),
            nodes_len = header.nodes_len.get(),
            strings_len = header.strings_len.get(),
            "hardware database header"
        );

        Ok(Self {
            data,
            path: None,
            node_size,
            child_entry_size,
            value_entry_size,
            root,
        })
    }

    /// The file the database was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All properties matching `modalias`.
    pub fn properties(&self, modalias: &str) -> Result<BTreeMap<String, String>> {
        let mut props = BTreeMap::new();
        self.search(modalias.as_bytes(), &mut props)?;
        Ok(props.into_iter().map(|(k, p)| (k, p.value)).collect())
    }

    fn slice(&self, off: usize, len: usize) -> Result<&[u8]> {
        off.checked_add(len)
            .and_then(|end| self.data.get(off..end))
            .ok_or_else(|| Error::Hwdb(format!("offset {} out of bounds", off)))
    }

    fn offset(v: &U64) -> Result<usize> {
        usize::try_from(v.get()).map_err(|_| Error::Hwdb(format!("invalid offset {}", v.get())))
    }

    fn node(&self, off: usize) -> Result<&TrieNode> {
        let bytes = self.slice(off, size_of::<TrieNode>())?;
        TrieNode::ref_from_bytes(bytes).map_err(|_| Error::Hwdb("invalid node".into()))
    }

    fn string(&self, off: &U64) -> Result<&[u8]> {
        let off = Self::offset(off)?;
        let tail = self
            .data
            .get(off..)
            .ok_or_else(|| Error::Hwdb(format!("string offset {} out of bounds", off)))?;
        let end = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::Hwdb("unterminated string".into()))?;
        Ok(&tail[..end])
    }

    /// Offset of entry `idx` of a table of `entry_size` entries starting
    /// `skip` bytes after `base`.
    fn entry_offset(base: usize, skip: usize, idx: usize, entry_size: usize) -> Result<usize> {
        idx.checked_mul(entry_size)
            .and_then(|off| off.checked_add(skip))
            .and_then(|off| off.checked_add(base))
            .ok_or_else(|| Error::Hwdb(format!("entry offset overflow at node {}", base)))
    }

    fn child(&self, node_off: usize, idx: usize) -> Result<&TrieChildEntry> {
        let off = Self::entry_offset(node_off, self.node_size, idx, self.child_entry_size)?;
        let bytes = self.slice(off, size_of::<TrieChildEntry>())?;
        TrieChildEntry::ref_from_bytes(bytes).map_err(|_| Error::Hwdb("invalid child entry".into()))
    }

    /// Find the child of a node for character `c`; children are sorted.
    fn find_child(&self, node_off: usize, node: &TrieNode, c: u8) -> Result<Option<usize>> {
        let (mut lo, mut hi) = (0, node.children_count as usize);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let child = self.child(node_off, mid)?;
            match child.c.cmp(&c) {
                std::cmp::Ordering::Equal => return Self::offset(&child.child_off).map(Some),
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
            }
        }
        Ok(None)
    }

    fn add_values(
        &self,
        node_off: usize,
        node: &TrieNode,
        props: &mut BTreeMap<String, Property>,
    ) -> Result<()> {
        let values_off = Self::entry_offset(
            node_off,
            self.node_size,
            node.children_count as usize,
            self.child_entry_size,
        )?;
        let count = Self::offset(&node.values_count)?;

        for idx in 0..count {
            let off = Self::entry_offset(values_off, 0, idx, self.value_entry_size)?;
            let (key_off, value_off, file_priority, line_number) =
                if self.value_entry_size >= size_of::<TrieValueEntry2>() {
                    let bytes = self.slice(off, size_of::<TrieValueEntry2>())?;
                    let entry = TrieValueEntry2::ref_from_bytes(bytes)
                        .map_err(|_| Error::Hwdb("invalid value entry".into()))?;
                    (
                        &entry.key_off,
                        &entry.value_off,
                        entry.file_priority.get(),
                        entry.line_number.get(),
                    )
                } else {
                    let bytes = self.slice(off, size_of::<TrieValueEntry>())?;
                    let entry = TrieValueEntry::ref_from_bytes(bytes)
                        .map_err(|_| Error::Hwdb("invalid value entry".into()))?;
                    (&entry.key_off, &entry.value_off, 0, 0)
                };

            // Only keys with a leading space are properties
            let Some(key) = self.string(key_off)?.strip_prefix(b" ") else {
                continue;
            };
            let key = String::from_utf8_lossy(key).into_owned();
            let value = String::from_utf8_lossy(self.string(value_off)?).into_owned();

            if let Some(old) = props.get(&key)
                && (old.file_priority > file_priority
                    || (old.file_priority == file_priority && old.line_number > line_number))
            {
                continue;
            }
            props.insert(
                key,
                Property {
                    value,
                    file_priority,
                    line_number,
                },
            );
        }
        Ok(())
    }

    fn search(&self, search: &[u8], props: &mut BTreeMap<String, Property>) -> Result<()> {
        let mut buf = Vec::new();
        let mut node_off = Some(self.root);
        let mut i = 0;

        while let Some(off) = node_off {
            let node = self.node(off)?;
            let prefix = self.string(&node.prefix_off)?;

            for (p, &c) in prefix.iter().enumerate() {
                if is_glob(c) {
                    return self.fnmatch(off, node, p, &mut buf, &search[i + p..], props);
                }
                if search.get(i + p) != Some(&c) {
                    return Ok(());
                }
            }
            i += prefix.len();

            for glob in [b'*', b'?', b'['] {
                if let Some(child_off) = self.find_child(off, node, glob)? {
                    buf.push(glob);
                    let child = self.node(child_off)?;
                    self.fnmatch(child_off, child, 0, &mut buf, &search[i..], props)?;
                    buf.pop();
                }
            }

            let Some(&c) = search.get(i) else {
                return self.add_values(off, node, props);
            };
            node_off = self.find_child(off, node, c)?;
            i += 1;
        }

        Ok(())
    }

    fn fnmatch(
        &self,
        node_off: usize,
        node: &TrieNode,
        p: usize,
        buf: &mut Vec<u8>,
        search: &[u8],
        props: &mut BTreeMap<String, Property>,
    ) -> Result<()> {
        let mark = buf.len();
        let prefix = self.string(&node.prefix_off)?;
        buf.extend_from_slice(prefix.get(p..).unwrap_or_default());

        for idx in 0..node.children_count as usize {
            let entry = self.child(node_off, idx)?;
            let child_off = Self::offset(&entry.child_off)?;
            buf.push(entry.c);
            self.fnmatch(child_off, self.node(child_off)?, 0, buf, search, props)?;
            buf.pop();
        }

        if node.values_count.get() > 0 && pattern_matches(buf, search) {
            self.add_values(node_off, node, props)?;
        }

        buf.truncate(mark);
        Ok(())
    }
}

impl HardwareDatabase for Hwdb {
    fn get(&self, modalias: &str, key: &str) -> Option<String> {
        match self.properties(modalias) {
            Ok(mut props) => props.remove(key),
            Err(e) => {
                tracing::debug!(modalias, "hardware database lookup failed: {}", e);
                None
            }
        }
    }
}

fn is_glob(c: u8) -> bool {
    matches!(c, b'*' | b'?' | b'[')
}

fn pattern_matches(pattern: &[u8], text: &[u8]) -> bool {
    let (Ok(pattern), Ok(text)) = (std::str::from_utf8(pattern), std::str::from_utf8(text)) else {
        return false;
    };
    Pattern::new(pattern).is_ok_and(|p| p.matches_with(text, MATCH_OPTIONS))
}
