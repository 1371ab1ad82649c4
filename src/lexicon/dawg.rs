//! The word graph.
//!
//! ## Layout
//!
//! Nodes live in a flat arena. Each node carries one letter; `next` links
//! the alternatives at the same depth (a *list*), `child` descends to the
//! list for the following letter. Index 0 is the first node of the root
//! list. Lists are shared between words with common suffixes, so the
//! structure is a DAG rather than a tree.
//!
//! ## Binary format
//!
//! Little-endian `u32` words: the node count N, then N `(code point, flags)`
//! pairs. In `flags`, bit 0 marks end of word, bit 1 marks the last node of
//! a list (otherwise the next sibling is the following node), and bits
//! 2..32 hold the child index (0 for none).

use std::sync::{PoisonError, RwLock};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::LexiconError;
use crate::tiles::BLANK;

pub(crate) const END_OF_WORD_BIT_MASK: u32 = 0x1;
pub(crate) const END_OF_LIST_BIT_MASK: u32 = 0x2;
pub(crate) const CHILD_INDEX_SHIFT: u32 = 2;
pub(crate) const CHILD_INDEX_BIT_MASK: u32 = 0x3FFF_FFFF;

/// One letter in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconNode {
    pub letter: char,
    pub is_end_of_word: bool,
    /// First node of the list for the next letter.
    pub child: Option<u32>,
    /// Next alternative at this depth.
    pub next: Option<u32>,
}

/// A loaded dictionary.
///
/// The graph is immutable once loaded and is shared between games as an
/// `Arc<Lexicon>`. Words added by players go into a separate whitelist.
#[derive(Debug)]
pub struct Lexicon {
    name: String,
    nodes: Vec<LexiconNode>,
    whitelist: RwLock<FxHashSet<String>>,
}

impl Lexicon {
    /// Decode a graph from its (decompressed) binary form.
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Result<Self, LexiconError> {
        let mut words = data
            .chunks_exact(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]));
        let count = words
            .next()
            .ok_or_else(|| LexiconError::Malformed("missing node count".into()))?
            as usize;
        if data.len() < 4 + count * 8 {
            return Err(LexiconError::Malformed(format!(
                "expected {count} nodes, found {} bytes",
                data.len()
            )));
        }

        let mut nodes = Vec::with_capacity(count);
        for i in 0..count {
            let (Some(code), Some(flags)) = (words.next(), words.next()) else {
                return Err(LexiconError::Malformed(format!("node {i} truncated")));
            };
            let letter = char::from_u32(code)
                .ok_or_else(|| LexiconError::Malformed(format!("bad code point {code:#x}")))?;
            let child = (flags >> CHILD_INDEX_SHIFT) & CHILD_INDEX_BIT_MASK;
            if child as usize >= count {
                return Err(LexiconError::Malformed(format!(
                    "node {i} has child {child} beyond {count} nodes"
                )));
            }
            let next = i + 1;
            nodes.push(LexiconNode {
                letter,
                is_end_of_word: flags & END_OF_WORD_BIT_MASK != 0,
                child: (child > 0).then_some(child),
                next: (flags & END_OF_LIST_BIT_MASK == 0 && next < count).then_some(next as u32),
            });
        }

        Ok(Self {
            name: name.into(),
            nodes,
            whitelist: RwLock::new(FxHashSet::default()),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn nodes(&self) -> &[LexiconNode] {
        &self.nodes
    }

    fn root(&self) -> Option<u32> {
        (!self.nodes.is_empty()).then_some(0)
    }

    fn node(&self, index: u32) -> &LexiconNode {
        &self.nodes[index as usize]
    }

    /// Whether `word` is in the dictionary or the whitelist.
    ///
    /// The graph is case sensitive; callers upper-case words first.
    #[must_use]
    pub fn has_word(&self, word: &str) -> bool {
        self.in_graph(word)
            || self
                .whitelist
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(word)
    }

    fn in_graph(&self, word: &str) -> bool {
        let mut chars = word.chars().peekable();
        let mut cursor = self.root();
        while let Some(c) = chars.next() {
            // Find `c` among the alternatives at this depth.
            let found = loop {
                match cursor {
                    Some(i) if self.node(i).letter == c => break Some(i),
                    Some(i) => cursor = self.node(i).next,
                    None => break None,
                }
            };
            let Some(i) = found else {
                return false;
            };
            if chars.peek().is_none() {
                return self.node(i).is_end_of_word;
            }
            cursor = self.node(i).child;
        }
        false
    }

    /// Find every word that can be made from `letters`, where `' '` is a
    /// blank that stands for any letter.
    ///
    /// Maps each word to the letters actually used to make it, so blank
    /// substitutions show up as spaces. A blank is only used when the
    /// real letter is not available. Fewer than two letters yields the
    /// input mapped to itself.
    #[must_use]
    pub fn find_anagrams(&self, letters: &str) -> FxHashMap<String, String> {
        let letters = letters.to_uppercase();
        let mut found = FxHashMap::default();
        if letters.chars().count() < 2 {
            found.insert(letters.clone(), letters);
            return found;
        }

        let mut available: SmallVec<[char; 16]> = letters.chars().collect();
        available.sort_unstable();
        if let Some(root) = self.root() {
            let mut real = String::new();
            let mut used = String::new();
            self.anagrams_from(root, &mut real, &mut used, &mut available, &mut found);
        }
        found
    }

    fn anagrams_from(
        &self,
        list: u32,
        real: &mut String,
        used: &mut String,
        available: &mut SmallVec<[char; 16]>,
        found: &mut FxHashMap<String, String>,
    ) {
        let mut cursor = Some(list);
        while let Some(i) = cursor {
            let node = *self.node(i);
            cursor = node.next;

            let Some(pos) = available
                .iter()
                .position(|&c| c == node.letter)
                .or_else(|| available.iter().position(|&c| c == BLANK))
            else {
                continue;
            };
            let matched = available.remove(pos);
            real.push(node.letter);
            used.push(matched);

            if node.is_end_of_word {
                found.insert(real.clone(), used.clone());
            }
            if let (Some(child), false) = (node.child, available.is_empty()) {
                self.anagrams_from(child, real, used, available, found);
            }

            real.pop();
            used.pop();
            available.insert(pos, matched);
        }
    }

    /// Visit every word in the graph, depth first, children before
    /// siblings. Whitelisted words are not visited.
    pub fn walk<F: FnMut(&str)>(&self, mut callback: F) {
        if let Some(root) = self.root() {
            let mut prefix = String::new();
            self.walk_from(root, &mut prefix, &mut callback);
        }
    }

    fn walk_from<F: FnMut(&str)>(&self, list: u32, prefix: &mut String, callback: &mut F) {
        let mut cursor = Some(list);
        while let Some(i) = cursor {
            let node = self.node(i);
            prefix.push(node.letter);
            if node.is_end_of_word {
                callback(prefix);
            }
            if let Some(child) = node.child {
                self.walk_from(child, prefix, callback);
            }
            prefix.pop();
            cursor = node.next;
        }
    }

    /// All words in the graph, in walk order.
    #[must_use]
    pub fn words(&self) -> Vec<String> {
        let mut words = Vec::new();
        self.walk(|w| words.push(w.to_owned()));
        words
    }

    /// Add a word to the whitelist. Returns `false` if the word was
    /// already known.
    pub fn add_word(&self, word: &str) -> bool {
        let word = word.to_uppercase();
        if self.in_graph(&word) {
            return false;
        }
        self.whitelist
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(word)
    }

    /// Words added with [`add_word`](Self::add_word), sorted.
    #[must_use]
    pub fn whitelist(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .whitelist
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        words.sort();
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::DawgBuilder;

    fn lexicon(words: &[&str]) -> Lexicon {
        let bytes = DawgBuilder::from_words(words.iter().copied()).build();
        Lexicon::from_bytes("test", &bytes).unwrap()
    }

    fn encode(nodes: &[(char, u32)]) -> Vec<u8> {
        let mut bytes = (nodes.len() as u32).to_le_bytes().to_vec();
        for &(letter, flags) in nodes {
            bytes.extend_from_slice(&(letter as u32).to_le_bytes());
            bytes.extend_from_slice(&flags.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_hand_encoded_graph() {
        // Root list: A, B. A -> T (end), B -> list shared with A's.
        let bytes = encode(&[
            ('A', 2 << CHILD_INDEX_SHIFT),
            ('B', END_OF_LIST_BIT_MASK | (2 << CHILD_INDEX_SHIFT)),
            ('T', END_OF_WORD_BIT_MASK | END_OF_LIST_BIT_MASK),
        ]);
        let lex = Lexicon::from_bytes("hand", &bytes).unwrap();

        assert!(lex.has_word("AT"));
        assert!(lex.has_word("BT"));
        assert!(!lex.has_word("A"));
        assert!(!lex.has_word("AB"));
        assert!(!lex.has_word("ATT"));
        assert_eq!(lex.words(), vec!["AT", "BT"]);
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            Lexicon::from_bytes("x", &[1, 0]),
            Err(LexiconError::Malformed(_))
        ));
        assert!(matches!(
            Lexicon::from_bytes("x", &encode(&[('A', 5 << CHILD_INDEX_SHIFT)])),
            Err(LexiconError::Malformed(_))
        ));

        let mut short = encode(&[('A', 0), ('B', 0)]);
        short.truncate(12);
        assert!(Lexicon::from_bytes("x", &short).is_err());
    }

    #[test]
    fn test_empty_graph() {
        let lex = Lexicon::from_bytes("empty", &0u32.to_le_bytes()).unwrap();
        assert!(!lex.has_word("A"));
        assert!(lex.words().is_empty());
        assert!(lex.find_anagrams("AB").is_empty());
    }

    #[test]
    fn test_has_word() {
        let lex = lexicon(&["SINK", "SINKS", "SIN", "INK"]);

        assert!(lex.has_word("SINK"));
        assert!(lex.has_word("SIN"));
        assert!(lex.has_word("INK"));
        assert!(!lex.has_word("SI"));
        assert!(!lex.has_word("sink"));
        assert!(!lex.has_word(""));
        assert!(!lex.has_word("SINKER"));
    }

    #[test]
    fn test_anagrams() {
        let lex = lexicon(&["SINK", "INKS", "SKIN", "SIN", "INK", "KIN", "ZAP"]);
        let found = lex.find_anagrams("nisk");

        for word in ["SINK", "INKS", "SKIN", "SIN", "INK", "KIN"] {
            assert_eq!(found.get(word).map(String::as_str), Some(word));
        }
        assert!(!found.contains_key("ZAP"));
    }

    #[test]
    fn test_anagrams_with_blank() {
        let lex = lexicon(&["SINK", "SIN", "ZAP"]);
        let found = lex.find_anagrams("SI K");

        assert_eq!(found.get("SINK").map(String::as_str), Some("SI K"));
        assert_eq!(found.get("SIN").map(String::as_str), Some("SI "));
        assert!(!found.contains_key("ZAP"));
    }

    #[test]
    fn test_anagrams_prefer_real_letter() {
        let lex = lexicon(&["AT"]);
        let found = lex.find_anagrams("T A");
        assert_eq!(found.get("AT").map(String::as_str), Some("AT"));
    }

    #[test]
    fn test_anagrams_short_input() {
        let lex = lexicon(&["AT"]);
        let found = lex.find_anagrams("a");
        assert_eq!(found.len(), 1);
        assert_eq!(found.get("A").map(String::as_str), Some("A"));
    }

    #[test]
    fn test_add_word() {
        let lex = lexicon(&["SINK"]);

        assert!(!lex.add_word("sink"));
        assert!(!lex.has_word("XANADO"));
        assert!(lex.add_word("xanado"));
        assert!(lex.has_word("XANADO"));
        assert!(!lex.add_word("XANADO"));
        assert_eq!(lex.whitelist(), vec!["XANADO"]);
        assert_eq!(lex.words(), vec!["SINK"]);
    }
}
