//! Compiles word lists into the binary graph format.
//!
//! Words go into a trie first. Identical child lists are then merged
//! (two lists are identical when they hold the same letters, end-of-word
//! flags and child lists), and the unique lists are laid out breadth
//! first with the root list at index 0.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rustc_hash::{FxHashMap, FxHashSet};

use super::dawg::{CHILD_INDEX_BIT_MASK, CHILD_INDEX_SHIFT, END_OF_LIST_BIT_MASK, END_OF_WORD_BIT_MASK};

/// One entry of a list: letter, end of word, child list.
type Entry = (char, bool, Option<usize>);

#[derive(Default)]
struct TrieNode {
    children: BTreeMap<char, usize>,
    is_end_of_word: bool,
}

/// Builds a dictionary graph from words.
///
/// ```
/// use rust_wordgame::lexicon::{DawgBuilder, Lexicon};
///
/// let bytes = DawgBuilder::from_words(["cat", "cats", "bat"]).build();
/// let lexicon = Lexicon::from_bytes("demo", &bytes).unwrap();
/// assert!(lexicon.has_word("CATS"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DawgBuilder {
    words: BTreeSet<String>,
}

impl DawgBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder holding `words`.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut builder = Self::new();
        for word in words {
            builder.add_word(word);
        }
        builder
    }

    /// Add a word. Words are trimmed and upper-cased; empty lines are
    /// ignored.
    pub fn add_word(&mut self, word: &str) -> &mut Self {
        let word = word.trim();
        if !word.is_empty() {
            self.words.insert(word.to_uppercase());
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Encode the graph.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let trie = self.trie();
        let mut lists: Vec<Vec<Entry>> = Vec::new();
        let mut interned: FxHashMap<Vec<Entry>, usize> = FxHashMap::default();
        let root = intern_children(&trie, 0, &mut lists, &mut interned);

        // Breadth-first layout, root list first.
        let mut offsets: FxHashMap<usize, u32> = FxHashMap::default();
        let mut order = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue: VecDeque<usize> = root.into_iter().collect();
        seen.extend(root);
        let mut next_offset = 0u32;
        while let Some(list) = queue.pop_front() {
            offsets.insert(list, next_offset);
            next_offset += lists[list].len() as u32;
            order.push(list);
            for &(_, _, child) in &lists[list] {
                if let Some(child) = child {
                    if seen.insert(child) {
                        queue.push_back(child);
                    }
                }
            }
        }

        let mut out = Vec::with_capacity(4 + next_offset as usize * 8);
        out.extend_from_slice(&next_offset.to_le_bytes());
        for list in order {
            let entries = &lists[list];
            for (j, &(letter, is_end_of_word, child)) in entries.iter().enumerate() {
                let mut flags = 0;
                if is_end_of_word {
                    flags |= END_OF_WORD_BIT_MASK;
                }
                if j + 1 == entries.len() {
                    flags |= END_OF_LIST_BIT_MASK;
                }
                if let Some(child) = child {
                    let index = offsets.get(&child).copied().unwrap_or(0);
                    flags |= (index & CHILD_INDEX_BIT_MASK) << CHILD_INDEX_SHIFT;
                }
                out.extend_from_slice(&(letter as u32).to_le_bytes());
                out.extend_from_slice(&flags.to_le_bytes());
            }
        }
        out
    }

    fn trie(&self) -> Vec<TrieNode> {
        let mut trie = vec![TrieNode::default()];
        for word in &self.words {
            let mut at = 0;
            for c in word.chars() {
                at = match trie[at].children.get(&c) {
                    Some(&next) => next,
                    None => {
                        trie.push(TrieNode::default());
                        let next = trie.len() - 1;
                        trie[at].children.insert(c, next);
                        next
                    }
                };
            }
            trie[at].is_end_of_word = true;
        }
        trie
    }
}

/// Intern the child list of a trie node, children first. Returns `None`
/// for a node without children.
fn intern_children(
    trie: &[TrieNode],
    node: usize,
    lists: &mut Vec<Vec<Entry>>,
    interned: &mut FxHashMap<Vec<Entry>, usize>,
) -> Option<usize> {
    if trie[node].children.is_empty() {
        return None;
    }
    let entries: Vec<Entry> = trie[node]
        .children
        .iter()
        .map(|(&letter, &child)| {
            (
                letter,
                trie[child].is_end_of_word,
                intern_children(trie, child, lists, interned),
            )
        })
        .collect();
    if let Some(&id) = interned.get(&entries) {
        return Some(id);
    }
    lists.push(entries.clone());
    interned.insert(entries, lists.len() - 1);
    Some(lists.len() - 1)
}
