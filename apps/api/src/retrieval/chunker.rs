//! Overlapping character-bounded chunking.
//!
//! Words are packed greedily into windows of at most `chunk_size` characters;
//! each new window starts with the tail of the previous one, at most
//! `chunk_overlap` characters long. Words longer than a window are split on
//! char boundaries.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::documents::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `"{source}:{index}"`.
    pub id: String,
    /// Filename of the source document.
    pub source: String,
    pub content: String,
    /// Zero-based position within the source document.
    pub index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Overlap is clamped below the chunk size so every window makes progress.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn split_document(&self, document: &Document) -> Vec<Chunk> {
        self.split_text(&document.content)
            .into_iter()
            .enumerate()
            .map(|(index, content)| Chunk {
                id: format!("{}:{index}", document.source),
                source: document.source.clone(),
                content,
                index,
            })
            .collect()
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let pieces: Vec<&str> = text
            .split_whitespace()
            .flat_map(|word| char_slices(word, self.chunk_size))
            .collect();

        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut len = 0usize;

        for piece in pieces {
            let piece_len = piece.chars().count();
            if !window.is_empty() && len + 1 + piece_len > self.chunk_size {
                chunks.push(join(&window));
                while let Some(front) = window.front() {
                    let fits = len + 1 + piece_len <= self.chunk_size;
                    if len <= self.chunk_overlap && fits {
                        break;
                    }
                    let front_len = front.chars().count();
                    window.pop_front();
                    len = if window.is_empty() { 0 } else { len - front_len - 1 };
                }
            }
            len += if window.is_empty() { piece_len } else { piece_len + 1 };
            window.push_back(piece);
        }

        if !window.is_empty() {
            chunks.push(join(&window));
        }
        chunks
    }
}

fn join(window: &VecDeque<&str>) -> String {
    window.iter().copied().collect::<Vec<_>>().join(" ")
}

/// Splits `word` into consecutive slices of at most `max_chars` characters.
fn char_slices(word: &str, max_chars: usize) -> Vec<&str> {
    let mut slices = Vec::new();
    let mut rest = word;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        slices.push(&rest[..end]);
        rest = &rest[end..];
    }
    slices
}
