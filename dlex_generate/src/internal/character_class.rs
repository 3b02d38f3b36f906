//! This module contains the character class representation used by the regex
//! parser and the NFA construction.
//! A class is kept as the author wrote it (items plus negation flag); the
//! scalar-value ranges it denotes are computed on demand.

/// Exclusive bounds of the UTF-16 surrogate gap inside the scalar space.
const SURROGATE_LO: u32 = 0xD800;
const SURROGATE_HI: u32 = 0xDFFF;

/// The largest Unicode scalar value.
const MAX_SCALAR: u32 = 0x10FFFF;

/// One item of a bracket expression: a single code point or a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClassItem {
    /// A single code point.
    Single(char),
    /// An inclusive range of code points, `lo <= hi`.
    Range(char, char),
}

/// A character class, e.g. `[a-z_]` or `[^0-9]`.
///
/// The empty negated class `[^]` denotes every Unicode scalar value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CharClass {
    negated: bool,
    items: Vec<ClassItem>,
}

impl CharClass {
    pub(crate) fn new(negated: bool, items: Vec<ClassItem>) -> Self {
        Self { negated, items }
    }

    #[allow(dead_code)]
    pub(crate) fn is_negated(&self) -> bool {
        self.negated
    }

    /// Compute the sorted, disjoint scalar-value ranges this class denotes.
    ///
    /// Ranges never cover the surrogate gap: an item range that spans it is
    /// split around it, and negation complements within the scalar space
    /// `[0, D7FF] ∪ [E000, 10FFFF]`.
    pub(crate) fn scalar_ranges(&self) -> Vec<(u32, u32)> {
        let mut ranges: Vec<(u32, u32)> = Vec::new();
        for item in &self.items {
            let (lo, hi) = match *item {
                ClassItem::Single(c) => (c as u32, c as u32),
                ClassItem::Range(lo, hi) => (lo as u32, hi as u32),
            };
            push_split(&mut ranges, lo, hi);
        }
        ranges.sort_unstable();
        let mut merged = merge(ranges);
        if self.negated {
            merged = complement(&merged);
        }
        merged
    }
}

/// Append a range, split around the surrogate gap.
fn push_split(ranges: &mut Vec<(u32, u32)>, lo: u32, hi: u32) {
    if hi < SURROGATE_LO || lo > SURROGATE_HI {
        ranges.push((lo, hi));
        return;
    }
    if lo < SURROGATE_LO {
        ranges.push((lo, SURROGATE_LO - 1));
    }
    if hi > SURROGATE_HI {
        ranges.push((SURROGATE_HI + 1, hi));
    }
}

/// Merge sorted ranges that touch or overlap.
fn merge(ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
    for (lo, hi) in ranges {
        match merged.last_mut() {
            Some((_, last_hi)) if lo <= last_hi.saturating_add(1) => {
                *last_hi = (*last_hi).max(hi);
            }
            _ => merged.push((lo, hi)),
        }
    }
    merged
}

/// Complement sorted, disjoint ranges within the scalar space.
fn complement(ranges: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut result = Vec::new();
    let mut next = 0u32;
    for &(lo, hi) in ranges {
        if next < lo {
            push_split(&mut result, next, lo - 1);
        }
        next = hi + 1;
        if (SURROGATE_LO..=SURROGATE_HI).contains(&next) {
            next = SURROGATE_HI + 1;
        }
    }
    if next <= MAX_SCALAR {
        push_split(&mut result, next, MAX_SCALAR);
    }
    result
}
