use serde::{Deserialize, Serialize};

/// Byte span into a document's UTF-8 text, exclusive end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`
    pub fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The canonical "no explicit anchor" span
    pub fn is_zero(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    /// Containment is inclusive at both edges so a cursor sitting
    /// right after a node still lands inside it.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}
