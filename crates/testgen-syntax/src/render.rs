//! Source re-rendering
//!
//! Structural edits are expressed as byte ranges taken from syntax-tree
//! nodes and applied to the text the tree was parsed from. Every byte
//! outside an edited range is reproduced verbatim.

use std::ops::Range;

/// Rendering failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// Two edits touch the same bytes
    #[error("overlapping edits at {first:?} and {second:?}")]
    Overlap {
        /// Earlier edit
        first: Range<usize>,
        /// Later edit
        second: Range<usize>,
    },

    /// Edit range outside the source or not on a character boundary
    #[error("edit range {0:?} is not addressable")]
    OutOfBounds(Range<usize>),
}

#[derive(Debug, Clone)]
struct Edit {
    range: Range<usize>,
    replacement: String,
}

/// Applies node-range edits to source text
#[derive(Debug, Clone)]
pub struct SourceRewriter<'s> {
    source: &'s str,
    edits: Vec<Edit>,
}

impl<'s> SourceRewriter<'s> {
    /// Create rewriter over source
    #[inline]
    #[must_use]
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    /// Remove a byte range
    pub fn delete(&mut self, range: Range<usize>) -> &mut Self {
        self.replace(range, "")
    }

    /// Replace a byte range with text
    pub fn replace(&mut self, range: Range<usize>, replacement: impl Into<String>) -> &mut Self {
        self.edits.push(Edit {
            range,
            replacement: replacement.into(),
        });
        self
    }

    /// Produce the edited text
    ///
    /// # Errors
    /// Returns error if edits overlap or fall outside the source.
    pub fn render(&self) -> Result<String, RenderError> {
        let mut edits: Vec<&Edit> = self.edits.iter().collect();
        edits.sort_by_key(|e| (e.range.start, e.range.end));

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        let mut previous: Option<&Edit> = None;

        for edit in edits {
            if let Some(prev) = previous {
                if edit.range.start < prev.range.end {
                    return Err(RenderError::Overlap {
                        first: prev.range.clone(),
                        second: edit.range.clone(),
                    });
                }
            }
            let kept = self
                .source
                .get(cursor..edit.range.start)
                .ok_or_else(|| RenderError::OutOfBounds(edit.range.clone()))?;
            if self.source.get(edit.range.clone()).is_none() {
                return Err(RenderError::OutOfBounds(edit.range.clone()));
            }
            out.push_str(kept);
            out.push_str(&edit.replacement);
            cursor = edit.range.end;
            previous = Some(edit);
        }

        out.push_str(self.source.get(cursor..).unwrap_or(""));
        Ok(out)
    }
}

/// Byte offset of the start of the line containing `offset`
#[must_use]
pub fn line_start(source: &str, offset: usize) -> usize {
    source
        .get(..offset)
        .and_then(|head| head.rfind('\n'))
        .map_or(0, |newline| newline + 1)
}

/// Byte offset just past the line terminator of the line containing `offset`
#[must_use]
pub fn line_end(source: &str, offset: usize) -> usize {
    source
        .get(offset..)
        .and_then(|tail| tail.find('\n'))
        .map_or(source.len(), |newline| offset + newline + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_untouched_source() {
        let rewriter = SourceRewriter::new("a = 1\n");
        assert_eq!(rewriter.render().unwrap(), "a = 1\n");
    }

    #[test]
    fn applies_edits_in_position_order() {
        let mut rewriter = SourceRewriter::new("one two three");
        rewriter.replace(8..13, "3").delete(3..7);
        assert_eq!(rewriter.render().unwrap(), "one 3");
    }

    #[test]
    fn rejects_overlap() {
        let mut rewriter = SourceRewriter::new("abcdef");
        rewriter.delete(0..4).delete(2..5);
        assert!(matches!(rewriter.render(), Err(RenderError::Overlap { .. })));
    }

    #[test]
    fn rejects_out_of_bounds() {
        let mut rewriter = SourceRewriter::new("abc");
        rewriter.delete(2..10);
        assert_eq!(rewriter.render(), Err(RenderError::OutOfBounds(2..10)));
    }

    #[test]
    fn line_bounds() {
        let text = "ab\ncd\nef";
        assert_eq!(line_start(text, 4), 3);
        assert_eq!(line_end(text, 4), 6);
        assert_eq!(line_start(text, 1), 0);
        assert_eq!(line_end(text, 7), text.len());
    }
}
