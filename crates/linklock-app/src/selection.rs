//! Sender-side paragraph/line selection.
//!
//! The operator picks a start position and an end position, each as a
//! (paragraph, line) pair entered in two phases on the keypad. A valid
//! selection resolves to the newline-joined run of lines from start through
//! end inclusive; that byte buffer is what gets encrypted and framed.

#[cfg(test)]
use linklock_proto::Frame;
use thiserror::Error;

/// Errors from resolving a selection against a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// A coordinate names a paragraph or line the document does not have.
    #[error("no such position: paragraph {paragraph}, line {line}")]
    OutOfBounds {
        /// Paragraph index that was addressed
        paragraph: usize,
        /// Line index that was addressed
        line: usize,
    },

    /// The end position precedes the start position.
    ///
    /// Rejected without touching any buffer; the operator re-enters.
    #[error("selection end {end:?} precedes start {start:?}")]
    InvalidRange {
        /// Entered start position
        start: TextPosition,
        /// Entered end position
        end: TextPosition,
    },

    /// The selected text does not fit in a frame payload.
    #[error("selected text is {size} bytes, limit {max} before padding")]
    TooLarge {
        /// Size the selection would occupy
        size: usize,
        /// Maximum allowed before padding
        max: usize,
    },
}

/// Position of one line within a document.
///
/// Ordering is lexicographic over (paragraph, line), which is exactly the
/// "end must not precede start" rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TextPosition {
    /// Zero-based paragraph index.
    pub paragraph: usize,
    /// Zero-based line index within the paragraph.
    pub line: usize,
}

/// The text available for selection: paragraphs of lines.
///
/// Plain vectors bound iteration by length; there are no sentinel entries.
#[derive(Debug, Clone, Default)]
pub struct Document {
    paragraphs: Vec<Vec<String>>,
}

impl Document {
    /// Build a document from paragraphs of lines.
    pub fn new(paragraphs: Vec<Vec<String>>) -> Self {
        Self { paragraphs }
    }

    /// Number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Number of lines in `paragraph`, or `None` if it does not exist.
    pub fn line_count(&self, paragraph: usize) -> Option<usize> {
        self.paragraphs.get(paragraph).map(Vec::len)
    }

    /// Whether `position` names an existing line.
    pub fn contains(&self, position: TextPosition) -> bool {
        self.line_count(position.paragraph).is_some_and(|lines| position.line < lines)
    }

    fn lines(&self, paragraph: usize) -> &[String] {
        self.paragraphs.get(paragraph).map_or(&[], Vec::as_slice)
    }
}

/// A complete, operator-confirmed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// First selected line.
    pub start: TextPosition,
    /// Last selected line (inclusive).
    pub end: TextPosition,
}

impl Selection {
    /// Resolve the selection into the plaintext buffer.
    ///
    /// Lines from `start` through `end` inclusive are joined with `\n` (each
    /// line is newline-terminated, matching the sender firmware). Validation
    /// happens before any byte is copied: a backwards or out-of-bounds
    /// selection mutates nothing.
    ///
    /// # Errors
    ///
    /// - `SelectionError::OutOfBounds` if either endpoint does not exist
    /// - `SelectionError::InvalidRange` if `end < start`
    /// - `SelectionError::TooLarge` if the joined text exceeds `max_len`
    pub fn extract(&self, document: &Document, max_len: usize) -> Result<Vec<u8>, SelectionError> {
        for position in [self.start, self.end] {
            if !document.contains(position) {
                return Err(SelectionError::OutOfBounds {
                    paragraph: position.paragraph,
                    line: position.line,
                });
            }
        }

        if self.end < self.start {
            return Err(SelectionError::InvalidRange { start: self.start, end: self.end });
        }

        let mut buffer = Vec::new();
        for paragraph in self.start.paragraph..=self.end.paragraph {
            let lines = document.lines(paragraph);
            if lines.is_empty() {
                // An empty paragraph in the middle of the range contributes
                // nothing.
                continue;
            }

            let first = if paragraph == self.start.paragraph { self.start.line } else { 0 };
            let last =
                if paragraph == self.end.paragraph { self.end.line } else { lines.len() - 1 };

            for line in &lines[first..=last] {
                if buffer.len() + line.len() + 1 > max_len {
                    return Err(SelectionError::TooLarge {
                        size: buffer.len() + line.len() + 1,
                        max: max_len,
                    });
                }
                buffer.extend_from_slice(line.as_bytes());
                buffer.push(b'\n');
            }
        }

        Ok(buffer)
    }
}

/// Which endpoint is being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Entering the first selected position.
    Start,
    /// Entering the last selected position.
    End,
}

/// Which coordinate of the endpoint is being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPhase {
    /// Awaiting a paragraph number.
    Paragraph,
    /// Awaiting a line number within the staged paragraph.
    Line,
}

/// What an input did to the selection flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Value staged; the caller echoes it and awaits confirmation.
    Staged {
        /// Endpoint being entered
        anchor: Anchor,
        /// Coordinate being entered
        phase: EntryPhase,
        /// The staged index
        value: usize,
    },
    /// Input dropped: value out of range, or confirm with nothing staged.
    Ignored,
    /// Confirmed; the flow moved on to the next coordinate or endpoint.
    Advanced {
        /// Endpoint now being entered
        anchor: Anchor,
        /// Coordinate now being entered
        phase: EntryPhase,
    },
    /// Both endpoints confirmed. The flow has reset for the next message.
    Complete(Selection),
}

/// Two-phase, two-endpoint entry state machine.
///
/// Mirrors the physical flow: the operator keys a paragraph number, confirms,
/// keys a line number, confirms, first for the start position and then for
/// the end. A candidate value is only staged if it addresses text that
/// exists, so a `Complete` selection always has in-bounds endpoints (the
/// range order is still checked at extraction).
#[derive(Debug, Clone)]
pub struct SelectionInput {
    anchor: Anchor,
    phase: EntryPhase,
    staged: Option<usize>,
    paragraph: usize,
    start: Option<TextPosition>,
}

impl SelectionInput {
    /// Fresh flow, awaiting the start paragraph.
    pub fn new() -> Self {
        Self {
            anchor: Anchor::Start,
            phase: EntryPhase::Paragraph,
            staged: None,
            paragraph: 0,
            start: None,
        }
    }

    /// Endpoint currently being entered.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Coordinate currently being entered.
    pub fn phase(&self) -> EntryPhase {
        self.phase
    }

    /// Display prompt for the current entry step.
    pub fn prompt(&self) -> (&'static str, &'static str) {
        match (self.anchor, self.phase) {
            (Anchor::Start, EntryPhase::Paragraph) => ("Start Index", "Enter Para #"),
            (Anchor::Start, EntryPhase::Line) => ("Start Index", "Enter Line #"),
            (Anchor::End, EntryPhase::Paragraph) => ("End Index", "Enter Para #"),
            (Anchor::End, EntryPhase::Line) => ("End Index", "Enter Line #"),
        }
    }

    /// Stage a candidate index for the current coordinate.
    ///
    /// Out-of-range values are ignored outright: the operator sees no echo
    /// and the flow does not move.
    pub fn stage(&mut self, value: usize, document: &Document) -> SelectionEvent {
        let in_range = match self.phase {
            EntryPhase::Paragraph => value < document.paragraph_count(),
            EntryPhase::Line => {
                document.line_count(self.paragraph).is_some_and(|lines| value < lines)
            },
        };

        if !in_range {
            return SelectionEvent::Ignored;
        }

        self.staged = Some(value);
        SelectionEvent::Staged { anchor: self.anchor, phase: self.phase, value }
    }

    /// Confirm the staged value and advance the flow.
    pub fn confirm(&mut self) -> SelectionEvent {
        let Some(value) = self.staged.take() else {
            return SelectionEvent::Ignored;
        };

        match self.phase {
            EntryPhase::Paragraph => {
                self.paragraph = value;
                self.phase = EntryPhase::Line;
                SelectionEvent::Advanced { anchor: self.anchor, phase: self.phase }
            },
            EntryPhase::Line => {
                let position = TextPosition { paragraph: self.paragraph, line: value };
                match self.anchor {
                    Anchor::Start => {
                        self.start = Some(position);
                        self.anchor = Anchor::End;
                        self.phase = EntryPhase::Paragraph;
                        SelectionEvent::Advanced { anchor: self.anchor, phase: self.phase }
                    },
                    Anchor::End => {
                        let Some(start) = self.start else {
                            unreachable!("end entry always follows a confirmed start");
                        };
                        let selection = Selection { start, end: position };
                        *self = Self::new();
                        SelectionEvent::Complete(selection)
                    },
                }
            },
        }
    }
}

impl Default for SelectionInput {
    fn default() -> Self {
        Self::new()
    }
}
