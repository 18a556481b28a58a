//! Reference string table loader.
//!
//! A string table is a run of `(language, NUL-terminated string)` pairs
//! closed by a `0xFF` byte. One string is selected per table: English (UK)
//! when present, then English (US), then whichever entry comes first.

use locobj_common::{
    LoadedObjectHandle, Span, StringId, StringTableLoader, StringTableResult, SENTINEL,
};
use tracing::trace;

/// Language codes used in string tables.
pub mod language {
    pub const ENGLISH_UK: u8 = 0;
    pub const ENGLISH_US: u8 = 1;
    pub const GERMAN: u8 = 2;
    pub const FRENCH: u8 = 3;
    pub const ITALIAN: u8 = 4;
    pub const SPANISH: u8 = 5;
}

/// Where a loaded string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringOrigin {
    pub handle: LoadedObjectHandle,
    /// Table index within the owning object.
    pub index: u8,
}

/// String storage filled by loading string tables.
///
/// Every loaded table gets a fresh id, starting at 1; id 0 is the empty string.
#[derive(Debug, Clone, Default)]
pub struct StringTables {
    strings: Vec<(String, StringOrigin)>,
}

impl StringTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of strings loaded.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Look up a loaded string. The null id yields `""`.
    pub fn text(&self, id: StringId) -> Option<&str> {
        if id.is_null() {
            return Some("");
        }
        self.strings
            .get(id.0 as usize - 1)
            .map(|(text, _)| text.as_str())
    }

    /// Object and table a string was loaded from.
    pub fn origin(&self, id: StringId) -> Option<StringOrigin> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.strings.get(index).map(|&(_, origin)| origin)
    }

    /// Drop every string loaded after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.strings.truncate(len);
    }

    /// Forget every string loaded for `handle`.
    ///
    /// Ids of other strings stay valid; released ids read as `""`.
    pub fn release(&mut self, handle: LoadedObjectHandle) {
        for (text, origin) in &mut self.strings {
            if origin.handle == handle {
                text.clear();
            }
        }
    }
}

fn language_rank(language: u8) -> u8 {
    match language {
        language::ENGLISH_UK => 0,
        language::ENGLISH_US => 1,
        _ => 2,
    }
}

impl StringTableLoader for StringTables {
    fn load_string_table(
        &mut self,
        data: &[u8],
        handle: LoadedObjectHandle,
        index: u8,
    ) -> locobj_common::Result<StringTableResult> {
        let mut span = Span::new(data);
        let mut selected: Option<(u8, &[u8])> = None;

        loop {
            let language = span.read_u8()?;
            if language == SENTINEL {
                break;
            }
            let text = span.read_cstring()?;
            let better = match selected {
                Some((current, _)) => language_rank(language) < language_rank(current),
                None => true,
            };
            if better {
                selected = Some((language, text));
            }
        }

        let id = u16::try_from(self.strings.len() + 1)
            .map(StringId)
            .map_err(|_| locobj_common::Error::IdsExhausted {
                capacity: u16::MAX as usize,
            })?;
        let text = selected
            .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();
        self.strings.push((text, StringOrigin { handle, index }));

        trace!(?handle, index, id = id.0, length = span.position(), "loaded string table");
        Ok(StringTableResult {
            id,
            table_length: span.position(),
        })
    }
}
