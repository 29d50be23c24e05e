use std::fmt;

/// JSON Pointer (RFC 6901) locating a member of a request document.
///
/// Pointers are built by extension, never mutated in place, so a parent
/// pointer can be shared by every child that descends from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPointer {
    segments: Vec<String>,
}

impl JsonPointer {
    /// The empty pointer, referring to the whole document.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns a pointer extended by an object member.
    pub fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    /// Returns a pointer extended by an array index.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(index.to_string());
        Self { segments }
    }

    /// True for the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            // `~` must be escaped before `/`
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

impl From<&JsonPointer> for String {
    fn from(pointer: &JsonPointer) -> Self {
        pointer.to_string()
    }
}
