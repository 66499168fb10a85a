//! Configuration options for Markdown rendering

/// Options for Markdown rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Bullet list marker (`-`, `*` or `+`)
    pub bullet_list_marker: char,

    /// Spaces added per nesting level of a list
    pub list_indent: usize,

    /// Thematic break string
    pub hr: String,

    /// Fence for fenced code blocks. Lengthened automatically when the
    /// code itself contains a run of the fence character.
    pub fence: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bullet_list_marker: '-',
            list_indent: 2,
            hr: "---".to_string(),
            fence: "```".to_string(),
        }
    }
}
