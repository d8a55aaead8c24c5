/// Lexical items produced by the [Lexer].
///
/// [Lexer]: crate::lexer::Lexer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A run of plain characters outside any tag.
    Text(String),

    /// One tag occurrence.
    Tag {
        /// Raw content between `[` and `]`, delimiters excluded.
        raw: String,

        /// Character offset of the opening `[` in the source.
        offset: usize,
    },
}
