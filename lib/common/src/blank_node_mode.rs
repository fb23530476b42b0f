/// Determines how blank nodes in triple and quad patterns are translated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlankNodeMode {
    /// A blank node is interpreted as a variable that is not projected. This is the semantics of
    /// blank nodes in query bodies.
    #[default]
    Variable,
    /// A blank node is interpreted as an opaque constant. This is required for templates of
    /// `INSERT` operations, where each blank node stands for a node that is yet to be created.
    Constant,
}
