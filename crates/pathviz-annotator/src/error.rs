use pathviz_expr::ParseError;
use thiserror::Error;

/// Errors that abort an annotation run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AnnotateError {
    /// An indexed write targets a binding that is not an array.
    #[error("cannot assign to an element of `{name}`: it is {found}, not an array")]
    InvalidIndexTarget { name: String, found: &'static str },

    #[error("invalid index `{index}` for `{name}`")]
    InvalidIndex { name: String, index: String },

    /// Only raised with `strict_inputs`; otherwise the parameter is bound to
    /// `undefined`.
    #[error("no input left for parameter `{parameter}` of `{function}`")]
    UnderflowInput { function: String, parameter: String },

    #[error(transparent)]
    MalformedExpression(#[from] ParseError),

    #[error("`{text}` does not assign to a variable or an array element")]
    InvalidAssignment { text: String },

    #[error("statements nest deeper than {limit} levels")]
    DepthExceeded { limit: u32 },
}
