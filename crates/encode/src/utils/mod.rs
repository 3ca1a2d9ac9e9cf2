mod arguments;

// re-export
pub(crate) use arguments::parse_argument;
