/// How `set_fields` treats the fields it was not given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Replace only the named top-level fields.
    #[default]
    Merge,
    /// Replace the whole top-level record. Collections are untouched.
    Overwrite,
}
