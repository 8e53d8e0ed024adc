//! Strongly-typed model and row names.

use crate::name_macro::define_name;

define_name! {
    /// Name of a model as declared in the schema (e.g. `Catalog`).
    pub struct ModelName("model name");
}

define_name! {
    /// Name of a fixture row.
    ///
    /// Row names are global to a load: two models may not share one, and
    /// association fields refer to other rows by this name alone.
    pub struct RowName("row name");
}

#[cfg(test)]
#[path = "names_test.rs"]
mod tests;
