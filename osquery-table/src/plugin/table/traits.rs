/// Traits implemented by table authors: the row shape and the row source
use crate::call_context::CallContext;
use crate::plugin::table::query_context::QueryContext;
use crate::plugin::table::row::Field;

/// Error type returned by row generators. Anything implementing
/// `std::error::Error` converts into it with `?`, and so do strings.
pub type GenerateError = Box<dyn std::error::Error + Send + Sync>;

/// A typed row of a table.
///
/// `fields` lists the row's columns in a fixed order. The order and the value
/// types of the first instance handed to the plugin become the table schema;
/// every row produced later must list the same columns with the same types.
pub trait RowDefinition: Send + 'static {
    fn fields(&self) -> Vec<Field>;
}

/// Produces the rows of a table for one query.
///
/// Implemented for any `Fn(&CallContext, &QueryContext) -> Result<Vec<R>, GenerateError>`,
/// so a closure is usually enough. Generators are shared between concurrent
/// calls and must not rely on exclusive access to their own state.
pub trait GenerateRows<R: RowDefinition>: Send + Sync + 'static {
    fn generate(&self, ctx: &CallContext, query: &QueryContext) -> Result<Vec<R>, GenerateError>;
}

impl<R, F> GenerateRows<R> for F
where
    R: RowDefinition,
    F: Fn(&CallContext, &QueryContext) -> Result<Vec<R>, GenerateError> + Send + Sync + 'static,
{
    fn generate(&self, ctx: &CallContext, query: &QueryContext) -> Result<Vec<R>, GenerateError> {
        self(ctx, query)
    }
}
