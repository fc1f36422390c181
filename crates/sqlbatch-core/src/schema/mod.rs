mod column;
mod quoter;
mod types;

pub use column::{
    default_constraint_name, format_default, format_identity, format_nullable, generate_column,
    generate_columns, ColumnDef, ColumnModification,
};
pub use quoter::{escape_literal, quote_constraint_name, quote_identifier, quote_value};
pub use types::SqlType;
