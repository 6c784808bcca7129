//! Schema introspection: live metadata to template-ready descriptors

mod comments;
mod descriptor;
mod scanner;
#[cfg(test)]
pub(crate) mod testing;

pub use comments::{
    comment_provider_for, parse_table_comment, ColumnComments, CommentProvider, Db2Comments,
    MySqlComments, NoComments, OracleComments, PostgresComments, SqlServerComments,
};
pub use descriptor::{ColumnDescriptor, TableDescriptor};
pub use scanner::{SchemaScanner, LOMBOK_IMPORTS};
