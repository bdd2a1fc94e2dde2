//! Select string compilation: `(field1,field2,...)` of top-level fields.

use crate::catalog::SchemaResolver;
use crate::compiler::{build_path_chain, unwrap_parens};
use crate::config::QueryConfig;
use crate::expression::{CompilationError, ExpressionError, ExpressionResult, SchemaPath};
use log::debug;

pub struct SelectCompiler<'a> {
    config: &'a QueryConfig,
    root: &'a str,
}

impl<'a> SelectCompiler<'a> {
    pub fn new(config: &'a QueryConfig, root: &'a str) -> Self {
        Self { config, root }
    }

    /// Projection paths in the order given
    pub fn compile_str(&self, select: &str) -> Result<Vec<SchemaPath>, CompilationError> {
        let resolver = SchemaResolver::new(self.config.catalog());
        let paths = unwrap_parens(select)
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                if name.contains(['.', '[']) {
                    return Err(ExpressionError::InvalidArgument(format!(
                        "select accepts top-level fields only, got '{}'",
                        name
                    )));
                }
                let chain = resolver.resolve(self.root, name)?;
                build_path_chain(&chain, self.config.handlers())
            })
            .collect::<ExpressionResult<Vec<_>>>()?;

        debug!("Compiled select '{}' on {} to {} paths", select, self.root, paths.len());
        Ok(paths)
    }
}
