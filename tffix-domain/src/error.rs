use thiserror::Error;

/// A fix table that breaks one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("module `{module}` names neither a version file nor a variables file")]
    EmptyModule { module: String },

    #[error("module `{module}` lists providers but no version_file")]
    ProvidersWithoutVersionFile { module: String },

    #[error("module `{module}` lists variable fixes but no variables_file")]
    VariablesWithoutVariablesFile { module: String },

    #[error("module `{module}`: `{provider}` is not a valid provider name")]
    InvalidProviderName { module: String, provider: String },

    #[error("module `{module}`: provider `{provider}` is listed more than once")]
    DuplicateProvider { module: String, provider: String },

    #[error("module `{module}`: provider `{provider}` has an empty {field}")]
    EmptyProviderField {
        module: String,
        provider: String,
        field: &'static str,
    },

    #[error("module `{module}`: `{variable}` is not a valid variable name")]
    InvalidVariableName { module: String, variable: String },

    #[error("module `{module}`: variable `{variable}` is listed more than once")]
    DuplicateVariable { module: String, variable: String },

    #[error("module `{module}`: variable `{variable}` requests neither a type nor a description")]
    EmptyVariableFix { module: String, variable: String },

    #[error("module `{module}`: variable `{variable}` has an invalid type expression `{ty}`")]
    InvalidTypeExpression {
        module: String,
        variable: String,
        ty: String,
    },

    #[error("no module matches {patterns:?}")]
    NoModulesSelected { patterns: Vec<String> },
}
