#![no_main]

//! Fuzz target for the version and variable patchers.
//!
//! Whatever the input text, the patchers must not panic, and when they
//! succeed a second pass must leave the text unchanged.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tffix_edit::{ensure_providers_in, ensure_variable_metadata_in};
use tffix_types::table::{ProviderSpec, VariableFix};

#[derive(Debug, Arbitrary)]
struct Input {
    text: Option<String>,
    providers: Vec<(Name, String)>,
    variables: Vec<(Name, Option<Type>, Option<String>)>,
}

#[derive(Debug, Arbitrary)]
enum Name {
    Helm,
    Null,
    Random,
    Namespace,
    DomainName,
}

impl Name {
    fn as_str(&self) -> &'static str {
        match self {
            Name::Helm => "helm",
            Name::Null => "null",
            Name::Random => "random",
            Name::Namespace => "namespace",
            Name::DomainName => "domain_name",
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Type {
    String,
    Bool,
    ListOfString,
}

impl Type {
    fn as_str(&self) -> &'static str {
        match self {
            Type::String => "string",
            Type::Bool => "bool",
            Type::ListOfString => "list(string)",
        }
    }
}

fuzz_target!(|input: Input| {
    let mut providers: Vec<ProviderSpec> = Vec::new();
    for (name, version) in &input.providers {
        if providers.iter().any(|p| p.name == name.as_str()) {
            continue;
        }
        providers.push(ProviderSpec::new(
            name.as_str(),
            format!("hashicorp/{}", name.as_str()),
            version.clone(),
        ));
    }

    if let Ok(once) = ensure_providers_in(input.text.as_deref(), &providers) {
        let twice = ensure_providers_in(Some(&once.text), &providers).expect("patched text outlines");
        assert_eq!(once.text, twice.text);
    }

    let Some(text) = input.text.as_deref() else {
        return;
    };
    let fixes: Vec<VariableFix> = input
        .variables
        .iter()
        .map(|(name, ty, description)| VariableFix {
            name: name.as_str().to_string(),
            ty: ty.as_ref().map(|t| t.as_str().to_string()),
            description: description.clone(),
        })
        .collect();
    if let Ok(once) = ensure_variable_metadata_in(text, &fixes) {
        let twice = ensure_variable_metadata_in(&once.text, &fixes).expect("patched text outlines");
        assert_eq!(once.text, twice.text);
    }
});
