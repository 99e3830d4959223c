//! Grammar type classification
//!
//! This is where all language-specific knowledge lives. Raw types arrive as
//! `<prefix>:<grammar type>` (`java:class_declaration`, `py:call`, `ts:identifier`).
//! The function is total: unknown prefixes and unknown types degrade to
//! [`NodeRole::Unknown`], so a grammar upgrade never breaks the pipeline.

use super::node::{Language, NodeRole};

/// Classify a (possibly language-prefixed) raw grammar type.
pub fn classify(raw_type: &str) -> (Language, NodeRole) {
    let Some((prefix, grammar_type)) = raw_type.split_once(':') else {
        return (Language::Unknown, NodeRole::Unknown);
    };

    let language = Language::from_prefix(prefix);
    let role = match language {
        Language::Java => java_role(grammar_type),
        Language::Python => python_role(grammar_type),
        Language::TypeScript => typescript_role(grammar_type),
        Language::Unknown => NodeRole::Unknown,
    };
    (language, role)
}

fn java_role(grammar_type: &str) -> NodeRole {
    match grammar_type {
        "package_declaration" | "import_declaration" => NodeRole::ModulePath,
        "scoped_identifier" => NodeRole::NamespaceSegment,
        "class_declaration"
        | "interface_declaration"
        | "enum_declaration"
        | "record_declaration"
        | "annotation_type_declaration" => NodeRole::TypeDeclaration,
        "method_declaration" | "constructor_declaration" => NodeRole::FunctionDeclaration,
        "variable_declarator" | "local_variable_declaration" | "formal_parameter" => {
            NodeRole::VariableDeclaration
        }
        "type_identifier" | "generic_type" => NodeRole::TypeReference,
        "method_invocation" => NodeRole::FunctionCall,
        // Default for bare names; declarations pick it up as their primary identifier
        "identifier" => NodeRole::VariableReference,
        "field_access" => NodeRole::FieldReference,
        _ => NodeRole::Unknown,
    }
}

fn typescript_role(grammar_type: &str) -> NodeRole {
    match grammar_type {
        "import_statement" => NodeRole::ModulePath,
        "import_specifier" => NodeRole::ImportTarget,
        "nested_identifier" => NodeRole::NamespaceSegment,
        "class_declaration"
        | "abstract_class_declaration"
        | "interface_declaration"
        | "type_alias_declaration"
        | "enum_declaration" => NodeRole::TypeDeclaration,
        "function_declaration"
        | "generator_function_declaration"
        | "method_declaration"
        | "method_definition" => NodeRole::FunctionDeclaration,
        "variable_declaration"
        | "variable_declarator"
        | "required_parameter"
        | "optional_parameter" => NodeRole::VariableDeclaration,
        "type_reference" | "type_identifier" => NodeRole::TypeReference,
        "call_expression" => NodeRole::FunctionCall,
        "identifier" => NodeRole::VariableReference,
        "member_expression" => NodeRole::FieldReference,
        _ => NodeRole::Unknown,
    }
}

fn python_role(grammar_type: &str) -> NodeRole {
    match grammar_type {
        "import_statement" | "import_from_statement" => NodeRole::ModulePath,
        "dotted_name" => NodeRole::NamespaceSegment,
        "aliased_import" => NodeRole::ImportTarget,
        "class_definition" => NodeRole::TypeDeclaration,
        "function_definition" => NodeRole::FunctionDeclaration,
        "assignment" | "typed_parameter" | "default_parameter" | "typed_default_parameter" => {
            NodeRole::VariableDeclaration
        }
        "type" => NodeRole::TypeReference,
        "call" => NodeRole::FunctionCall,
        "identifier" => NodeRole::VariableReference,
        "attribute" => NodeRole::FieldReference,
        _ => NodeRole::Unknown,
    }
}
