//! Top-level assembly: document and options in, TypeScript module out.

use crate::client::{CLIENT_CLASS, ClientAssembler, TRANSPORT_TYPE};
use crate::document::Document;
use crate::error::Result;
use crate::keys::OperationKey;
use crate::options::GeneratorOptions;
use crate::parameters::{PARAMETERS_SCHEMA, build_parameters};
use crate::response::build_response;
use crate::schema::ensure_named_schema;
use crate::session::GenerationSession;
use apigen_syntax::{Program, TYPESCRIPT_WRITER, Writer};
use tracing::{debug, info};

/// Generate the client module for `document` as TypeScript source.
///
/// Generation is all-or-nothing: any error aborts the run and no text is
/// produced. Identical inputs always produce identical text.
pub fn generate(document: &Document, options: &GeneratorOptions) -> Result<String> {
    let program = generate_program(document, options)?;
    Ok(TYPESCRIPT_WRITER.write(&program))
}

/// Build the module IR without emitting it.
pub fn generate_program(document: &Document, options: &GeneratorOptions) -> Result<Program> {
    let backend = options.backend.backend();
    let mut session = GenerationSession::new(document, &backend, options);
    (backend.imports)(&mut session.imports);

    if options.include_operations {
        for ident in [PARAMETERS_SCHEMA, TRANSPORT_TYPE, CLIENT_CLASS] {
            session.claim(ident, "the generated client")?;
        }
    }
    if options.include_schemas {
        for name in document.components.schemas.keys() {
            ensure_named_schema(&mut session, name)?;
        }
    }

    let mut operations = 0usize;
    if options.include_operations {
        let mut client = ClientAssembler::new();
        for operation in document.operations() {
            let key = OperationKey::for_operation(&operation)?;
            debug!(operation = %key.upper, method = %operation.method, path = operation.path, "building operation");
            let parameters = build_parameters(&mut session, &key, &operation)?;
            let response = build_response(&mut session, &key, operation.operation)?;
            client.add_operation(&mut session, &key, &operation, &parameters, &response)?;
            operations += 1;
        }
        client.finish(&mut session);
    }

    info!(
        backend = backend.name,
        declarations = session.schemas.len(),
        operations,
        "assembled module"
    );
    session.check_imports()?;
    Ok(session.into_program())
}
