//! The `Api` client class and its transport type.
//!
//! Each operation becomes an async method that encodes its parameters,
//! hands the request to the injected transport and decodes the response.
//! Read-only operations also get a `...Query` method returning TanStack
//! Query options; the rest get a `...Mutation` method.

use crate::document::OperationRef;
use crate::error::Result;
use crate::keys::OperationKey;
use crate::parameters::{PARAMETERS_SCHEMA, ensure_parameters_schema, operation_source};
use crate::session::{GenerationSession, NamedCodec, claim};
use apigen_syntax::{Arrow, ArrowBody, BinaryOp, ClassDecl, ClassMember, Expr, Param, Property, Stmt, TsType};
use std::collections::HashMap;

pub const CLIENT_CLASS: &str = "Api";
pub const TRANSPORT_TYPE: &str = "ApiTransport";
const TRANSPORT_FIELD: &str = "#transport";
const QUERY_PACKAGE: &str = "@tanstack/react-query";

/// Accumulates client methods across operations.
#[derive(Debug, Default)]
pub struct ClientAssembler {
    methods: Vec<ClassMember>,
    /// Method name to the operation that owns it.
    owners: HashMap<String, String>,
}

impl ClientAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the call method and its query or mutation descriptor.
    pub fn add_operation(
        &mut self,
        session: &mut GenerationSession<'_>,
        key: &OperationKey,
        operation: &OperationRef<'_>,
        parameters: &NamedCodec,
        response: &NamedCodec,
    ) -> Result<()> {
        let backend = session.backend;
        let source = operation_source(operation);
        let is_query = operation.method.is_query();
        let descriptor_name = if is_query {
            format!("{}Query", key.lower)
        } else {
            format!("{}Mutation", key.lower)
        };
        claim(&mut self.owners, &key.lower, &source)?;
        claim(&mut self.owners, &descriptor_name, &source)?;
        let comment = method_comment(operation);

        let request = Expr::await_((backend.methods.encode)(
            parameters.ident(),
            Expr::ident("parameters"),
        ));
        let response_value = Expr::await_(Expr::call(
            Expr::member(Expr::This, TRANSPORT_FIELD),
            vec![
                Expr::string(operation.method.as_str()),
                Expr::ident("request"),
            ],
        ));
        let decoded = Expr::await_((backend.methods.decode)(
            response.ident(),
            Expr::ident("response"),
        ));
        self.methods.push(ClassMember::Method {
            name: key.lower.clone(),
            params: vec![Param::typed("parameters", parameters.decoded.clone())],
            body: vec![
                Stmt::const_decl("request", request),
                Stmt::const_decl("response", response_value),
                Stmt::return_stmt(Some(decoded)),
            ],
            is_async: true,
            comment: comment.clone(),
        });

        let descriptor = if is_query {
            query_method(session, descriptor_name, key, parameters, comment)
        } else {
            mutation_method(session, descriptor_name, key, parameters, comment)
        };
        self.methods.push(descriptor);
        Ok(())
    }

    /// Register the transport type and the client class after everything else.
    pub fn finish(self, session: &mut GenerationSession<'_>) {
        let backend = session.backend;
        ensure_parameters_schema(session);

        let transport = TsType::Function {
            params: vec![
                Param::typed("method", TsType::String),
                Param::typed("request", backend.types.encoded_of(PARAMETERS_SCHEMA)),
            ],
            ret: Box::new(TsType::generic(
                "Promise",
                vec![TsType::reference("Response")],
            )),
        };
        session.register(
            TRANSPORT_TYPE,
            vec![Stmt::export_type(TRANSPORT_TYPE, transport)],
        );

        let mut members = vec![
            ClassMember::Field {
                name: TRANSPORT_FIELD.to_string(),
                ty: Some(TsType::reference(TRANSPORT_TYPE)),
            },
            ClassMember::Constructor {
                params: vec![Param::typed(
                    "transport",
                    TsType::reference(TRANSPORT_TYPE),
                )],
                body: vec![Stmt::expr(Expr::assign(
                    Expr::member(Expr::This, TRANSPORT_FIELD),
                    Expr::ident("transport"),
                ))],
            },
        ];
        members.extend(self.methods);
        session.register(
            CLIENT_CLASS,
            vec![Stmt::Class(ClassDecl {
                name: CLIENT_CLASS.to_string(),
                export: true,
                members,
            })],
        );
    }
}

/// `### summary` followed by the description.
fn method_comment(operation: &OperationRef<'_>) -> Option<String> {
    let mut lines = Vec::new();
    if let Some(summary) = &operation.operation.summary {
        lines.push(format!("### {summary}"));
    }
    if let Some(description) = &operation.operation.description {
        lines.push(description.clone());
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn call_self(key: &OperationKey) -> Expr {
    Expr::method(Expr::This, &key.lower, vec![Expr::ident("parameters")])
}

/// `queryOptions({ queryKey, queryFn })` with `skipToken` support.
fn query_method(
    session: &mut GenerationSession<'_>,
    name: String,
    key: &OperationKey,
    parameters: &NamedCodec,
    comment: Option<String>,
) -> ClassMember {
    let imports = &mut session.imports;
    let query_options = imports.ensure_import("queryOptions", QUERY_PACKAGE, false);
    let skip_token = imports.ensure_import("skipToken", QUERY_PACKAGE, false);
    imports.ensure_import("QueryKey", QUERY_PACKAGE, true);

    let query_key = Expr::as_(
        Expr::array(vec![Expr::string(&key.upper), Expr::ident("parameters")]),
        TsType::reference("QueryKey"),
    );
    let query_fn = Expr::conditional(
        Expr::binary(Expr::ident("parameters"), BinaryOp::Eq, skip_token.clone()),
        skip_token,
        async_arrow(vec![], call_self(key)),
    );
    let options = Expr::call(
        query_options,
        vec![Expr::object(vec![
            Property::new("queryKey", query_key),
            Property::new("queryFn", query_fn),
        ])],
    );
    ClassMember::Method {
        name,
        params: vec![Param::typed(
            "parameters",
            TsType::union(vec![
                parameters.decoded.clone(),
                TsType::query("skipToken"),
            ]),
        )],
        body: vec![Stmt::return_stmt(Some(options))],
        is_async: false,
        comment,
    }
}

/// `mutationOptions({ mutationFn })`.
fn mutation_method(
    session: &mut GenerationSession<'_>,
    name: String,
    key: &OperationKey,
    parameters: &NamedCodec,
    comment: Option<String>,
) -> ClassMember {
    let mutation_options = session
        .imports
        .ensure_import("mutationOptions", QUERY_PACKAGE, false);
    let mutation_fn = async_arrow(
        vec![Param::typed("parameters", parameters.decoded.clone())],
        call_self(key),
    );
    let options = Expr::call(
        mutation_options,
        vec![Expr::object(vec![Property::new("mutationFn", mutation_fn)])],
    );
    ClassMember::Method {
        name,
        params: vec![],
        body: vec![Stmt::return_stmt(Some(options))],
        is_async: false,
        comment,
    }
}

fn async_arrow(params: Vec<Param>, body: Expr) -> Expr {
    Expr::Arrow(Box::new(Arrow {
        params,
        body: ArrowBody::Expr(body),
        is_async: true,
        return_type: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, HttpMethod, Operation};
    use crate::options::GeneratorOptions;
    use apigen_syntax::TypeScriptWriter;

    fn emit_client(method: HttpMethod, operation: Operation) -> String {
        let document = Document::default();
        let options = GeneratorOptions::default();
        let backend = options.backend.backend();
        let mut session = GenerationSession::new(&document, &backend, &options);
        let key = crate::keys::get_key("showPet").unwrap();
        let op = OperationRef {
            path: "/pets/{id}",
            method,
            operation: &operation,
            path_parameters: &[],
        };
        let parameters = NamedCodec::new(
            "ShowPet_Parameters",
            backend.types.decoded_of("ShowPet_Parameters"),
        );
        let response = NamedCodec::new(
            "ShowPet_Response",
            backend.types.decoded_of("ShowPet_Response"),
        );
        let mut client = ClientAssembler::new();
        client
            .add_operation(&mut session, &key, &op, &parameters, &response)
            .unwrap();
        client.finish(&mut session);
        TypeScriptWriter::emit(&session.into_program())
    }

    #[test]
    fn test_query_operation() {
        let out = emit_client(
            HttpMethod::Get,
            Operation {
                summary: Some("Show a pet".into()),
                description: Some("Looks the pet up by id.".into()),
                ..Default::default()
            },
        );
        insta::assert_snapshot!(out, @r#"
        import { queryOptions, skipToken, type QueryKey } from "@tanstack/react-query";

        export const ParametersSchema = z.object({
          path: z.string(),
          headers: z.instanceof(Headers).optional(),
          body: z.union([z.string(), z.instanceof(Blob), z.instanceof(FormData), z.instanceof(URLSearchParams)]).optional(),
        });

        export type ApiTransport = (method: string, request: z.input<typeof ParametersSchema>) => Promise<Response>;

        export class Api {
          #transport: ApiTransport;

          constructor(transport: ApiTransport) {
            this.#transport = transport;
          }

          /**
           * ### Show a pet
           * Looks the pet up by id.
           */
          async showPet(parameters: z.output<typeof ShowPet_Parameters>) {
            const request = await z.encodeAsync(ShowPet_Parameters, parameters);
            const response = await this.#transport("get", request);
            return await z.decodeAsync(ShowPet_Response, response);
          }

          /**
           * ### Show a pet
           * Looks the pet up by id.
           */
          showPetQuery(parameters: z.output<typeof ShowPet_Parameters> | typeof skipToken) {
            return queryOptions({
              queryKey: ["ShowPet", parameters] as QueryKey,
              queryFn: (parameters === skipToken) ? skipToken : async () => this.showPet(parameters),
            });
          }
        }
        "#);
    }

    #[test]
    fn test_mutation_operation() {
        let out = emit_client(HttpMethod::Delete, Operation::default());
        assert!(out.contains(r#"import { mutationOptions } from "@tanstack/react-query";"#));
        assert!(out.contains("const response = await this.#transport(\"delete\", request);"));
        assert!(out.contains(
            "    return mutationOptions({\n      mutationFn: async (parameters: z.output<typeof ShowPet_Parameters>) => this.showPet(parameters),\n    });"
        ));
        assert!(!out.contains("/**"));
    }
}
