// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Whole-program emission: every reactor class in declaration order, then the epilogue.
//!
//! Reactor classes are independent, so they may be emitted on the rayon pool.
//! The indexed collect keeps declaration order, which makes the parallel and
//! sequential paths produce byte-identical output.

use std::borrow::Cow;

use rayon::prelude::*;
use tracing::{debug, info_span};

use lfts_config::GeneratorConfig;

use crate::diagnostics::Emitted;
use crate::error::GenError;
use crate::features::TsFeatures;
use crate::federation::Federate;
use crate::fragment::TextBackend;
use crate::ir::{FederationConfig, Instantiation, Program, ReactorDefinition, IR_VERSION};
use crate::main_instance::emit_main_instance;
use crate::reactions::TsReactionRenderer;
use crate::reactor::ReactorClassEmitter;
use crate::role::ReactorRole;

/// Knobs for one program emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Emit reactor classes on the rayon pool.
    pub parallel: bool,
    /// Federate to emit the federated top level for.
    pub federate: Option<u32>,
    /// Replaces the program's RTI host.
    pub rti_host: Option<String>,
    /// Replaces the program's RTI port.
    pub rti_port: Option<u16>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl EmitOptions {
    /// Options seeded from persisted settings; no federate selected.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            indent_width: config.indent_width,
            parallel: config.parallel,
            federate: None,
            rti_host: config.rti_host.clone(),
            rti_port: config.rti_port,
        }
    }

    fn federation(&self, program: &Program) -> FederationConfig {
        FederationConfig {
            host: self
                .rti_host
                .clone()
                .unwrap_or_else(|| program.federation.host.clone()),
            port: self.rti_port.unwrap_or(program.federation.port),
        }
    }
}

/// Parse program IR and check its version tag. A missing tag is accepted.
pub fn parse_program(json: &str) -> Result<Program, GenError> {
    let program: Program = serde_json::from_str(json)?;
    match program.ir_version.as_deref() {
        None | Some(IR_VERSION) => Ok(program),
        Some(other) => Err(GenError::UnsupportedIrVersion {
            found: other.to_owned(),
            expected: IR_VERSION,
        }),
    }
}

fn select_federate<'p>(
    program: &'p Program,
    requested: Option<u32>,
) -> Result<Option<&'p dyn Federate>, GenError> {
    if let Some(id) = requested {
        let federate: &dyn Federate = program.federate(id).ok_or(GenError::UnknownFederate(id))?;
        return Ok(Some(federate));
    }
    let needs_federate = program
        .reactors
        .iter()
        .find(|r| ReactorRole::select(r).value == ReactorRole::Federated);
    match needs_federate {
        Some(reactor) => Err(GenError::FederateRequired {
            reactor: reactor.name.clone(),
            available: program.federates.iter().map(|f| f.id).collect(),
        }),
        None => Ok(None),
    }
}

/// The main binding and its class.
///
/// Without an explicit binding, the single reactor flagged main or federated is
/// instantiated under its own name. A program with no such reactor is a library
/// of classes and gets no epilogue.
fn resolve_main(
    program: &Program,
) -> Result<Option<(Cow<'_, Instantiation>, &ReactorDefinition)>, GenError> {
    if let Some(main) = &program.main {
        let reactor = program
            .reactor(&main.reactor_class)
            .ok_or_else(|| GenError::UnknownMainReactor {
                instance: main.name.clone(),
                class: main.reactor_class.clone(),
            })?;
        return Ok(Some((Cow::Borrowed(main), reactor)));
    }
    let mut candidates = program.top_level_reactors();
    let Some(reactor) = candidates.next() else {
        return Ok(None);
    };
    if candidates.next().is_some() {
        return Err(GenError::AmbiguousMainReactor(
            program.top_level_reactors().map(|r| r.name.clone()).collect(),
        ));
    }
    let derived = Instantiation {
        name: reactor.name.clone(),
        reactor_class: reactor.name.clone(),
        overridable: None,
    };
    Ok(Some((Cow::Owned(derived), reactor)))
}

/// Emit the complete program text.
pub fn emit_program(program: &Program, options: &EmitOptions) -> Result<Emitted<String>, GenError> {
    let _span = info_span!("emit_program", reactors = program.reactors.len()).entered();
    let main = resolve_main(program)?;
    let federate = select_federate(program, options.federate)?;
    let federation = options.federation(program);
    let features = TsFeatures::new(&program.reactors);
    let renderer = TsReactionRenderer;
    let emitter = ReactorClassEmitter::new(&features, &renderer, &federation);
    let backend = TextBackend::new(options.indent_width);

    let emit_one = |reactor: &ReactorDefinition| -> Result<Emitted<String>, GenError> {
        Ok(emitter
            .emit(reactor, federate)?
            .map(|class| backend.render(&class.to_fragments())))
    };
    let classes: Vec<Emitted<String>> = if options.parallel {
        program
            .reactors
            .par_iter()
            .map(emit_one)
            .collect::<Result<_, _>>()?
    } else {
        program
            .reactors
            .iter()
            .map(emit_one)
            .collect::<Result<_, _>>()?
    };

    let mut diagnostics = Vec::new();
    let mut text = String::new();
    for class in classes {
        text.push_str(&class.absorb_into(&mut diagnostics));
    }

    if let Some((main, reactor)) = main {
        let epilogue = emit_main_instance(&main, reactor).absorb_into(&mut diagnostics);
        text.push_str(&backend.render(&epilogue.instantiation));
        text.push_str(&backend.render(&epilogue.startup));
    }

    debug!(
        bytes = text.len(),
        diagnostics = diagnostics.len(),
        federate = ?options.federate,
        "emitted program"
    );
    Ok(Emitted::new(text, diagnostics))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    use super::*;
    use crate::ir::{FederateInstance, ParameterDef};

    fn program() -> Program {
        Program {
            ir_version: Some(IR_VERSION.into()),
            reactors: vec![
                ReactorDefinition {
                    name: "Counter".into(),
                    parameters: vec![ParameterDef {
                        name: "count".into(),
                        ty: Some("number".into()),
                        init: vec!["0".into()],
                    }],
                    ..ReactorDefinition::default()
                },
                ReactorDefinition {
                    name: "Main".into(),
                    is_main: true,
                    ..ReactorDefinition::default()
                },
            ],
            main: Some(Instantiation {
                name: "Main".into(),
                reactor_class: "Main".into(),
                overridable: None,
            }),
            ..Program::default()
        }
    }

    #[test]
    fn classes_appear_in_declaration_order_before_the_epilogue() {
        let out = emit_program(&program(), &EmitOptions::default()).unwrap();
        let counter = out.value.find("export class Counter").unwrap();
        let main = out.value.find("class Main extends __App").unwrap();
        let app = out.value.find("let __app;").unwrap();
        let start = out.value.find("__app._start();").unwrap();
        assert!(counter < main && main < app && app < start);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn parallel_output_matches_sequential() {
        let mut p = program();
        for i in 0..16 {
            p.reactors.push(ReactorDefinition {
                name: format!("R{i}"),
                ..ReactorDefinition::default()
            });
        }
        let sequential = emit_program(&p, &EmitOptions::default()).unwrap();
        let parallel = emit_program(
            &p,
            &EmitOptions {
                parallel: true,
                ..EmitOptions::default()
            },
        )
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = parse_program(r#"{ "ir_version": "lf-ts-ir/v2" }"#).unwrap_err();
        assert!(err.to_string().contains("Unsupported ir_version"));
        assert!(parse_program(r#"{ "reactors": [] }"#).is_ok());
    }

    #[test]
    fn federated_program_requires_a_known_federate() {
        let p = Program {
            reactors: vec![ReactorDefinition {
                name: "Top".into(),
                is_federated: true,
                ..ReactorDefinition::default()
            }],
            federates: vec![FederateInstance {
                id: 4,
                ..FederateInstance::default()
            }],
            ..Program::default()
        };
        match emit_program(&p, &EmitOptions::default()) {
            Err(GenError::FederateRequired { available, .. }) => assert_eq!(available, [4]),
            other => panic!("expected FederateRequired, got {other:?}"),
        }
        assert!(matches!(
            emit_program(
                &p,
                &EmitOptions {
                    federate: Some(9),
                    ..EmitOptions::default()
                }
            ),
            Err(GenError::UnknownFederate(9))
        ));
        let out = emit_program(
            &p,
            &EmitOptions {
                federate: Some(4),
                rti_port: Some(8080),
                ..EmitOptions::default()
            },
        )
        .unwrap();
        assert!(out.value.contains("super(4, 8080, \"localhost\", timeout"));
    }

    #[test]
    fn main_must_name_a_defined_class() {
        let mut p = program();
        p.main = Some(Instantiation {
            name: "m".into(),
            reactor_class: "Missing".into(),
            overridable: None,
        });
        assert!(matches!(
            emit_program(&p, &EmitOptions::default()),
            Err(GenError::UnknownMainReactor { .. })
        ));
    }

    #[test]
    fn flagged_main_reactor_is_instantiated_without_a_binding() {
        let mut p = program();
        p.main = None;
        p.reactors[1].parameters = vec![ParameterDef {
            name: "limit".into(),
            ty: Some("number".into()),
            init: vec!["10".into()],
        }];
        let out = emit_program(&p, &EmitOptions::default()).unwrap();
        assert!(out.value.contains("// ************* Instance Main of class Main\nlet __app;"));
        assert!(out.value.contains("__app = new Main(__timeout, __keepAlive, __fast, __CLlimit);"));
        assert!(out.value.contains("__app._start();"));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn flagged_federated_reactor_is_instantiated_without_a_binding() {
        let p = Program {
            reactors: vec![ReactorDefinition {
                name: "Top".into(),
                is_federated: true,
                ..ReactorDefinition::default()
            }],
            federates: vec![FederateInstance::default()],
            ..Program::default()
        };
        let out = emit_program(
            &p,
            &EmitOptions {
                federate: Some(0),
                ..EmitOptions::default()
            },
        )
        .unwrap();
        assert!(out.value.contains("__app = new Top(__timeout, __keepAlive, __fast);"));
    }

    #[test]
    fn several_flagged_reactors_without_a_binding_are_rejected() {
        let mut p = program();
        p.main = None;
        p.reactors[0].is_main = true;
        match emit_program(&p, &EmitOptions::default()) {
            Err(GenError::AmbiguousMainReactor(names)) => assert_eq!(names, ["Counter", "Main"]),
            other => panic!("expected AmbiguousMainReactor, got {other:?}"),
        }
    }

    #[test]
    fn programs_without_a_top_level_reactor_get_no_epilogue() {
        let mut p = program();
        p.main = None;
        p.reactors[1].is_main = false;
        let out = emit_program(&p, &EmitOptions::default()).unwrap();
        assert!(out.value.contains("export class Main extends __Reactor {"));
        assert!(!out.value.contains("__app"));
    }

    #[test]
    fn indent_width_comes_from_options() {
        let out = emit_program(
            &program(),
            &EmitOptions {
                indent_width: 2,
                ..EmitOptions::default()
            },
        )
        .unwrap();
        assert!(out.value.contains("\n  count: __Parameter<number>;\n"));
    }
}
